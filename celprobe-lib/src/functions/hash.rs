use md5::{Digest, Md5};

/// Lowercase hex MD5 digest of `input`.
#[must_use]
pub fn md5_hex(input: &[u8]) -> String {
    format!("{:x}", Md5::digest(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
