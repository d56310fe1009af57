use super::FunctionError;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, percent_encode};

/// Bytes left alone when escaping a query component.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Padded standard alphabet that ignores set bits past the last whole byte.
const LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true));

/// Standard padded base64 of `input`.
#[must_use]
pub fn base64_encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decode standard padded base64, reading the result as text.
///
/// Line breaks (`\r`, `\n`) anywhere in `input` are skipped, so wrapped MIME-style
/// payloads decode. Stray bits in the final symbol are ignored (`YWJ=` is `ab`).
///
/// # Errors
///
/// Returns an error if `input` holds characters outside the alphabet or is missing its padding.
pub fn base64_decode(input: &[u8]) -> Result<String, FunctionError> {
    let unwrapped: Vec<u8> = input.iter().copied().filter(|b| !matches!(b, b'\r' | b'\n')).collect();
    let decoded = LENIENT.decode(unwrapped)?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// Escape `input` for use inside a URL query. Spaces become `+`.
#[must_use]
pub fn urlencode(input: &[u8]) -> String {
    // '%' is always escaped, so every "%20" here came from a space
    percent_encode(input, QUERY_COMPONENT).to_string().replace("%20", "+")
}

/// Undo [`urlencode`]: `+` becomes a space and `%XX` becomes the byte `XX`.
///
/// # Errors
///
/// Returns an error if a `%` is not followed by two hex digits.
pub fn urldecode(input: &[u8]) -> Result<String, FunctionError> {
    if let Some(escape) = first_invalid_escape(input) {
        return Err(FunctionError::InvalidEscape { escape });
    }

    let unplussed: Vec<u8> = input.iter().map(|&b| if b == b'+' { b' ' } else { b }).collect();
    Ok(percent_decode(&unplussed).decode_utf8_lossy().into_owned())
}

fn first_invalid_escape(input: &[u8]) -> Option<String> {
    input
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'%')
        .find_map(|(i, _)| {
            let escape = input.get(i..input.len().min(i + 3)).unwrap_or_default();
            let valid = escape.len() == 3 && escape.iter().skip(1).all(u8::is_ascii_hexdigit);
            (!valid).then(|| String::from_utf8_lossy(escape).into_owned())
        })
}
