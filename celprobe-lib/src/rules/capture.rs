use crate::Result;
use crate::eval::Bindings;
use crate::model::{Request, Response};
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;

/// A recorded request/response pair, loaded from a TOML capture file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capture {
    pub request: Request,
    pub response: Response,
}

impl Capture {
    /// Load a capture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading capture file '{path}'"))?;
        toml::from_str(&text).into_app_err_with(|| format!("parsing capture file '{path}'"))
    }

    /// Bindings for `request` and `response`.
    #[must_use]
    pub fn bindings(&self) -> Bindings {
        Bindings::new()
            .with_request(self.request.clone())
            .with_response(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capture() {
        let capture: Capture = toml::from_str(
            r#"
[request]
method = "POST"
url = "http://target.local/api/login"
content_type = "application/json"
body = '{"user":"admin"}'

[request.headers]
Content-Type = "application/json"

[response]
status = 302
url = "http://target.local/api/login"

[response.headers]
Location = "/dashboard"
"#,
        )
        .unwrap();

        assert_eq!(capture.request.method, "POST");
        assert_eq!(capture.request.url.path, "/api/login");
        assert_eq!(capture.request.body, br#"{"user":"admin"}"#);
        assert_eq!(capture.response.status, 302);
        assert_eq!(capture.response.headers.get("Location").map(String::as_str), Some("/dashboard"));
        assert_eq!(capture.bindings().len(), 2);
    }

    #[test]
    fn test_parse_capture_with_encoded_body() {
        let capture: Capture = toml::from_str(
            r#"
[response]
status = 200
content_type = "text/html; charset=gbk"
body_base64 = "PHRpdGxlPtbQzsQ8L3RpdGxlPg=="
"#,
        )
        .unwrap();

        assert_eq!(capture.response.body, b"<title>\xd6\xd0\xce\xc4</title>");
        assert!(capture.request.body.is_empty());
    }

    #[test]
    fn test_empty_capture_uses_defaults() {
        let capture: Capture = toml::from_str("").unwrap();
        assert_eq!(capture, Capture::default());
    }
}
