//! Capture-file form of message bodies.
//!
//! A body that is valid UTF-8 is stored as text under `body`; any other body is stored
//! as standard base64 under `body_base64`, so a GBK page or a binary download survives
//! a load/save cycle byte for byte.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("only one of 'body' and 'body_base64' may be given")]
    Conflict,

    #[error("invalid 'body_base64': {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Build the body from whichever of the two capture fields is present.
pub fn join(text: Option<String>, encoded: Option<String>) -> Result<Vec<u8>, BodyError> {
    match (text, encoded) {
        (Some(_), Some(_)) => Err(BodyError::Conflict),
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(encoded)) => Ok(STANDARD.decode(encoded)?),
        (None, None) => Ok(Vec::new()),
    }
}

/// Split a body back into the `body` / `body_base64` pair.
pub fn split(body: Vec<u8>) -> (Option<String>, Option<String>) {
    match String::from_utf8(body) {
        Ok(text) => (Some(text), None),
        Err(e) => (None, Some(STANDARD.encode(e.as_bytes()))),
    }
}
