//! Typed HTTP object model exposed to rule expressions
//!
//! [`Request`] and [`Response`] are the two root objects an expression can reach, and
//! both embed a [`UrlType`]. Nothing in this module changes during an evaluation: the
//! expression engine only reads fields, and the builtin functions never mutate their
//! inputs.

mod body;
mod request;
mod response;
mod url_type;

pub use request::Request;
pub use response::Response;
pub use url_type::UrlType;
