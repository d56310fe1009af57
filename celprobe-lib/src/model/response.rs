use super::UrlType;
use super::body::{self, BodyError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The observed reply to a request, as seen by rule expressions through the `response` variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "ResponseFields", into = "ResponseFields")]
pub struct Response {
    pub url: UrlType,
    pub status: i64,
    pub headers: HashMap<String, String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// The capture-file layout, with the body split into its text and base64 forms.
#[derive(Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
struct ResponseFields {
    url: UrlType,
    status: i64,
    headers: HashMap<String, String>,
    content_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    body_base64: Option<String>,
}

impl TryFrom<ResponseFields> for Response {
    type Error = BodyError;

    fn try_from(fields: ResponseFields) -> Result<Self, Self::Error> {
        let ResponseFields {
            url,
            status,
            headers,
            content_type,
            body,
            body_base64,
        } = fields;

        Ok(Self {
            url,
            status,
            headers,
            content_type,
            body: body::join(body, body_base64)?,
        })
    }
}

impl From<Response> for ResponseFields {
    fn from(value: Response) -> Self {
        let (body, body_base64) = body::split(value.body);
        Self {
            url: value.url,
            status: value.status,
            headers: value.headers,
            content_type: value.content_type,
            body,
            body_base64,
        }
    }
}

impl Response {
    #[must_use]
    pub fn new(status: i64, url: UrlType) -> Self {
        Self {
            url,
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}
