use super::UrlType;
use super::body::{self, BodyError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One outbound HTTP request, as seen by rule expressions through the `request` variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RequestFields", into = "RequestFields")]
pub struct Request {
    pub url: UrlType,
    pub method: String,

    /// Header names are case-sensitive
    pub headers: HashMap<String, String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// The capture-file layout, with the body split into its text and base64 forms.
#[derive(Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
struct RequestFields {
    url: UrlType,
    method: String,
    headers: HashMap<String, String>,
    content_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    body_base64: Option<String>,
}

impl TryFrom<RequestFields> for Request {
    type Error = BodyError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        let RequestFields {
            url,
            method,
            headers,
            content_type,
            body,
            body_base64,
        } = fields;

        Ok(Self {
            url,
            method,
            headers,
            content_type,
            body: body::join(body, body_base64)?,
        })
    }
}

impl From<Request> for RequestFields {
    fn from(value: Request) -> Self {
        let (body, body_base64) = body::split(value.body);
        Self {
            url: value.url,
            method: value.method,
            headers: value.headers,
            content_type: value.content_type,
            body,
            body_base64,
        }
    }
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, url: UrlType) -> Self {
        Self {
            url,
            method: method.into(),
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
