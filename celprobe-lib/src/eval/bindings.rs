use crate::env::VariableType;
use crate::model::{Request, Response, UrlType};
use cel_interpreter::Value;
use cel_interpreter::objects::Map;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A concrete value supplied for one declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Request(Request),
    Response(Response),
    String(String),
}

impl Binding {
    #[must_use]
    pub const fn variable_type(&self) -> VariableType {
        match self {
            Self::Request(_) => VariableType::Request,
            Self::Response(_) => VariableType::Response,
            Self::String(_) => VariableType::String,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Request(request) => request_value(request),
            Self::Response(response) => response_value(response),
            Self::String(s) => string(s),
        }
    }
}

impl From<Request> for Binding {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

impl From<Response> for Binding {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<String> for Binding {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Binding {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// The runtime values for one evaluation, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, Binding>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `request` to the given probe.
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        let _ = self.insert("request", request);
        self
    }

    /// Bind `response` to the given reply.
    #[must_use]
    pub fn with_response(mut self, response: Response) -> Self {
        let _ = self.insert("response", response);
        self
    }

    #[must_use]
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.insert(name, Binding::String(value.into()));
        self
    }

    /// Bind `name`, returning the value it was previously bound to.
    pub fn insert(&mut self, name: impl Into<String>, binding: impl Into<Binding>) -> Option<Binding> {
        self.values.insert(name.into(), binding.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.values.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn string(s: &str) -> Value {
    Value::String(Arc::new(s.to_string()))
}

fn bytes(b: &[u8]) -> Value {
    Value::Bytes(Arc::new(b.to_vec()))
}

fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    let map: HashMap<Arc<String>, Value> = fields.into_iter().map(|(name, value)| (Arc::new(name.to_string()), value)).collect();
    Value::Map(Map::from(map))
}

fn headers_value(headers: &HashMap<String, String>) -> Value {
    let map: HashMap<Arc<String>, Value> = headers.iter().map(|(name, value)| (Arc::new(name.clone()), string(value))).collect();
    Value::Map(Map::from(map))
}

fn url_value(url: &UrlType) -> Value {
    object([
        ("scheme", string(&url.scheme)),
        ("host", string(&url.host)),
        ("path", string(&url.path)),
        ("query", string(&url.query)),
        ("fragment", string(&url.fragment)),
    ])
}

fn request_value(request: &Request) -> Value {
    object([
        ("url", url_value(&request.url)),
        ("method", string(&request.method)),
        ("headers", headers_value(&request.headers)),
        ("content_type", string(&request.content_type)),
        ("body", bytes(&request.body)),
    ])
}

fn response_value(response: &Response) -> Value {
    object([
        ("url", url_value(&response.url)),
        ("status", Value::Int(response.status)),
        ("headers", headers_value(&response.headers)),
        ("content_type", string(&response.content_type)),
        ("body", bytes(&response.body)),
    ])
}
