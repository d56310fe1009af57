use serde::{Deserialize, Serialize};

/// A named fingerprint expression from a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    expression: String,
}

impl Rule {
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description,
            expression: expression.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }
}
