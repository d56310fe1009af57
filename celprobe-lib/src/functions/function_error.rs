use super::ValueKind;

/// A failure raised by a builtin function while an expression executes.
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("wrong number of arguments to '{function}': expected {expected}, got {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unexpected argument types ({found}) passed to '{function}'")]
    NoMatchingOverload { function: &'static str, found: String },

    #[error("argument {index} of '{function}' must be {expected}, got {found}")]
    TypeMismatch {
        function: &'static str,
        index: usize,
        expected: ValueKind,
        found: &'static str,
    },

    #[error("invalid pattern '{pattern}' passed to 'bmatchs'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid base64 input: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid URL escape '{escape}'")]
    InvalidEscape { escape: String },

    #[error("invalid argument to '{function}': {reason}")]
    InvalidArgument { function: &'static str, reason: &'static str },
}
