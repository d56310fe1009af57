use crate::env::VariableType;
use cel_interpreter::ExecutionError;

/// The stage of an evaluation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// The expression text does not parse, references names the environment does not declare,
    /// or calls a builtin with arguments no overload accepts.
    Compile,

    /// The compiled expression cannot be bound to the supplied values.
    Link,

    /// A builtin or the engine failed while the expression ran.
    Execution,
}

/// Why an expression failed to compile.
#[derive(Debug, thiserror::Error)]
pub enum CompileFailure {
    #[error("{0}")]
    Syntax(String),

    #[error("undeclared reference to '{0}'")]
    UnknownVariable(String),

    #[error("undeclared reference to function '{0}'")]
    UnknownFunction(String),

    #[error("no overload of '{function}' takes {found} arguments")]
    WrongArgumentCount { function: &'static str, found: usize },

    #[error("found no matching overload for '{function}' applied to ({found})")]
    NoMatchingOverload { function: &'static str, found: String },
}

/// Why a compiled expression could not be bound to runtime values.
#[derive(Debug, thiserror::Error)]
pub enum LinkFailure {
    #[error("no variable named '{0}' is declared")]
    UndeclaredBinding(String),

    #[error("variable '{name}' is declared as {declared} but was bound to a {bound}")]
    MismatchedBinding {
        name: String,
        declared: VariableType,
        bound: VariableType,
    },
}

/// A failed evaluation, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("could not compile expression '{expression}': {failure}")]
    Compile {
        expression: String,
        #[source]
        failure: CompileFailure,
    },

    #[error("could not link expression '{expression}': {failure}")]
    Link {
        expression: String,
        #[source]
        failure: LinkFailure,
    },

    #[error("could not evaluate expression '{expression}': {source}")]
    Execution {
        expression: String,
        #[source]
        source: ExecutionError,
    },

    #[error("expression '{expression}' did not return a boolean, got '{found}' instead")]
    NotBoolean { expression: String, found: &'static str },
}

impl EvalError {
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Compile { .. } => Stage::Compile,
            Self::Link { .. } => Stage::Link,
            Self::Execution { .. } | Self::NotBoolean { .. } => Stage::Execution,
        }
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Compile { expression, .. }
            | Self::Link { expression, .. }
            | Self::Execution { expression, .. }
            | Self::NotBoolean { expression, .. } => expression,
        }
    }
}
