//! Environment construction for rule expressions
//!
//! An [`Environment`] is the set of names an expression may use: the `request` and
//! `response` roots typed by the HTTP object model, any string variables a rule set adds,
//! the builtin functions, and the engine's own standard functions. Expressions are checked
//! against it when they are compiled.

mod declarations;
mod environment;

pub use declarations::{ENGINE_FUNCTIONS, Field, OBJECT_TYPES, ObjectType, REQUEST_TYPE, RESPONSE_TYPE, URL_TYPE, VariableType};
pub use environment::{Environment, EnvironmentError};
