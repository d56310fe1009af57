use super::FunctionError;
use cel_interpreter::Value;
use core::fmt;
use std::sync::Arc;

/// The value kinds builtin overloads are declared over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    String,
    Bytes,
}

impl ValueKind {
    #[must_use]
    pub const fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(_) => Some(Self::Bool),
            Value::Int(_) => Some(Self::Int),
            Value::String(_) => Some(Self::String),
            Value::Bytes(_) => Some(Self::Bytes),
            _ => None,
        }
    }
}

/// The engine's name for the type of a value, used in error messages.
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::UInt(_) => "uint",
        Value::Float(_) => "double",
        Value::String(_) => "string",
        Value::Bytes(_) => "bytes",
        Value::List(_) => "list",
        Value::Map(_) => "map",
        Value::Null => "null",
        _ => "unknown",
    }
}

/// One typed signature of a builtin, bound to its implementation.
pub struct Overload {
    pub id: &'static str,
    pub params: &'static [ValueKind],
    pub result: ValueKind,
    pub(super) imp: fn(&[Value]) -> Result<Value, FunctionError>,
}

impl Overload {
    fn accepts(&self, args: &[Value]) -> bool {
        self.params.len() == args.len() && self.params.iter().zip(args).all(|(kind, arg)| ValueKind::of(arg) == Some(*kind))
    }
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overload")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(Into::into).collect();
        write!(f, "{}({}) -> {}", self.id, params.join(", "), self.result)
    }
}

/// A named function callable from expressions.
///
/// The bytes and string variants of an operation are separate overloads: arguments are
/// matched against the overload table by kind at call time, and no kind is ever coerced
/// into another.
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub overloads: &'static [Overload],
}

impl Builtin {
    /// Invoke the overload matching the kinds of `args`.
    ///
    /// # Errors
    ///
    /// Returns an error if no overload takes this many arguments, if none matches their
    /// kinds, or if the selected implementation fails.
    pub fn call(&self, args: &[Value]) -> Result<Value, FunctionError> {
        if let Some(overload) = self.overloads.iter().find(|o| o.accepts(args)) {
            return (overload.imp)(args);
        }

        if !self.overloads.iter().any(|o| o.params.len() == args.len()) {
            return Err(FunctionError::Arity {
                function: self.name,
                expected: self.overloads.first().map_or(0, |o| o.params.len()),
                found: args.len(),
            });
        }

        let found: Vec<&str> = args.iter().map(kind_name).collect();
        Err(FunctionError::NoMatchingOverload {
            function: self.name,
            found: found.join(", "),
        })
    }
}

pub(super) fn string_arg<'a>(function: &'static str, args: &'a [Value], index: usize) -> Result<&'a str, FunctionError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.as_str()),
        other => Err(mismatch(function, index, ValueKind::String, other)),
    }
}

pub(super) fn bytes_arg<'a>(function: &'static str, args: &'a [Value], index: usize) -> Result<&'a [u8], FunctionError> {
    match args.get(index) {
        Some(Value::Bytes(b)) => Ok(b.as_slice()),
        other => Err(mismatch(function, index, ValueKind::Bytes, other)),
    }
}

/// Raw bytes of a string or bytes argument.
pub(super) fn text_or_bytes_arg<'a>(function: &'static str, args: &'a [Value], index: usize) -> Result<&'a [u8], FunctionError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.as_bytes()),
        Some(Value::Bytes(b)) => Ok(b.as_slice()),
        other => Err(mismatch(function, index, ValueKind::Bytes, other)),
    }
}

pub(super) fn int_arg(function: &'static str, args: &[Value], index: usize) -> Result<i64, FunctionError> {
    match args.get(index) {
        Some(Value::Int(i)) => Ok(*i),
        other => Err(mismatch(function, index, ValueKind::Int, other)),
    }
}

fn mismatch(function: &'static str, index: usize, expected: ValueKind, found: Option<&Value>) -> FunctionError {
    FunctionError::TypeMismatch {
        function,
        index,
        expected,
        found: found.map_or("nothing", kind_name),
    }
}

pub(super) fn string_value(s: String) -> Value {
    Value::String(Arc::new(s))
}
