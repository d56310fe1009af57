use super::declarations::{ENGINE_FUNCTIONS, OBJECT_TYPES, ObjectType, RESERVED_WORDS, VariableType};
use crate::functions::{BUILTINS, Builtin, builtin};
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "       env";

/// A failure to extend an [`Environment`].
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("'{name}' is already declared as {existing}")]
    Redeclared { name: String, existing: VariableType },

    #[error("cannot declare '{0}' after the environment has been used to compile expressions")]
    Frozen(String),
}

/// The declared variables, object types and functions rule expressions can use.
///
/// A new environment declares `request` and `response` plus every builtin. More string
/// variables can be added with [`add_string_variable`](Self::add_string_variable) until the
/// environment compiles its first expression; from then on it is frozen and further
/// declarations are rejected, so every compiled expression was checked against the same
/// set of names.
///
/// A frozen environment is read-only and can be shared between threads. A clone starts out
/// unfrozen, which is how a rule set derives its own environment from a common base.
#[derive(Debug)]
pub struct Environment {
    variables: BTreeMap<String, VariableType>,
    frozen: AtomicBool,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        let variables = BTreeMap::from([
            ("request".to_string(), VariableType::Request),
            ("response".to_string(), VariableType::Response),
        ]);

        Self {
            variables,
            frozen: AtomicBool::new(false),
        }
    }

    /// Declare a free variable of type string.
    ///
    /// Declaring the same string variable twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not an identifier, is reserved, is already declared
    /// with another type, or if the environment is frozen.
    pub fn add_string_variable(&mut self, name: &str) -> Result<&mut Self, EnvironmentError> {
        if *self.frozen.get_mut() {
            return Err(EnvironmentError::Frozen(name.to_string()));
        }

        if !is_identifier(name) {
            return Err(EnvironmentError::InvalidIdentifier(name.to_string()));
        }

        match self.variables.get(name) {
            Some(VariableType::String) => {}
            Some(&existing) => {
                return Err(EnvironmentError::Redeclared {
                    name: name.to_string(),
                    existing,
                });
            }
            None => {
                log::debug!(target: LOG_TARGET, "Declaring string variable '{name}'");
                let _ = self.variables.insert(name.to_string(), VariableType::String);
            }
        }

        Ok(self)
    }

    /// Declare several string variables at once.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first failing declaration.
    pub fn add_string_variables<I, S>(&mut self, names: I) -> Result<&mut Self, EnvironmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let _ = self.add_string_variable(name.as_ref())?;
        }

        Ok(self)
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<VariableType> {
        self.variables.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, VariableType)> {
        self.variables.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    #[must_use]
    pub const fn object_types(&self) -> &'static [&'static ObjectType] {
        OBJECT_TYPES
    }

    pub fn functions(&self) -> impl Iterator<Item = &'static Builtin> {
        BUILTINS.iter().copied()
    }

    /// Whether expressions may call `name`, either as a builtin or as an engine function.
    #[must_use]
    pub fn declares_function(&self, name: &str) -> bool {
        builtin(name).is_some() || ENGINE_FUNCTIONS.contains(&name)
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub(crate) fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            log::debug!(target: LOG_TARGET, "Environment frozen with {} variables", self.variables.len());
        }
    }

    pub(crate) fn declared_variables(&self) -> BTreeMap<String, VariableType> {
        self.variables.clone()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Environment {
    fn clone(&self) -> Self {
        Self {
            variables: self.variables.clone(),
            frozen: AtomicBool::new(false),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "variables:")?;
        for (name, ty) in self.variables() {
            writeln!(f, "  {name}: {ty}")?;
        }

        writeln!(f, "types:")?;
        for ty in self.object_types() {
            writeln!(f, "  {ty}")?;
        }

        writeln!(f, "functions:")?;
        for function in self.functions() {
            for overload in function.overloads {
                writeln!(f, "  {}: {overload}", function.name)?;
            }
        }

        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !RESERVED_WORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_declares_roots() {
        let env = Environment::new();
        assert_eq!(env.variable("request"), Some(VariableType::Request));
        assert_eq!(env.variable("response"), Some(VariableType::Response));
        assert_eq!(env.variable("token"), None);
        assert!(!env.is_frozen());
    }

    #[test]
    fn test_declares_functions() {
        let env = Environment::new();
        assert!(env.declares_function("bcontains"));
        assert!(env.declares_function("substr"));
        assert!(env.declares_function("size"));
        assert!(!env.declares_function("sha256"));
        assert_eq!(env.functions().count(), 10);
    }

    #[test]
    fn test_add_string_variable() {
        let mut env = Environment::new();
        let _ = env.add_string_variable("token").unwrap().add_string_variable("_path2").unwrap();

        assert_eq!(env.variable("token"), Some(VariableType::String));
        assert_eq!(env.variable("_path2"), Some(VariableType::String));
        assert_eq!(env.variables().count(), 4);
    }

    #[test]
    fn test_add_string_variable_twice_is_harmless() {
        let mut env = Environment::new();
        let _ = env.add_string_variables(["a", "a"]).unwrap();
        assert_eq!(env.variables().count(), 3);
    }

    #[test]
    fn test_invalid_identifiers() {
        let mut env = Environment::new();
        for name in ["", "1abc", "a-b", "a.b", "with space", "null", "in", "caf\u{e9}"] {
            let err = env.add_string_variable(name).unwrap_err();
            assert!(matches!(err, EnvironmentError::InvalidIdentifier(_)), "{name}");
        }
    }

    #[test]
    fn test_cannot_redeclare_root() {
        let mut env = Environment::new();
        let err = env.add_string_variable("request").unwrap_err();
        assert_eq!(err.to_string(), "'request' is already declared as lib.Request");
    }

    #[test]
    fn test_frozen_rejects_declarations() {
        let mut env = Environment::new();
        env.freeze();
        assert!(env.is_frozen());

        let err = env.add_string_variable("late").unwrap_err();
        assert!(matches!(err, EnvironmentError::Frozen(_)));
        assert_eq!(env.variable("late"), None);
    }

    #[test]
    fn test_clone_starts_unfrozen() {
        let mut base = Environment::new();
        let _ = base.add_string_variable("shared").unwrap();
        base.freeze();

        let mut derived = base.clone();
        assert!(!derived.is_frozen());
        let _ = derived.add_string_variable("extra").unwrap();
        assert_eq!(derived.variable("shared"), Some(VariableType::String));
        assert_eq!(base.variable("extra"), None);
    }

    #[test]
    fn test_display_lists_everything() {
        let mut env = Environment::new();
        let _ = env.add_string_variable("token").unwrap();
        let text = env.to_string();

        assert!(text.contains("  token: string\n"));
        assert!(text.contains("  request: lib.Request\n"));
        assert!(text.contains("  lib.Response { url: lib.UrlType, status: int, headers: map(string, string), content_type: string, body: bytes }\n"));
        assert!(text.contains("  base64: base64_bytes(bytes) -> string\n"));
        assert!(text.contains("  substr: substr_string_int_int(string, int, int) -> string\n"));
    }
}
