//! Compile, link and execute expressions against an environment.

use super::checker::check;
use super::eval_error::{CompileFailure, LinkFailure};
use super::{Bindings, EvalError};
use crate::env::{Environment, VariableType};
use crate::functions::{self, kind_name};
use cel_interpreter::{Context, Program, Value};
use cel_parser::Parser;
use std::collections::BTreeMap;
use std::sync::Arc;

const LOG_TARGET: &str = "      eval";

/// An expression that parsed and only references names its environment declares.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    source: String,
    program: Arc<Program>,
    variables: Arc<BTreeMap<String, VariableType>>,
}

impl CompiledExpression {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run the expression against `bindings` and return whatever value it produces.
    ///
    /// # Errors
    ///
    /// Returns a [`Link`](EvalError::Link) error if a binding is undeclared or has the wrong
    /// type, and an [`Execution`](EvalError::Execution) error if the expression fails while
    /// running, including when it reads a declared variable that has no binding.
    pub fn execute(&self, bindings: &Bindings) -> Result<Value, EvalError> {
        let context = self.link(bindings)?;

        self.program.execute(&context).map_err(|source| {
            log::debug!(target: LOG_TARGET, "Evaluation error in '{}': {source}", self.source);
            EvalError::Execution {
                expression: self.source.clone(),
                source,
            }
        })
    }

    /// Run the expression as a fingerprint rule, which must produce a boolean.
    ///
    /// # Errors
    ///
    /// Fails like [`execute`](Self::execute), and also when the result is not a boolean.
    pub fn matches(&self, bindings: &Bindings) -> Result<bool, EvalError> {
        match self.execute(bindings)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::NotBoolean {
                expression: self.source.clone(),
                found: kind_name(&other),
            }),
        }
    }

    fn link(&self, bindings: &Bindings) -> Result<Context<'static>, EvalError> {
        let mut context = Context::default();
        functions::register(&mut context);

        for (name, binding) in bindings.iter() {
            let failure = match self.variables.get(name) {
                None => LinkFailure::UndeclaredBinding(name.to_string()),
                Some(&declared) if declared != binding.variable_type() => LinkFailure::MismatchedBinding {
                    name: name.to_string(),
                    declared,
                    bound: binding.variable_type(),
                },
                Some(_) => {
                    context.add_variable_from_value(name, binding.to_value());
                    continue;
                }
            };

            log::debug!(target: LOG_TARGET, "Program creation error for '{}': {failure}", self.source);
            return Err(EvalError::Link {
                expression: self.source.clone(),
                failure,
            });
        }

        Ok(context)
    }
}

/// Compile `expression` against `env`, freezing the environment.
///
/// # Errors
///
/// Returns a [`Compile`](EvalError::Compile) error if the text does not parse, if it
/// references a variable or calls a function that `env` does not declare, or if it calls
/// a builtin with a number or kind of arguments no overload accepts.
pub fn compile(env: &Environment, expression: &str) -> Result<CompiledExpression, EvalError> {
    env.freeze();

    let fail = |failure: CompileFailure| {
        log::debug!(target: LOG_TARGET, "Compile error in '{expression}': {failure}");
        EvalError::Compile {
            expression: expression.to_string(),
            failure,
        }
    };

    let ast = Parser::default()
        .parse(expression)
        .map_err(|e| fail(CompileFailure::Syntax(e.to_string())))?;
    check(env, &ast).map_err(fail)?;

    let program = Program::compile(expression).map_err(|e| fail(CompileFailure::Syntax(e.to_string())))?;

    Ok(CompiledExpression {
        source: expression.to_string(),
        program: Arc::new(program),
        variables: Arc::new(env.declared_variables()),
    })
}

/// Compile `expression` against `env` and run it against `bindings` in one step.
///
/// # Errors
///
/// Returns an [`EvalError`] whose [`stage`](EvalError::stage) tells which step failed.
pub fn evaluate(env: &Environment, expression: &str, bindings: &Bindings) -> Result<Value, EvalError> {
    compile(env, expression)?.execute(bindings)
}
