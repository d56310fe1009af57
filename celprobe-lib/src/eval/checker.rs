//! Static checks on a parsed expression.
//!
//! The walk resolves every identifier against the environment, with the loop variables of
//! comprehension macros visible only inside their macro body, and checks every builtin
//! call against the builtin's overload table. Argument kinds are known statically for
//! literals, string variables, and fields of the object model; anything else is left for
//! the runtime dispatch to check.

use super::eval_error::CompileFailure;
use crate::env::{Environment, OBJECT_TYPES};
use crate::functions::builtin;
use cel_parser::ast::{EntryExpr, Expr, IdedExpr};
use cel_parser::reference::Val;

/// Check `expr` against `env`, reporting the first failure in source order.
pub(super) fn check(env: &Environment, expr: &IdedExpr) -> Result<(), CompileFailure> {
    let mut checker = Checker { env, locals: Vec::new() };
    checker.visit(expr)
}

struct Checker<'a> {
    env: &'a Environment,
    locals: Vec<&'a str>,
}

impl<'a> Checker<'a> {
    fn visit(&mut self, expr: &'a IdedExpr) -> Result<(), CompileFailure> {
        match &expr.expr {
            Expr::Unspecified | Expr::Literal(_) => Ok(()),

            Expr::Ident(name) => {
                if self.is_local(name) || self.env.variable(name).is_some() {
                    Ok(())
                } else {
                    Err(CompileFailure::UnknownVariable(name.clone()))
                }
            }

            Expr::Select(select) => self.visit(&select.operand),

            Expr::List(list) => list.elements.iter().try_for_each(|e| self.visit(e)),

            Expr::Map(map) => map.entries.iter().try_for_each(|e| self.visit_entry(&e.expr)),

            Expr::Struct(s) => s.entries.iter().try_for_each(|e| self.visit_entry(&e.expr)),

            Expr::Comprehension(comp) => {
                self.visit(&comp.iter_range)?;
                self.visit(&comp.accu_init)?;

                let depth = self.locals.len();
                self.locals.push(&comp.iter_var);
                if let Some(second) = &comp.iter_var2 {
                    self.locals.push(second);
                }
                self.locals.push(&comp.accu_var);

                let result = self
                    .visit(&comp.loop_cond)
                    .and_then(|()| self.visit(&comp.loop_step))
                    .and_then(|()| self.visit(&comp.result));

                self.locals.truncate(depth);
                result
            }

            Expr::Call(call) => {
                let args: Vec<&'a IdedExpr> = call.target.as_deref().into_iter().chain(&call.args).collect();
                let name = call.func_name.as_str();

                if !is_operator(name) {
                    self.check_call(name, &args)?;
                }

                args.into_iter().try_for_each(|arg| self.visit(arg))
            }
        }
    }

    fn visit_entry(&mut self, entry: &'a EntryExpr) -> Result<(), CompileFailure> {
        match entry {
            EntryExpr::StructField(field) => self.visit(&field.value),
            EntryExpr::MapEntry(entry) => {
                self.visit(&entry.key)?;
                self.visit(&entry.value)
            }
        }
    }

    fn check_call(&self, name: &str, args: &[&'a IdedExpr]) -> Result<(), CompileFailure> {
        let Some(function) = builtin(name) else {
            return if self.env.declares_function(name) {
                Ok(())
            } else {
                Err(CompileFailure::UnknownFunction(name.to_string()))
            };
        };

        let candidates: Vec<_> = function.overloads.iter().filter(|o| o.params.len() == args.len()).collect();
        if candidates.is_empty() {
            return Err(CompileFailure::WrongArgumentCount {
                function: function.name,
                found: args.len(),
            });
        }

        let kinds: Vec<Option<&'static str>> = args.iter().map(|arg| self.static_type(arg)).collect();
        let accepted = candidates.iter().any(|overload| {
            overload
                .params
                .iter()
                .zip(&kinds)
                .all(|(param, kind)| kind.is_none_or(|kind| <&str>::from(param) == kind))
        });

        if accepted {
            Ok(())
        } else {
            let found: Vec<&str> = kinds.iter().map(|kind| kind.unwrap_or("dyn")).collect();
            Err(CompileFailure::NoMatchingOverload {
                function: function.name,
                found: found.join(", "),
            })
        }
    }

    /// The type name of `expr` when it can be known without running it.
    fn static_type(&self, expr: &IdedExpr) -> Option<&'static str> {
        match &expr.expr {
            Expr::Literal(val) => Some(match val {
                Val::String(_) => "string",
                Val::Boolean(_) => "bool",
                Val::Int(_) => "int",
                Val::UInt(_) => "uint",
                Val::Double(_) => "double",
                Val::Bytes(_) => "bytes",
                Val::Null => "null",
            }),
            Expr::Ident(name) if !self.is_local(name) => self.env.variable(name).map(<&str>::from),
            Expr::Select(select) if !select.test => {
                let owner = self.static_type(&select.operand)?;
                let object = OBJECT_TYPES.iter().find(|t| t.name == owner)?;
                object.field(&select.field).map(|f| f.ty)
            }
            _ => None,
        }
    }

    fn is_local(&self, name: &str) -> bool {
        self.locals.iter().rev().any(|local| *local == name)
    }
}

/// Operators reach the parser as internal names (`_==_`, `!_`, `@in`) no expression can call.
fn is_operator(name: &str) -> bool {
    name.starts_with('_') || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use cel_parser::Parser;

    fn check_str(env: &Environment, source: &str) -> Result<(), CompileFailure> {
        let expr = Parser::default().parse(source).unwrap();
        check(env, &expr)
    }

    fn env_with_token() -> Environment {
        let mut env = Environment::new();
        let _ = env.add_string_variable("token").unwrap();
        env
    }

    #[test]
    fn test_operators_are_not_functions() {
        let env = Environment::new();
        check_str(&env, "!(response.status == 200) && -1 < 0 || 'a' in ['a']").unwrap();
    }

    #[test]
    fn test_wrong_argument_count() {
        let env = Environment::new();
        let err = check_str(&env, r#"substr("hello", 1) == "e""#).unwrap_err();
        assert!(matches!(err, CompileFailure::WrongArgumentCount { function: "substr", found: 2 }));

        let err = check_str(&env, r#""hello".substr(1, 2, 3) == "e""#).unwrap_err();
        assert!(matches!(err, CompileFailure::WrongArgumentCount { function: "substr", found: 4 }));
    }

    #[test]
    fn test_receiver_counts_as_argument() {
        let env = Environment::new();
        check_str(&env, r#""hello".substr(1, 3) == "ell""#).unwrap();
        check_str(&env, r#"response.body.bcontains(b"x")"#).unwrap();
    }

    #[test]
    fn test_literal_kind_mismatch() {
        let env = Environment::new();
        let err = check_str(&env, r#"md5(b"abc") == """#).unwrap_err();
        assert!(matches!(err, CompileFailure::NoMatchingOverload { function: "md5", ref found } if found == "bytes"));

        let err = check_str(&env, r#"bcontains("hello", b"ell")"#).unwrap_err();
        assert!(matches!(err, CompileFailure::NoMatchingOverload { function: "bcontains", ref found } if found == "string, bytes"));
    }

    #[test]
    fn test_field_and_variable_kinds() {
        let env = env_with_token();
        check_str(&env, "md5(token) == md5(request.url.path)").unwrap();
        check_str(&env, "base64(response.body) == base64(request.method)").unwrap();

        let err = check_str(&env, r#"md5(response.body) == """#).unwrap_err();
        assert!(matches!(err, CompileFailure::NoMatchingOverload { function: "md5", .. }));

        let err = check_str(&env, "randomInt(response.status, token) > 0").unwrap_err();
        assert!(matches!(err, CompileFailure::NoMatchingOverload { ref found, .. } if found == "int, string"));
    }

    #[test]
    fn test_unknown_kinds_are_left_to_runtime() {
        let env = Environment::new();
        check_str(&env, r#"md5(response.headers["Server"]) == """#).unwrap();
        check_str(&env, "bcontains(response.body, bytes(response.content_type))").unwrap();
    }

    #[test]
    fn test_loop_variable_is_scoped_to_macro() {
        let env = Environment::new();
        check_str(&env, "[1, 2, 3].exists(x, x > 2)").unwrap();
        check_str(&env, "[1, 2].all(x, [3].exists(y, x < y))").unwrap();

        let err = check_str(&env, r#"[1].exists(x, x > 0) && x == "a""#).unwrap_err();
        assert!(matches!(err, CompileFailure::UnknownVariable(ref name) if name == "x"));

        let err = check_str(&env, "[1].map(x, x + 1).exists(y, x == y)").unwrap_err();
        assert!(matches!(err, CompileFailure::UnknownVariable(ref name) if name == "x"));
    }

    #[test]
    fn test_loop_variable_shadows_declared_kind() {
        let env = env_with_token();
        check_str(&env, r#"[b"a"].exists(token, bcontains(response.body, token))"#).unwrap();
    }

    #[test]
    fn test_unknown_function() {
        let env = Environment::new();
        let err = check_str(&env, r#"sha1("abc") == """#).unwrap_err();
        assert!(matches!(err, CompileFailure::UnknownFunction(ref name) if name == "sha1"));
    }
}
