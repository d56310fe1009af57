//! Expression evaluation
//!
//! Evaluating an expression runs three stages, and a failure in any of them is reported as
//! an [`EvalError`] whose [`Stage`] says which one failed:
//!
//! 1. **Compile**: the text is parsed, every variable and function it references is checked
//!    against the [`Environment`](crate::env::Environment), and every builtin call is checked
//!    against the builtin's overloads as far as argument kinds are known without running it.
//!    Compiling freezes the environment.
//! 2. **Link**: a fresh engine context is built with the builtin functions registered and
//!    the [`Bindings`] converted to engine values. Bindings must match the declared types.
//! 3. **Execution**: the program runs. Builtin failures and engine errors end up here.
//!
//! Compiled expressions are independent of each other and can be executed concurrently.
//! Nothing here retries: a failure is final for that call.

mod bindings;
mod checker;
mod eval_error;
mod evaluator;

pub use bindings::{Binding, Bindings};
pub use eval_error::{CompileFailure, EvalError, LinkFailure, Stage};
pub use evaluator::{CompiledExpression, compile, evaluate};
