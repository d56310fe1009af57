//! Command-line interface for celprobe
//!
//! This module implements the CLI commands on top of the rule set, environment, and
//! evaluation modules.
//!
//! # Commands
//!
//! - **eval**: Load a capture file and evaluate either a rule set or a single expression
//!   against it, printing one line per rule (or the expression's value)
//! - **check**: Compile every rule in a rule set and report compile errors without
//!   needing a capture
//! - **env**: Print the declared variables, object types, and function overloads
//!
//! String variables can be declared, and bound, with `--var NAME=VALUE` on any command.
//! Commands that find failing rules write them to the host's error stream and exit with
//! status 1.

mod check;
mod common;
mod env;
mod eval;
mod host;
mod run;

pub use check::{CheckArgs, check_rules};
pub use env::{EnvArgs, show_env};
pub use eval::{EvalArgs, process_eval};
pub use host::Host;
pub use run::run;
