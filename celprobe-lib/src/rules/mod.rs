//! Rule sets and captured exchanges
//!
//! A [`RuleSet`] is loaded from TOML: a `[variables]` table of string variables with
//! default values, and a list of `[[rules]]`, each a named expression. A [`Capture`] is a
//! recorded request/response pair, also in TOML. Compiling a rule set keeps per-rule
//! compile errors so a single bad rule does not hide the results of the others.

mod capture;
mod rule;
mod rule_set;

pub use capture::Capture;
pub use rule::Rule;
pub use rule_set::{CompiledRule, RuleOutcome, RuleSet, Verdict, evaluate_rules};
