use super::{Capture, Rule};
use crate::Result;
use crate::env::Environment;
use crate::eval::{Bindings, CompiledExpression, EvalError, Stage, compile};
use camino::Utf8Path;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::sync::Arc;

const LOG_TARGET: &str = "     rules";

/// A set of fingerprint rules plus the string variables they share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// String variables declared for every rule, with their default values
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A rule with the outcome of compiling its expression.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: Rule,
    program: Result<CompiledExpression, Arc<EvalError>>,
}

impl CompiledRule {
    #[must_use]
    pub const fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The compile error, if the expression did not compile.
    #[must_use]
    pub fn error(&self) -> Option<&EvalError> {
        self.program.as_ref().err().map(Arc::as_ref)
    }
}

/// What happened when one rule was evaluated.
#[derive(Debug)]
pub enum Verdict {
    Matched,
    NotMatched,
    Failed(Arc<EvalError>),
}

impl Verdict {
    /// The failed stage, if any.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Failed(e) => Some(e.stage()),
            Self::Matched | Self::NotMatched => None,
        }
    }
}

#[derive(Debug)]
pub struct RuleOutcome {
    pub name: String,
    pub verdict: Verdict,
}

impl RuleSet {
    /// Load a rule set from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading rule set '{path}'"))?;
        let rule_set: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing rule set '{path}'"))?;
        rule_set.validate()?;

        log::debug!(target: LOG_TARGET, "Loaded {} rules from '{path}'", rule_set.rules.len());
        Ok(rule_set)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(app_err!("rule '{}' is defined more than once", rule.name()));
            }
        }

        Ok(())
    }

    /// An environment declaring this rule set's variables, and any `extra` ones, on top of `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable name cannot be declared
    pub fn environment<'a>(&'a self, base: &Environment, extra: impl IntoIterator<Item = &'a str>) -> Result<Environment> {
        let mut env = base.clone();
        let _ = env
            .add_string_variables(self.variables.keys().map(String::as_str).chain(extra))
            .into_app_err("declaring rule set variables")?;
        Ok(env)
    }

    /// Compile every rule against `env`. Rules that fail to compile are kept, with their error.
    #[must_use]
    pub fn compile(&self, env: &Environment) -> Vec<CompiledRule> {
        self.rules
            .iter()
            .map(|rule| CompiledRule {
                rule: rule.clone(),
                program: compile(env, rule.expression()).map_err(Arc::new),
            })
            .collect()
    }

    /// Bindings for a capture plus this rule set's variables, with `overrides` taking precedence.
    #[must_use]
    pub fn bindings(&self, capture: &Capture, overrides: &BTreeMap<String, String>) -> Bindings {
        let mut bindings = capture.bindings();
        for (name, value) in self.variables.iter().chain(overrides) {
            let _ = bindings.insert(name.as_str(), value.as_str());
        }

        bindings
    }
}

/// Evaluate every compiled rule against `bindings`.
#[must_use]
pub fn evaluate_rules(rules: &[CompiledRule], bindings: &Bindings) -> Vec<RuleOutcome> {
    let outcomes: Vec<RuleOutcome> = rules
        .iter()
        .map(|compiled| {
            let verdict = match &compiled.program {
                Err(e) => Verdict::Failed(Arc::clone(e)),
                Ok(program) => match program.matches(bindings) {
                    Ok(true) => Verdict::Matched,
                    Ok(false) => Verdict::NotMatched,
                    Err(e) => Verdict::Failed(Arc::new(e)),
                },
            };

            RuleOutcome {
                name: compiled.rule.name().to_string(),
                verdict,
            }
        })
        .collect();

    let matched = outcomes.iter().filter(|o| matches!(o.verdict, Verdict::Matched)).count();
    log::info!(target: LOG_TARGET, "Evaluated {} rules, {matched} matched", outcomes.len());

    outcomes
}
