use super::Host;
use super::common::VarArgs;
use crate::Result;
use crate::env::Environment;
use crate::rules::RuleSet;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::app_err;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to a rule set file
    #[arg(long, short = 'r', value_name = "PATH")]
    pub rules: Utf8PathBuf,

    #[command(flatten)]
    pub vars: VarArgs,
}

/// Compile every rule in a rule set without evaluating anything.
pub fn check_rules<H: Host>(host: &mut H, args: &CheckArgs) -> Result<()> {
    let rule_set = RuleSet::load(&args.rules)?;
    let env = rule_set.environment(&Environment::new(), args.vars.names())?;
    let compiled = rule_set.compile(&env);

    let failed: Vec<_> = compiled.iter().filter_map(|c| c.error().map(|e| (c.rule().name(), e))).collect();
    if failed.is_empty() {
        let _ = writeln!(host.output(), "All {} rules compiled successfully", compiled.len());
        return Ok(());
    }

    for (name, e) in &failed {
        let _ = writeln!(host.error(), "❌ {name}: {} error: {e}", e.stage());
    }

    host.fail();
    Err(app_err!("{} of {} rules failed to compile", failed.len(), compiled.len()))
}
