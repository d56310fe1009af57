use super::Host;
use super::common::VarArgs;
use crate::Result;
use crate::env::Environment;
use crate::rules::RuleSet;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Include the variables declared by a rule set file
    #[arg(long, short = 'r', value_name = "PATH")]
    pub rules: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub vars: VarArgs,
}

/// Print the variables, object types, and functions available to expressions.
pub fn show_env<H: Host>(host: &mut H, args: &EnvArgs) -> Result<()> {
    let rule_set = match &args.rules {
        Some(path) => RuleSet::load(path)?,
        None => RuleSet::default(),
    };

    let env = rule_set.environment(&Environment::new(), args.vars.names())?;
    let _ = write!(host.output(), "{env}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::CapturedHost;

    #[test]
    fn test_default_environment() {
        let mut host = CapturedHost::new();
        show_env(&mut host, &EnvArgs { rules: None, vars: VarArgs::default() }).unwrap();

        let out = host.stdout_text();
        assert!(out.contains("request"), "{out}");
        assert!(out.contains("response"), "{out}");
        assert!(out.contains("bcontains"), "{out}");
    }

    #[test]
    fn test_extra_variable() {
        let mut host = CapturedHost::new();
        let args = EnvArgs {
            rules: None,
            vars: VarArgs {
                vars: vec![("token".to_string(), String::new())],
            },
        };
        show_env(&mut host, &args).unwrap();
        assert!(host.stdout_text().contains("token"));
    }

    #[test]
    fn test_invalid_variable_name() {
        let mut host = CapturedHost::new();
        let args = EnvArgs {
            rules: None,
            vars: VarArgs {
                vars: vec![("1bad".to_string(), String::new())],
            },
        };
        let _ = show_env(&mut host, &args).unwrap_err();
    }
}
