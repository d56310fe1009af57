//! Command dispatch logic for celprobe

use super::common::{LogLevel, init_logging};
use super::{CheckArgs, EnvArgs, EvalArgs, check_rules, process_eval, show_env};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "celprobe", version, author)]
#[command(about = "Evaluate CEL fingerprint rules against captured HTTP traffic")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a rule set, or a single expression, against a captured request and response
    Eval(EvalArgs),
    /// Compile every rule in a rule set and report the ones that fail
    Check(CheckArgs),
    /// Show the variables, types, and functions available to expressions
    Env(EnvArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match &cli.command {
        Command::Eval(eval_args) => process_eval(host, eval_args),
        Command::Check(check_args) => check_rules(host, check_args),
        Command::Env(env_args) => show_env(host, env_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::CapturedHost;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eval() {
        let cli = Cli::parse_from(["celprobe", "eval", "-e", "true", "-c", "cap.toml", "--var", "a=b", "--var", "c"]);
        let Command::Eval(args) = cli.command else {
            panic!("expected eval");
        };
        assert_eq!(args.expression.as_deref(), Some("true"));
        assert_eq!(args.capture, "cap.toml");
        assert_eq!(args.vars.values().get("a").map(String::as_str), Some("b"));
        assert_eq!(args.vars.values().get("c").map(String::as_str), Some(""));
        assert_eq!(cli.log_level, LogLevel::None);
    }

    #[test]
    fn test_eval_rejects_rules_and_expression_together() {
        let result = Cli::try_parse_from(["celprobe", "eval", "-e", "true", "-r", "rules.toml", "-c", "cap.toml"]);
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_eval_needs_rules_or_expression() {
        let result = Cli::try_parse_from(["celprobe", "eval", "-c", "cap.toml"]);
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_global_log_level() {
        let cli = Cli::parse_from(["celprobe", "env", "--log-level", "debug"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_run_env() {
        let mut host = CapturedHost::new();
        run(&mut host, ["celprobe", "env", "--var", "token"]).unwrap();
        assert!(host.stdout_text().contains("token: string"), "{}", host.stdout_text());
    }
}
