use super::Host;
use super::common::{VarArgs, format_value};
use crate::Result;
use crate::env::Environment;
use crate::eval::evaluate;
use crate::rules::{Capture, RuleSet, Verdict, evaluate_rules};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{IntoAppError, app_err};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Path to a rule set file
    #[arg(long, short = 'r', value_name = "PATH", required_unless_present = "expression", conflicts_with = "expression")]
    pub rules: Option<Utf8PathBuf>,

    /// Evaluate a single expression instead of a rule set
    #[arg(long, short = 'e', value_name = "EXPRESSION")]
    pub expression: Option<String>,

    /// Path to a capture file holding the request and response to evaluate against
    #[arg(long, short = 'c', value_name = "PATH")]
    pub capture: Utf8PathBuf,

    #[command(flatten)]
    pub vars: VarArgs,
}

pub fn process_eval<H: Host>(host: &mut H, args: &EvalArgs) -> Result<()> {
    let capture = Capture::load(&args.capture)?;

    match (&args.rules, &args.expression) {
        (_, Some(expression)) => eval_expression(host, expression, &capture, &args.vars),
        (Some(rules), None) => eval_rules(host, rules, &capture, &args.vars),
        (None, None) => Err(app_err!("either --rules or --expression must be given")),
    }
}

fn eval_expression<H: Host>(host: &mut H, expression: &str, capture: &Capture, vars: &VarArgs) -> Result<()> {
    let rule_set = RuleSet::default();
    let env = rule_set.environment(&Environment::new(), vars.names())?;
    let bindings = rule_set.bindings(capture, &vars.values());

    match evaluate(&env, expression, &bindings) {
        Ok(value) => {
            let _ = writeln!(host.output(), "{}", format_value(&value));
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Expression failed at {} stage: {e}", e.stage());
            host.fail();
            Err(e).into_app_err("evaluating expression")
        }
    }
}

fn eval_rules<H: Host>(host: &mut H, path: &Utf8Path, capture: &Capture, vars: &VarArgs) -> Result<()> {
    let rule_set = RuleSet::load(path)?;
    let env = rule_set.environment(&Environment::new(), vars.names())?;
    let compiled = rule_set.compile(&env);
    let outcomes = evaluate_rules(&compiled, &rule_set.bindings(capture, &vars.values()));

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.verdict {
            Verdict::Matched => {
                let _ = writeln!(host.output(), "✅ {}: matched", outcome.name);
            }
            Verdict::NotMatched => {
                let _ = writeln!(host.output(), "➖ {}: not matched", outcome.name);
            }
            Verdict::Failed(e) => {
                failed += 1;
                let _ = writeln!(host.output(), "❌ {}: {} error: {e}", outcome.name, e.stage());
            }
        }
    }

    if failed > 0 {
        let _ = writeln!(host.error(), "❌ {failed} of {} rules could not be evaluated", outcomes.len());
        host.fail();
        return Err(app_err!("{failed} of {} rules could not be evaluated", outcomes.len()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::CapturedHost;
    use std::fs;
    use tempfile::TempDir;

    const CAPTURE: &str = r#"
[request]
url = "http://example.com/login"
method = "GET"

[response]
url = "http://example.com/login"
status = 200
content_type = "text/html"
body = "<title>Acme Admin</title>"

[response.headers]
Server = "nginx"
"#;

    fn write(dir: &TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn args(rules: Option<Utf8PathBuf>, expression: Option<&str>, capture: Utf8PathBuf, vars: &[(&str, &str)]) -> EvalArgs {
        EvalArgs {
            rules,
            expression: expression.map(str::to_string),
            capture,
            vars: VarArgs {
                vars: vars.iter().map(|(n, v)| ((*n).to_string(), (*v).to_string())).collect(),
            },
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_eval_rules_reports_each_rule() {
        let dir = TempDir::new().unwrap();
        let capture = write(&dir, "capture.toml", CAPTURE);
        let rules = write(
            &dir,
            "rules.toml",
            r#"
[[rules]]
name = "acme"
expression = 'response.status == 200 && bcontains(response.body, b"Acme")'

[[rules]]
name = "apache"
expression = 'response.headers["Server"] == "apache"'
"#,
        );

        let mut host = CapturedHost::new();
        process_eval(&mut host, &args(Some(rules), None, capture, &[])).unwrap();

        let out = host.stdout_text();
        assert!(out.contains("acme: matched"), "{out}");
        assert!(out.contains("apache: not matched"), "{out}");
        assert_eq!(host.exit_code, None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_eval_rules_failure_exits_nonzero() {
        let dir = TempDir::new().unwrap();
        let capture = write(&dir, "capture.toml", CAPTURE);
        let rules = write(
            &dir,
            "rules.toml",
            r#"
[[rules]]
name = "broken"
expression = "nosuch == 1"
"#,
        );

        let mut host = CapturedHost::new();
        let _ = process_eval(&mut host, &args(Some(rules), None, capture, &[])).unwrap_err();

        assert!(host.stdout_text().contains("broken: compile error"), "{}", host.stdout_text());
        assert!(host.stderr_text().contains("1 of 1 rules"));
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_eval_expression_prints_value() {
        let dir = TempDir::new().unwrap();
        let capture = write(&dir, "capture.toml", CAPTURE);

        let mut host = CapturedHost::new();
        process_eval(&mut host, &args(None, Some("md5(token)"), capture, &[("token", "abc")])).unwrap();
        assert_eq!(host.stdout_text().trim(), "\"900150983cd24fb0d6963f7d28e17f72\"");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_eval_expression_reports_stage() {
        let dir = TempDir::new().unwrap();
        let capture = write(&dir, "capture.toml", CAPTURE);

        let mut host = CapturedHost::new();
        let _ = process_eval(&mut host, &args(None, Some("request.method +"), capture, &[])).unwrap_err();
        assert!(host.stderr_text().contains("compile stage"), "{}", host.stderr_text());
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_missing_capture() {
        let mut host = CapturedHost::new();
        let result = process_eval(&mut host, &args(None, Some("true"), Utf8PathBuf::from("/nonexistent/capture.toml"), &[]));
        let _ = result.unwrap_err();
    }
}
