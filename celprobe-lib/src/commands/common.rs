//! Arguments and helpers shared between commands.

use cel_interpreter::Value;
use clap::{Args, ValueEnum};
use std::collections::BTreeMap;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when running more than once in-process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// String variables given on the command line
#[derive(Args, Debug, Default)]
pub struct VarArgs {
    /// Declare a string variable, optionally binding it to a value
    #[arg(long = "var", value_name = "NAME[=VALUE]", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

impl VarArgs {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn values(&self) -> BTreeMap<String, String> {
        self.vars.iter().cloned().collect()
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once('=').unwrap_or((s, ""));
    if name.is_empty() {
        return Err(format!("missing variable name in '{s}'"));
    }

    Ok((name.to_string(), value.to_string()))
}

/// Render an expression result for the console.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => format!("{u}u"),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("{:?}", s.as_str()),
        Value::Bytes(b) => format!("b{:?}", String::from_utf8_lossy(b)),
        Value::Null => "null".to_string(),
        other => format!("{other:?}"),
    }
}
