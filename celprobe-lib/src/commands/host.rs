use std::io::Write;

/// Exit status used when at least one rule failed to compile or evaluate.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Where a command sends its results, its diagnostics, and its exit status.
///
/// The binary wires this to the console; the command tests swap in [`CapturedHost`] so
/// rule verdicts and diagnostics can be asserted on.
pub trait Host: Send + Sync {
    /// Verdict lines, printed values, and environment listings.
    fn output(&mut self) -> impl Write;

    /// Compile, link, and execution diagnostics.
    fn error(&mut self) -> impl Write;

    /// End the command with `code`. Hosts that cannot terminate record it instead.
    fn exit(&mut self, code: i32);

    /// Report that some rule failed.
    fn fail(&mut self) {
        self.exit(FAILURE_EXIT_CODE);
    }
}

/// Keeps everything a command writes, plus the exit status it asked for.
#[cfg(test)]
pub struct CapturedHost {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl CapturedHost {
    pub const fn new() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: None,
        }
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[cfg(test)]
impl Host for CapturedHost {
    fn output(&mut self) -> impl Write {
        &mut self.stdout
    }

    fn error(&mut self) -> impl Write {
        &mut self.stderr
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
