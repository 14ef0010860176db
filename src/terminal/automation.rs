//! Compiling and running AppleScript.
//!
//! The OSA subsystem reports failures on two channels: compilation can fail
//! outright, and a script that "ran" can still leave an error record behind.
//! [`execute`] folds both into one [`OpenInTerminalError`].

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tempfile::TempPath;

use crate::error::OpenInTerminalError;

/// Side-channel error record filled in by a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRecord {
    pub message: String,
    pub number: Option<i32>,
}

impl ErrorRecord {
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty() && self.number.is_none()
    }

    /// Human readable description, the raw diagnostic text when there is one.
    pub fn description(&self) -> String {
        match (self.message.trim().is_empty(), self.number) {
            (false, _) => self.message.clone(),
            (true, Some(n)) => format!("AppleScript error {n}"),
            (true, None) => String::new(),
        }
    }

    /// Build a record from `osascript` stderr, e.g.
    /// `script.scpt: execution error: Not authorized to send Apple events to Terminal. (-1743)`.
    pub fn from_stderr(stderr: &str) -> Self {
        let message = stderr.trim().to_string();
        let number = message
            .strip_suffix(')')
            .and_then(|rest| rest.rsplit_once('('))
            .and_then(|(_, code)| code.parse::<i32>().ok());
        Self { message, number }
    }
}

/// Compile-and-run capability for automation scripts.
pub trait ScriptEngine {
    type Script;

    /// `None` when the source cannot be turned into a runnable script.
    fn compile(&self, source: &str) -> Option<Self::Script>;

    /// Run a compiled script. The returned record, if any, is the subsystem's
    /// error report; its absence means success.
    fn run(&self, script: &Self::Script) -> Option<ErrorRecord>;
}

pub fn execute<E: ScriptEngine>(engine: &E, source: &str) -> Result<(), OpenInTerminalError> {
    let script = engine
        .compile(source)
        .ok_or(OpenInTerminalError::FailedToInitializeAppleScript)?;

    match engine.run(&script) {
        Some(record) if !record.is_empty() => Err(OpenInTerminalError::FailedToExecuteAppleScript(
            record.description(),
        )),
        _ => Ok(()),
    }
}

/// Error record for a finished `osascript` run.
///
/// Anything on stderr counts as an error report, even with exit status 0.
/// A failing exit with nothing on stderr gets a synthesized message.
pub fn run_outcome(status: ExitStatus, stderr: &str) -> Option<ErrorRecord> {
    if !stderr.trim().is_empty() {
        return Some(ErrorRecord::from_stderr(stderr));
    }
    if !status.success() {
        return Some(ErrorRecord {
            message: format!("osascript exited with {status}"),
            number: None,
        });
    }
    None
}

/// Runs scripts through `osacompile` and `osascript`.
#[derive(Debug, Clone)]
pub struct OsaScriptEngine {
    scratch_dir: PathBuf,
}

impl Default for OsaScriptEngine {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl ScriptEngine for OsaScriptEngine {
    /// Compiled `.scpt` file, deleted when the handle drops.
    type Script = TempPath;

    fn compile(&self, source: &str) -> Option<TempPath> {
        // Owned up front so a partial output file is removed on every path
        let compiled = match tempfile::Builder::new()
            .prefix("openterm-")
            .suffix(".scpt")
            .tempfile_in(&self.scratch_dir)
        {
            Ok(file) => file.into_temp_path(),
            Err(e) => {
                tracing::debug!("Failed to create script file: {e}");
                return None;
            }
        };

        let mut child = match Command::new("osacompile")
            .arg("-o")
            .arg(compiled.as_os_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!("Failed to spawn osacompile: {e}");
                return None;
            }
        };

        // osacompile reads the source from stdin when no input file is given
        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(source.as_bytes())
        {
            tracing::debug!("Failed to write script to osacompile: {e}");
        }

        let output = child.wait_with_output().ok()?;
        if !output.status.success() {
            tracing::debug!(
                "osacompile rejected script: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }
        Some(compiled)
    }

    fn run(&self, script: &TempPath) -> Option<ErrorRecord> {
        let output = match Command::new("osascript").arg(script.as_os_str()).output() {
            Ok(output) => output,
            Err(e) => {
                return Some(ErrorRecord {
                    message: format!("Failed to run osascript: {e}"),
                    number: None,
                });
            }
        };

        run_outcome(output.status, &String::from_utf8_lossy(&output.stderr))
    }
}
