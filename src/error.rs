use thiserror::Error;

/// Outcome kinds of a launch that did not reach the terminal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenInTerminalError {
    #[error("No supported terminal found (install iTerm2 or Terminal)")]
    NoTerminalFound,

    #[error("Failed to initialize AppleScript")]
    FailedToInitializeAppleScript,

    #[error("Failed to execute AppleScript: {0}")]
    FailedToExecuteAppleScript(String),
}

impl OpenInTerminalError {
    /// Stable identifier used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            OpenInTerminalError::NoTerminalFound => "no_terminal_found",
            OpenInTerminalError::FailedToInitializeAppleScript => {
                "failed_to_initialize_apple_script"
            }
            OpenInTerminalError::FailedToExecuteAppleScript(_) => "failed_to_execute_apple_script",
        }
    }
}

#[derive(Error, Debug)]
pub enum OpentermError {
    #[error("Failed to open location: {0}")]
    Open(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_error_keeps_raw_description() {
        let err = OpenInTerminalError::FailedToExecuteAppleScript("Not authorized (-1743)".into());
        assert_eq!(err.to_string(), "Failed to execute AppleScript: Not authorized (-1743)");
        assert_eq!(err.kind(), "failed_to_execute_apple_script");
    }
}
