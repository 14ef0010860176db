use serde::{Deserialize, Serialize};

use crate::error::OpenInTerminalError;

/// Result of a single launch: the terminal that was driven, or why none was.
pub type LaunchResult = Result<SupportedTerminal, OpenInTerminalError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SupportedTerminal {
    Terminal,
    ITerm2,
}

/// Selection order used by the resolver. Every variant appears exactly once.
pub const PRIORITY: [SupportedTerminal; 2] = [SupportedTerminal::ITerm2, SupportedTerminal::Terminal];

impl SupportedTerminal {
    pub const ALL: [SupportedTerminal; 2] = [SupportedTerminal::Terminal, SupportedTerminal::ITerm2];

    /// Bundle identifier used to locate the application.
    pub fn bundle_id(&self) -> &'static str {
        match self {
            SupportedTerminal::Terminal => "com.apple.Terminal",
            SupportedTerminal::ITerm2 => "com.googlecode.iterm2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SupportedTerminal::Terminal => "Terminal",
            SupportedTerminal::ITerm2 => "iTerm2",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            SupportedTerminal::Terminal => super::script::TERMINAL_SCRIPT,
            SupportedTerminal::ITerm2 => super::script::ITERM2_SCRIPT,
        }
    }
}

impl std::fmt::Display for SupportedTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportedTerminal::Terminal => write!(f, "terminal"),
            SupportedTerminal::ITerm2 => write!(f, "iterm2"),
        }
    }
}

impl std::str::FromStr for SupportedTerminal {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "terminal" | "terminal.app" => Ok(SupportedTerminal::Terminal),
            "iterm2" | "iterm" | "iterm.app" => Ok(SupportedTerminal::ITerm2),
            other => SupportedTerminal::ALL
                .into_iter()
                .find(|t| t.bundle_id().eq_ignore_ascii_case(other))
                .ok_or_else(|| {
                    format!("Unknown terminal: {s}. Expected 'terminal' or 'iterm2'")
                }),
        }
    }
}
