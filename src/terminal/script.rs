//! AppleScript templates and command rendering.
//!
//! Each template carries a single `COMMANDS_PLACEHOLDER` that is replaced with
//! the caller's commands joined by `;`. Commands are not escaped: a command
//! containing `"` or `\` ends up inside the AppleScript string literal as-is
//! and can break the script.

pub const COMMANDS_PLACEHOLDER: &str = "COMMANDS_PLACEHOLDER";

pub const COMMAND_DELIMITER: &str = ";";

/// Activate Terminal.app and run the commands in a new window.
pub const TERMINAL_SCRIPT: &str = r#"-- AppleScript
tell application "Terminal"
    activate
    -- Open a new window and execute the command
    do script "COMMANDS_PLACEHOLDER"
end tell
"#;

/// Reuse the current iTerm2 window (or create one), open a new tab and write
/// the commands into its session.
pub const ITERM2_SCRIPT: &str = r#"-- AppleScript
tell application "iTerm"
    try
        set currentWindow to current window
    on error
        set currentWindow to (create window with default profile)
    end try

    tell currentWindow
        set newTab to (create tab with default profile)
        tell newTab
            -- Every tab has at least one session
            set currentSession to current session
            tell currentSession
                write text "COMMANDS_PLACEHOLDER"
            end tell
        end tell
        if is hotkey window then
            reveal hotkey window
        else
            select
        end if
    end tell
end tell
"#;

pub fn join_commands<S: AsRef<str>>(commands: &[S]) -> String {
    commands
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(COMMAND_DELIMITER)
}

/// Substitute the joined commands for the first placeholder in `template`.
pub fn render<S: AsRef<str>>(template: &str, commands: &[S]) -> String {
    template.replacen(COMMANDS_PLACEHOLDER, &join_commands(commands), 1)
}
