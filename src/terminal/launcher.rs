use std::path::Path;

use anyhow::Result;

use super::automation::{ScriptEngine, execute};
use super::model::{LaunchResult, SupportedTerminal};
use super::resolver::application_location;
use super::script::render;
use super::workspace::{OpenConfiguration, Workspace};
use crate::error::OpenInTerminalError;

/// Open `location` in `terminal`, running `commands` if there are any.
///
/// Without commands the location is handed to the application directly and
/// no script is involved. Errors from the platform open call are returned as
/// the outer error; the inner result carries the launch outcome.
pub fn launch<W: Workspace, E: ScriptEngine>(
    workspace: &W,
    engine: &E,
    config: &OpenConfiguration,
    location: &Path,
    commands: Option<&[String]>,
    terminal: SupportedTerminal,
) -> Result<LaunchResult> {
    match commands {
        Some(commands) if !commands.is_empty() => Ok(run_commands(engine, commands, terminal)),
        _ => open_location(workspace, config, location, terminal),
    }
}

fn open_location<W: Workspace>(
    workspace: &W,
    config: &OpenConfiguration,
    location: &Path,
    terminal: SupportedTerminal,
) -> Result<LaunchResult> {
    let Some(app) = application_location(workspace, terminal) else {
        return Ok(Err(OpenInTerminalError::NoTerminalFound));
    };
    workspace.open(location, &app, config)?;
    Ok(Ok(terminal))
}

fn run_commands<E: ScriptEngine>(
    engine: &E,
    commands: &[String],
    terminal: SupportedTerminal,
) -> LaunchResult {
    let script = render(terminal.template(), commands);
    execute(engine, &script).map(|()| terminal)
}
