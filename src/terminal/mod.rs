//! Terminal resolution and launch.
//!
//! [`open_in_terminal`] picks the first installed terminal from [`PRIORITY`]
//! and either opens the location in it directly or, when commands are given,
//! drives it with an AppleScript. The platform capabilities are passed in as
//! [`Workspace`] and [`ScriptEngine`] values.

pub mod automation;
pub mod launcher;
pub mod model;
pub mod resolver;
pub mod script;
pub mod workspace;

#[cfg(test)]
pub(crate) mod fakes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

pub use automation::{OsaScriptEngine, ScriptEngine};
pub use model::{LaunchResult, PRIORITY, SupportedTerminal};
pub use workspace::{OpenConfiguration, SystemWorkspace, Workspace};

use crate::error::OpenInTerminalError;

pub fn open_in_terminal<W: Workspace, E: ScriptEngine>(
    workspace: &W,
    engine: &E,
    config: &OpenConfiguration,
    location: &Path,
    commands: Option<&[String]>,
) -> Result<LaunchResult> {
    let Some(terminal) = resolver::resolve_terminal(workspace) else {
        return Ok(Err(OpenInTerminalError::NoTerminalFound));
    };
    launcher::launch(workspace, engine, config, location, commands, terminal)
}

/// The platform capabilities plus open options, shared by every caller.
pub struct TerminalOpener<W, E> {
    workspace: W,
    engine: E,
    config: OpenConfiguration,
}

impl TerminalOpener<SystemWorkspace, OsaScriptEngine> {
    pub fn system(extra_app_dirs: Vec<PathBuf>, config: OpenConfiguration) -> Self {
        Self::new(
            SystemWorkspace::new(extra_app_dirs),
            OsaScriptEngine::default(),
            config,
        )
    }
}

impl<W: Workspace, E: ScriptEngine> TerminalOpener<W, E> {
    pub fn new(workspace: W, engine: E, config: OpenConfiguration) -> Self {
        Self {
            workspace,
            engine,
            config,
        }
    }

    pub fn resolve(&self) -> Option<SupportedTerminal> {
        resolver::resolve_terminal(&self.workspace)
    }

    pub fn installed(&self) -> Vec<(SupportedTerminal, Option<PathBuf>)> {
        resolver::installed_terminals(&self.workspace)
    }

    /// Blocking launch. Spawns external processes; keep it off UI threads.
    pub fn open(&self, location: &Path, commands: Option<&[String]>) -> Result<LaunchResult> {
        open_in_terminal(
            &self.workspace,
            &self.engine,
            &self.config,
            location,
            commands,
        )
    }
}

impl<W, E> TerminalOpener<W, E>
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    /// Run [`TerminalOpener::open`] on the blocking pool.
    pub async fn open_detached(
        self: Arc<Self>,
        location: PathBuf,
        commands: Option<Vec<String>>,
    ) -> Result<LaunchResult> {
        tokio::task::spawn_blocking(move || self.open(&location, commands.as_deref())).await?
    }
}
