use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::config::Config;
use crate::terminal::{SupportedTerminal, TerminalOpener, script};

#[derive(Parser)]
#[command(name = "openterm", version, about = "Open a folder in your terminal, optionally running commands")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a location in the preferred installed terminal
    Open {
        /// Location to open (defaults to the configured location, then the cwd)
        path: Option<PathBuf>,

        /// Command to run after opening; repeat for several
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,

        /// Do not bring the terminal to the foreground
        #[arg(long)]
        background: bool,
    },

    /// Show which supported terminals are installed
    Detect,

    /// Interactive "Open in Terminal" button
    Button {
        /// Location to open
        path: Option<PathBuf>,

        /// Command to run after opening; repeat for several
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,
    },

    /// Serve the HTTP endpoint and web button
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the effective configuration
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
    },

    /// Print the AppleScript that would drive a terminal
    Script {
        /// terminal or iterm2
        terminal: SupportedTerminal,

        /// Command to embed; repeat for several
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,
    },
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };
    match command {
        Command::Open {
            path,
            commands,
            background,
        } => {
            let mut cfg = Config::load(cli.config.as_ref())?;
            if background {
                cfg.activate = false;
            }
            open_cli(&cfg, path, commands)?;
        }
        Command::Detect => {
            let cfg = Config::load(cli.config.as_ref())?;
            detect_cli(&cfg);
        }
        Command::Button { path, commands } => {
            let cfg = Config::load(cli.config.as_ref())?;
            let location = cfg.resolve_location(path)?;
            super::button::run(&cfg, location, commands)?;
        }
        Command::Serve { port, bind } => {
            let mut cfg = Config::load(cli.config.as_ref())?;
            if let Some(p) = port {
                cfg.port = p;
            }
            if let Some(b) = bind {
                cfg.bind = b;
            }
            crate::server::start(cfg).await?;
        }
        Command::Config { path } => {
            let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
            if path {
                println!("{}", config_path.display());
            } else {
                let cfg = Config::load(Some(&config_path))?;
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        }
        Command::Script { terminal, commands } => {
            print!("{}", script::render(terminal.template(), &commands));
        }
    }
    Ok(())
}

fn open_cli(cfg: &Config, path: Option<PathBuf>, commands: Vec<String>) -> Result<()> {
    let location = cfg.resolve_location(path)?;
    let opener = TerminalOpener::system(cfg.extra_app_dirs.clone(), cfg.open_configuration());

    tracing::debug!("Opening {} with {} command(s)", location.display(), commands.len());
    match opener.open(&location, Some(&commands))? {
        Ok(terminal) => {
            println!("Opened {} in {}", location.display(), terminal.display_name());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to open {}: {e}", location.display());
            anyhow::bail!(e)
        }
    }
}

fn detect_cli(cfg: &Config) {
    let opener = TerminalOpener::system(cfg.extra_app_dirs.clone(), cfg.open_configuration());
    let installed = opener.installed();
    let selected = opener.resolve();

    for (terminal, location) in &installed {
        let marker = if Some(*terminal) == selected { "*" } else { " " };
        let location = location
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not installed".into());
        println!(
            "{marker} {:<8} {:<24} {location}",
            terminal.display_name(),
            terminal.bundle_id()
        );
    }
    if selected.is_none() {
        println!("No supported terminal found");
    }
}
