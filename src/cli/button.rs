use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::config::Config;
use crate::terminal::script::join_commands;
use crate::terminal::{LaunchResult, OsaScriptEngine, SupportedTerminal, SystemWorkspace, TerminalOpener};

type Opener = TerminalOpener<SystemWorkspace, OsaScriptEngine>;

struct App {
    opener: Arc<Opener>,
    location: PathBuf,
    commands: Vec<String>,
    terminals: Vec<(SupportedTerminal, Option<PathBuf>)>,
    pending: Option<Receiver<Result<LaunchResult>>>,
    status: Option<(String, Color)>,
}

impl App {
    fn new(opener: Opener, location: PathBuf, commands: Vec<String>) -> Self {
        let terminals = opener.installed();
        Self {
            opener: Arc::new(opener),
            location,
            commands,
            terminals,
            pending: None,
            status: None,
        }
    }

    fn selected(&self) -> Option<SupportedTerminal> {
        self.terminals
            .iter()
            .find(|(_, location)| location.is_some())
            .map(|(terminal, _)| *terminal)
    }

    fn rescan(&mut self) {
        self.terminals = self.opener.installed();
        self.status = Some(("Rescanned installed terminals".into(), Color::DarkGray));
    }

    /// Launch on a worker thread; the draw loop picks up the result.
    fn press(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let opener = self.opener.clone();
        let location = self.location.clone();
        let commands = self.commands.clone();
        std::thread::spawn(move || {
            let _ = tx.send(opener.open(&location, Some(&commands)));
        });
        self.pending = Some(rx);
        self.status = Some(("Opening…".into(), Color::Yellow));
    }

    fn poll(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("launch thread exited")),
        };
        self.pending = None;

        let now = chrono::Local::now().format("%H:%M:%S");
        self.status = Some(match outcome {
            Ok(Ok(terminal)) => (
                format!("Opened in {} at {now}", terminal.display_name()),
                Color::Green,
            ),
            Ok(Err(e)) => (format!("{e}"), Color::Red),
            Err(e) => (format!("Open failed: {e}"), Color::Red),
        });
    }

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(self.terminals.len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let commands = if self.commands.is_empty() {
            Span::styled("(none, opens the folder only)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(join_commands(&self.commands))
        };
        let target = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Location  ", Style::default().fg(Color::Cyan)),
                Span::raw(self.location.display().to_string()),
            ]),
            Line::from(vec![Span::styled("Commands  ", Style::default().fg(Color::Cyan)), commands]),
        ])
        .block(Block::default().borders(Borders::ALL).title(" openterm "));
        frame.render_widget(target, chunks[0]);

        let selected = self.selected();
        let items: Vec<ListItem> = self
            .terminals
            .iter()
            .map(|(terminal, location)| {
                let (marker, style) = match (Some(*terminal) == selected, location) {
                    (true, _) => ("●", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    (false, Some(_)) => ("○", Style::default().fg(Color::White)),
                    (false, None) => ("○", Style::default().fg(Color::DarkGray)),
                };
                let installed_at = location
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "not installed".into());
                ListItem::new(Line::from(Span::styled(
                    format!(" {marker} {:<8} {installed_at}", terminal.display_name()),
                    style,
                )))
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Terminals "));
        frame.render_widget(list, chunks[1]);

        let (label, style) = match (&self.pending, selected) {
            (Some(_), _) => ("Opening…".to_string(), Style::default().fg(Color::Yellow)),
            (None, Some(t)) => (
                format!("Open in {}", t.display_name()),
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            (None, None) => ("Open in Terminal".to_string(), Style::default().fg(Color::DarkGray)),
        };
        let button = Paragraph::new(Line::from(Span::styled(format!("  {label}  "), style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, chunks[2]);

        let (status_text, status_color) = match &self.status {
            Some((msg, color)) => (msg.clone(), *color),
            None => ("Press Enter to open".to_string(), Color::DarkGray),
        };
        let status = Paragraph::new(Line::from(Span::styled(
            format!(" {status_text}"),
            Style::default().fg(status_color),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[3]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Cyan)),
            Span::raw(":open  "),
            Span::styled("r", Style::default().fg(Color::Cyan)),
            Span::raw(":rescan  "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(":quit"),
        ]));
        frame.render_widget(help, chunks[4]);
    }
}

pub fn run(config: &Config, location: PathBuf, commands: Vec<String>) -> Result<()> {
    let opener = TerminalOpener::system(config.extra_app_dirs.clone(), config.open_configuration());
    let mut app = App::new(opener, location, commands);

    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), LeaveAlternateScreen)?;

    if let Some((msg, Color::Red)) = &app.status {
        tracing::warn!("Last launch failed: {msg}");
    }
    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll();
        terminal.draw(|f| app.draw(f))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter | KeyCode::Char(' ') => app.press(),
                KeyCode::Char('r') => app.rescan(),
                _ => {}
            }
        }
    }
}
