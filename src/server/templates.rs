use std::sync::Arc;

use askama::Template;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;

use super::ServerState;
use crate::terminal::{ScriptEngine, Workspace};

type AppState<W, E> = Arc<ServerState<W, E>>;

pub fn routes<W, E>() -> Router<AppState<W, E>>
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    Router::new().route("/", get(index_page::<W, E>))
}

struct TerminalRow {
    name: &'static str,
    location: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    terminals: Vec<TerminalRow>,
    button_label: String,
    location: String,
    allow_commands: bool,
}

async fn index_page<W, E>(State(state): State<AppState<W, E>>) -> impl IntoResponse
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    let installed = match state.installed().await {
        Ok(installed) => installed,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Lookup failed: {e}")).into_response();
        }
    };

    let selected = installed
        .iter()
        .find(|(_, location)| location.is_some())
        .map(|(terminal, _)| *terminal);
    let terminals = installed
        .iter()
        .map(|(terminal, location)| TerminalRow {
            name: terminal.display_name(),
            location: location
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not installed".into()),
            selected: Some(*terminal) == selected,
        })
        .collect();

    let location = state
        .config
        .default_location
        .clone()
        .or_else(dirs::home_dir)
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let template = IndexTemplate {
        terminals,
        button_label: match selected {
            Some(terminal) => format!("Open in {}", terminal.display_name()),
            None => "Open in Terminal".into(),
        },
        location,
        allow_commands: state.config.allow_remote_commands,
    };
    HtmlTemplate(template).into_response()
}

struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> axum::response::Response {
        match self.0.render() {
            Ok(html) => axum::response::Html(html).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {e}"),
            )
                .into_response(),
        }
    }
}
