use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ServerState;
use crate::error::OpenInTerminalError;
use crate::terminal::{ScriptEngine, SupportedTerminal, Workspace};

type AppState<W, E> = Arc<ServerState<W, E>>;

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn routes<W, E>() -> Router<AppState<W, E>>
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/terminals", get(list_terminals::<W, E>))
        .route("/api/open", post(open_location::<W, E>))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TerminalInfo {
    pub terminal: SupportedTerminal,
    pub name: String,
    pub bundle_id: String,
    pub location: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TerminalsResponse {
    pub selected: Option<SupportedTerminal>,
    pub terminals: Vec<TerminalInfo>,
}

async fn list_terminals<W, E>(
    State(state): State<AppState<W, E>>,
) -> Result<Json<TerminalsResponse>, ApiError>
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    let installed = state
        .installed()
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, "lookup_failed", e.to_string()))?;

    let selected = installed
        .iter()
        .find(|(_, location)| location.is_some())
        .map(|(terminal, _)| *terminal);
    let terminals = installed
        .into_iter()
        .map(|(terminal, location)| TerminalInfo {
            terminal,
            name: terminal.display_name().to_string(),
            bundle_id: terminal.bundle_id().to_string(),
            location,
        })
        .collect();

    Ok(Json(TerminalsResponse {
        selected,
        terminals,
    }))
}

#[derive(Deserialize)]
struct OpenRequest {
    location: PathBuf,
    commands: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenResponse {
    pub terminal: SupportedTerminal,
    pub launched_at: DateTime<Utc>,
}

async fn open_location<W, E>(
    State(state): State<AppState<W, E>>,
    Json(req): Json<OpenRequest>,
) -> Result<Json<OpenResponse>, ApiError>
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    if !req.location.is_absolute() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "invalid_location",
            "location must be an absolute path",
        ));
    }

    let commands = req.commands.filter(|c| !c.is_empty());
    if commands.is_some() && !state.config.allow_remote_commands {
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "commands_disabled",
            "running commands over HTTP is disabled (allow_remote_commands)",
        ));
    }

    let location = req.location;
    match state
        .opener
        .clone()
        .open_detached(location.clone(), commands)
        .await
    {
        Ok(Ok(terminal)) => {
            tracing::info!("Opened {} in {}", location.display(), terminal.display_name());
            Ok(Json(OpenResponse {
                terminal,
                launched_at: Utc::now(),
            }))
        }
        Ok(Err(e)) => {
            tracing::warn!("Failed to open {}: {e}", location.display());
            let status = match e {
                OpenInTerminalError::NoTerminalFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err(api_error(status, e.kind(), e.to_string()))
        }
        Err(e) => {
            tracing::error!("Open call failed for {}: {e:#}", location.display());
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "open_failed",
                format!("{e:#}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, Response};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::server::router;
    use crate::terminal::automation::ErrorRecord;
    use crate::terminal::fakes::{FakeEngine, FakeWorkspace};
    use crate::terminal::{OpenConfiguration, TerminalOpener};

    fn state(
        workspace: FakeWorkspace,
        engine: FakeEngine,
        allow_remote_commands: bool,
    ) -> Arc<ServerState<FakeWorkspace, FakeEngine>> {
        Arc::new(ServerState {
            opener: Arc::new(TerminalOpener::new(
                workspace,
                engine,
                OpenConfiguration::default(),
            )),
            config: Config {
                allow_remote_commands,
                ..Config::default()
            },
        })
    }

    async fn post_json(
        state: Arc<ServerState<FakeWorkspace, FakeEngine>>,
        uri: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        router(state).oneshot(request).await.unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).expect("valid json body")
    }

    #[tokio::test]
    async fn health_is_ok() {
        let state = state(FakeWorkspace::default(), FakeEngine::default(), false);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lists_terminals_with_selection() {
        let state = state(
            FakeWorkspace::with(&[SupportedTerminal::Terminal]),
            FakeEngine::default(),
            false,
        );
        let request = Request::builder()
            .uri("/api/terminals")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: TerminalsResponse = body_json(response).await;
        assert_eq!(body.selected, Some(SupportedTerminal::Terminal));
        assert_eq!(body.terminals.len(), 2);
        assert_eq!(body.terminals[0].terminal, SupportedTerminal::ITerm2);
        assert!(body.terminals[0].location.is_none());
    }

    #[tokio::test]
    async fn open_without_terminal_is_not_found() {
        let state = state(FakeWorkspace::default(), FakeEngine::default(), false);
        let response = post_json(state, "/api/open", serde_json::json!({ "location": "/Users" })).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = body_json(response).await;
        assert_eq!(body.error, "no_terminal_found");
    }

    #[tokio::test]
    async fn open_location_uses_direct_path() {
        let state = state(
            FakeWorkspace::with(&[SupportedTerminal::ITerm2]),
            FakeEngine::default(),
            false,
        );
        let response = post_json(
            state,
            "/api/open",
            serde_json::json!({ "location": "/Users", "commands": [] }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: OpenResponse = body_json(response).await;
        assert_eq!(body.terminal, SupportedTerminal::ITerm2);
    }

    #[tokio::test]
    async fn commands_rejected_unless_enabled() {
        let state = state(
            FakeWorkspace::with(&[SupportedTerminal::Terminal]),
            FakeEngine::default(),
            false,
        );
        let response = post_json(
            state,
            "/api/open",
            serde_json::json!({ "location": "/Users", "commands": ["ls"] }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn script_failure_is_reported() {
        let engine = FakeEngine {
            error: Some(ErrorRecord {
                message: "Terminal got an error".into(),
                number: None,
            }),
            ..Default::default()
        };
        let state = state(FakeWorkspace::with(&[SupportedTerminal::Terminal]), engine, true);
        let response = post_json(
            state,
            "/api/open",
            serde_json::json!({ "location": "/Users", "commands": ["ls", "pwd"] }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = body_json(response).await;
        assert_eq!(body.error, "failed_to_execute_apple_script");
        assert!(body.message.contains("Terminal got an error"));
    }

    #[tokio::test]
    async fn relative_location_is_rejected() {
        let state = state(
            FakeWorkspace::with(&[SupportedTerminal::Terminal]),
            FakeEngine::default(),
            false,
        );
        let response =
            post_json(state, "/api/open", serde_json::json!({ "location": "Users" })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
