pub mod api;
pub mod templates;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use rust_embed::Embed;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::terminal::{ScriptEngine, SupportedTerminal, TerminalOpener, Workspace};

#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

async fn serve_static(Path(path): Path<String>) -> impl IntoResponse {
    match StaticAssets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.data.into_owned(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub struct ServerState<W, E> {
    pub opener: Arc<TerminalOpener<W, E>>,
    pub config: Config,
}

impl<W, E> ServerState<W, E>
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    /// Installed terminals, looked up on the blocking pool.
    pub async fn installed(&self) -> Result<Vec<(SupportedTerminal, Option<PathBuf>)>> {
        let opener = self.opener.clone();
        Ok(tokio::task::spawn_blocking(move || opener.installed()).await?)
    }
}

pub fn router<W, E>(state: Arc<ServerState<W, E>>) -> Router
where
    W: Workspace + Send + Sync + 'static,
    E: ScriptEngine + Send + Sync + 'static,
{
    Router::new()
        .merge(api::routes::<W, E>())
        .merge(templates::routes::<W, E>())
        // Static files (embedded in binary)
        .route("/static/{*path}", axum::routing::get(serve_static))
        // CORS: deny all cross-origin requests (same-origin passes through)
        .layer(CorsLayer::new())
        .with_state(state)
}

pub async fn start(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let opener = TerminalOpener::system(config.extra_app_dirs.clone(), config.open_configuration());
    if config.allow_remote_commands {
        tracing::warn!("Remote commands enabled: POST /api/open will run shell commands");
    }
    let state = Arc::new(ServerState {
        opener: Arc::new(opener),
        config,
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("openterm v{} listening on http://{addr}", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, app).await?;
    Ok(())
}
