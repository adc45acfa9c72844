//! HTTP server wiring.
//!
//! All requests enter through a single dispatch function. It validates the
//! raw path with [`router::parse_path`] and checks the method before any
//! handler, and therefore any store access, can run.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Router};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::{self, SaveForm};
use crate::render::{HtmlRenderer, RenderSink};
use crate::router::{self, Operation};
use crate::storage::RecordStore;

/// State shared by every request. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Record storage.
    pub store: Arc<RecordStore>,
    /// Page renderer.
    pub renderer: Arc<dyn RenderSink>,
}

impl AppState {
    /// Bundle a store and a renderer.
    #[must_use]
    pub fn new(store: RecordStore, renderer: impl RenderSink + 'static) -> Self {
        Self {
            store: Arc::new(store),
            renderer: Arc::new(renderer),
        }
    }

    /// Open the store and compile the templates named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory can't be created or the
    /// templates can't be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = RecordStore::open(
            config.data_dir(),
            config.storage.extension.clone(),
            config.storage.write_mode,
        )?;
        let renderer = HtmlRenderer::load(config.render.templates_dir.as_deref())?;
        Ok(Self::new(store, renderer))
    }
}

/// Build the application router.
#[must_use]
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let Some(route) = router::parse_path(request.uri().path()) else {
        debug!("Rejected {method} {}", request.uri().path());
        return StatusCode::NOT_FOUND.into_response();
    };

    if !route.operation.accepts(&method) {
        debug!("Method {method} not allowed for {}", route.operation);
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, route.operation.allowed_methods())],
        )
            .into_response();
    }

    debug!("{method} {} {}", route.operation, route.name);
    let result = match route.operation {
        Operation::View => handlers::view(&state, route.name).await,
        Operation::Edit => handlers::edit_form(&state, route.name).await,
        Operation::Save => {
            let form = match Form::<SaveForm>::from_request(request, &state).await {
                Ok(Form(form)) => form,
                Err(rejection) => {
                    debug!("Rejected save form for {}: {rejection}", route.name);
                    return rejection.into_response();
                }
            };
            handlers::save(&state, route.name, form.about).await
        }
    };

    match result {
        Ok(outcome) => outcome.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Run the service described by `config` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if startup fails (store, templates, or binding the
/// listener) or the server stops abnormally.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    info!(
        "Serving records from {} ({:?} writes)",
        state.store.root().display(),
        state.store.write_mode()
    );
    let app = app(state, config.server.max_body_bytes);

    let address = config.server.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| Error::Bind { address, source })?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
