//! Operation handlers.
//!
//! Each handler receives a name that already passed routing and produces
//! exactly one [`Outcome`] or an error. Store calls run on the blocking pool.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{Record, RecordName};
use crate::render::{EDIT_TEMPLATE, VIEW_TEMPLATE};
use crate::router::Operation;
use crate::server::AppState;

/// The terminal state of a successfully handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A rendered page.
    Rendered(String),
    /// A `302 Found` redirect to the given path.
    Redirect(String),
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Rendered(page) => Html(page).into_response(),
            Self::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
        }
    }
}

/// Form submitted to the save operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveForm {
    /// The new record body. A missing field saves an empty body.
    #[serde(default)]
    pub about: String,
}

/// Show a record, or send the client to the edit form if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the record can't be read or rendered.
pub async fn view(state: &AppState, name: RecordName) -> Result<Outcome> {
    match load(state, &name).await {
        Ok(record) => Ok(Outcome::Rendered(
            state.renderer.render(VIEW_TEMPLATE, &record)?,
        )),
        Err(err) if err.is_not_found() => {
            debug!("No record named {name}, redirecting to edit");
            Ok(Outcome::Redirect(Operation::Edit.path(&name)))
        }
        Err(err) => Err(err),
    }
}

/// Show the edit form, empty if the record doesn't exist yet.
///
/// # Errors
///
/// Returns an error if the record can't be read or rendered.
pub async fn edit_form(state: &AppState, name: RecordName) -> Result<Outcome> {
    let record = match load(state, &name).await {
        Ok(record) => record,
        Err(err) if err.is_not_found() => Record::empty(name),
        Err(err) => return Err(err),
    };
    Ok(Outcome::Rendered(
        state.renderer.render(EDIT_TEMPLATE, &record)?,
    ))
}

/// Store `about` as the body of `name` and redirect to its page.
///
/// # Errors
///
/// Returns an error if the record can't be written; nothing is considered
/// saved in that case.
pub async fn save(state: &AppState, name: RecordName, about: String) -> Result<Outcome> {
    let record = Record::new(name.clone(), about);
    let store = Arc::clone(&state.store);
    blocking(move || store.save(&record)).await?;

    info!("Saved record {name}");
    Ok(Outcome::Redirect(Operation::View.path(&name)))
}

async fn load(state: &AppState, name: &RecordName) -> Result<Record> {
    let store = Arc::clone(&state.store);
    let name = name.clone();
    blocking(move || store.load(&name)).await
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| Error::internal(format!("store task failed: {err}")))?
}
