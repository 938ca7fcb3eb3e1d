//! Request handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use scriptsync_core::ScriptStore;

/// Handles `GET /scripts`.
pub async fn get_scripts(State(store): State<ScriptStore>) -> Response {
    let snapshot = store.get();

    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(snapshot.as_ref()),
    )
        .into_response()
}

/// Everything that is not `GET /scripts`.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
