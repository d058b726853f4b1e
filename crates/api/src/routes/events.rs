//! Server-sent events feed of error messages.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{Stream, StreamExt};

use super::catalog::AppState;

/// GET /errors/stream: every error reported after the client connected.
pub async fn error_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("error stream client connected");
    let events = state
        .catalog
        .error_messages()
        .into_stream()
        .map(|message| message.map(|message| Event::default().event("error").data(message)));
    Sse::new(events).keep_alive(KeepAlive::default())
}
