use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::contact::{ContactError, ContactForm};
use crate::http::server::AppState;
use crate::observability::metrics;

const DEFAULT_TAKE_LIMIT: usize = 50;

pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<ContactForm>,
) -> Response {
    let fallback = state.redirect.detector.detect(&headers).locale;

    let result = form
        .validate(fallback)
        .and_then(|submission| state.contacts.insert(submission));

    match result {
        Ok(id) => {
            tracing::info!(submission_id = %id, "Contact submission queued");
            metrics::record_contact_submission("accepted");
            (StatusCode::CREATED, Json(json!({ "id": id, "status": "pending" }))).into_response()
        }
        Err(ContactError::Invalid(fields)) => {
            tracing::debug!(rejected = fields.len(), "Contact submission rejected");
            metrics::record_contact_submission("rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation_failed", "fields": fields })),
            )
                .into_response()
        }
        Err(ContactError::QueueFull { capacity }) => {
            tracing::warn!(capacity, "Contact queue full, refusing submission");
            metrics::record_contact_submission("queue_full");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "queue_full" })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TakeQuery {
    pub limit: Option<usize>,
}

/// Hand queued submissions to moderation, removing them from the queue.
pub async fn take_contacts(State(state): State<AppState>, Query(query): Query<TakeQuery>) -> Response {
    let submissions = state
        .contacts
        .take_pending(query.limit.unwrap_or(DEFAULT_TAKE_LIMIT));
    tracing::info!(taken = submissions.len(), remaining = state.contacts.len(), "Contact submissions taken");

    Json(json!({
        "submissions": submissions,
        "remaining": state.contacts.len(),
    }))
    .into_response()
}
