use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use murmur_types::api::{CreateMessageRequest, UpdateMessageRequest};
use murmur_types::models::Message;

use crate::error::{ApiError, MESSAGE_TEXT_REQUIRED};
use crate::{AppState, run_blocking};

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let text = req.text.unwrap_or_default();

    let message =
        run_blocking(move || state.messages.create(&text, req.posted_by, req.posted_at)).await??;
    Ok(Json(message))
}

pub async fn get_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = run_blocking(move || state.messages.get_all()).await??;
    Ok(Json(messages))
}

/// Absence is an empty 200, not a 404.
pub async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let message = run_blocking(move || state.messages.get_by_id(message_id)).await??;

    Ok(match message {
        Some(message) => Json(message).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

/// Responds with the number of deleted rows, or an empty 200 if nothing matched.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let deleted = run_blocking(move || state.messages.delete(message_id)).await??;

    Ok(if deleted {
        Json(1).into_response()
    } else {
        StatusCode::OK.into_response()
    })
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<Json<u32>, ApiError> {
    let text = req.text.ok_or(ApiError::InvalidMessage(MESSAGE_TEXT_REQUIRED))?;

    run_blocking(move || state.messages.update_text(message_id, &text)).await??;
    Ok(Json(1))
}

pub async fn get_account_messages(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = run_blocking(move || state.messages.get_by_author(account_id)).await??;
    Ok(Json(messages))
}
