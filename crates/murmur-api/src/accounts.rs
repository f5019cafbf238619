use axum::{Json, extract::State};

use murmur_types::api::{LoginRequest, RegisterRequest};
use murmur_types::models::Account;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Account>, ApiError> {
    let candidate = Account::new(
        req.username.unwrap_or_default(),
        req.password.unwrap_or_default(),
    );

    let account = run_blocking(move || state.accounts.register(candidate)).await??;
    Ok(Json(account))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Account>, ApiError> {
    // A null username or password can never match a registered account.
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::InvalidCredentials);
    };

    let account = run_blocking(move || state.accounts.login(&username, &password))
        .await??
        .ok_or(ApiError::InvalidCredentials)?;

    Ok(Json(account))
}
