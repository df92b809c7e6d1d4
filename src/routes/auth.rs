use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dto::auth_dto::{LoginPayload, TokenResponse};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::token::issue_access_token;
use crate::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    payload.validate()?;
    if !state.auth.accepts(&payload.username, &payload.password) {
        tracing::warn!(username = %payload.username, "rejected login attempt");
        return Err(Error::Unauthorized("Invalid username or password".to_string()));
    }

    let user = User::demo_admin();
    let access_token = issue_access_token(
        &user,
        &state.auth.jwt_secret,
        state.auth.token_ttl_hours,
    )?;
    tracing::info!(user = %user.name, "demo user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.auth.token_ttl_hours * 3600,
        user,
    }))
}
