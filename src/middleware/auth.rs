use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Display name of the acting user; recorded as note author and in task history.
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Demo login gate settings, carried in the router state.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub demo_username: String,
    pub demo_password: String,
    pub token_ttl_hours: i64,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            demo_username: config.demo_username.clone(),
            demo_password: config.demo_password.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    /// Username is matched case-insensitively, the password in constant time.
    pub fn accepts(&self, username: &str, password: &str) -> bool {
        let user_ok = username.trim().eq_ignore_ascii_case(&self.demo_username);
        let pass_ok: bool = password
            .as_bytes()
            .ct_eq(self.demo_password.as_bytes())
            .into();
        user_ok & pass_ok
    }
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            next.run(req).await
        }
        Err(_) => unauthorized("invalid_token"),
    }
}
