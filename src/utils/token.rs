use chrono::Duration;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::user::User;

/// Signs an HS256 token identifying `user` for `ttl_hours`.
pub fn issue_access_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String> {
    let exp = super::time::now() + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: user.name.clone(),
        exp: exp.timestamp() as usize,
        role: Some(format!("{:?}", user.role).to_lowercase()),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
