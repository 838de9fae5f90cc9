//! Stateless session tokens.
//!
//! A session is a signed JWT binding a wallet address to an expiry, carried
//! in an httpOnly cookie. There is no server-side session store and no
//! refresh: once the token expires the user re-authenticates by signing a
//! fresh wallet challenge.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::transport::http::types::{AppState, ErrorBody};

pub const SESSION_COOKIE: &str = "auth-token";
pub const SESSION_TTL_HOURS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub address: String,
    pub exp: usize,
}

/// Signs a session token for `address` with the standard 60-hour expiry.
pub fn issue_token(secret: &str, address: &str) -> anyhow::Result<String> {
    let exp = (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize;
    token_with_expiry(secret, address, exp)
}

fn token_with_expiry(secret: &str, address: &str, exp: usize) -> anyhow::Result<String> {
    let claims = Claims {
        address: address.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Decodes and validates a session token. `None` covers every failure mode:
/// bad signature, expired, malformed, or an empty address claim.
pub fn verify_token(secret: &str, token: &str) -> Option<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    if data.claims.address.is_empty() {
        return None;
    }
    Some(data.claims)
}

// -- Cookie helpers --

pub fn session_cookie(token: &str) -> String {
    let max_age_secs = SESSION_TTL_HOURS * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", SESSION_COOKIE)
}

pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

/// Extractor for the authenticated wallet address.
///
/// Rejects with 401 when the session cookie is absent, expired or invalid,
/// before the handler body runs, so unauthenticated requests never reach the
/// database.
pub struct SessionAddress(pub String);

#[async_trait]
impl FromRequestParts<AppState> for SessionAddress {
    type Rejection = (StatusCode, Json<ErrorBody>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    message: "Unauthorized".to_string(),
                }),
            )
        };

        let token = cookie_value(&parts.headers, SESSION_COOKIE).ok_or_else(unauthorized)?;
        let claims = verify_token(&state.config.jwt_secret, token).ok_or_else(unauthorized)?;
        Ok(SessionAddress(claims.address))
    }
}
