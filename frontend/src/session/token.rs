//! Client-side inspection of bearer tokens.
//!
//! Only the payload segment is read. The signature is never verified here;
//! the backend does that on every request, the client just gates the UI.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use super::clock::Clock;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("expected 3 token segments, found {segments}")]
    Shape { segments: usize },
    #[error("payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Claims the frontend cares about. Everything else in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionClaims {
    pub subject: Option<String>,
    pub role: Option<String>,
    /// `exp` in seconds since the epoch, only when it was a JSON number.
    pub expires_at: Option<f64>,
}

impl SessionClaims {
    fn from_payload(payload: &Map<String, Value>) -> Self {
        let subject = payload
            .get("sub")
            .or_else(|| payload.get("id"))
            .and_then(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        let role = payload
            .get("role")
            .and_then(Value::as_str)
            .map(str::to_string);
        let expires_at = payload.get("exp").and_then(Value::as_f64);
        Self {
            subject,
            role,
            expires_at,
        }
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let exp = self.expires_at?;
        if !exp.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt((exp * 1000.0) as i64).single()
    }

    /// Strictly-after comparison: a token expiring exactly now is already expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(exp) => exp > epoch_seconds(now),
            None => false,
        }
    }
}

pub fn decode_claims(token: &str) -> Result<SessionClaims, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments[1].is_empty() {
        return Err(TokenError::Shape {
            segments: segments.len(),
        });
    }
    let bytes = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(payload) => Ok(SessionClaims::from_payload(&payload)),
        _ => Err(TokenError::NotAnObject),
    }
}

/// Fails closed: anything that is not a decodable token with a future `exp`
/// counts as expired.
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => !claims.is_valid_at(now),
        Err(err) => {
            log::debug!("treating undecodable session token as expired: {}", err);
            true
        }
    }
}

pub fn is_token_expired(token: Option<&str>, clock: &dyn Clock) -> bool {
    match token {
        Some(token) if !token.trim().is_empty() => is_token_expired_at(token, clock.now()),
        _ => true,
    }
}

fn epoch_seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}
