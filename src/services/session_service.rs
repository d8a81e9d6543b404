//! Signed session cookies and request-side session resolution.
//!
//! Cookies carry `sid.tag` where `tag` is an HMAC-SHA256 of the session id
//! under the configured session secret, so a tampered cookie is rejected
//! before the store is consulted.

use axum::http::{HeaderMap, header};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    dao::session::{SESSION_TTL, SessionRecord},
    error::ServiceError,
    state::SharedState,
};

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const COOKIE_NAME: &str = "vg_session";

/// Hex-encoded HMAC tag of `session_id` under `secret`.
fn sign(secret: &str, session_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(session_id.as_bytes());
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// The `sid.tag` value stored in the cookie.
pub fn cookie_value(secret: &str, session_id: &str) -> String {
    format!("{session_id}.{}", sign(secret, session_id))
}

/// Verify a cookie value and return the session id it names.
pub fn verify_cookie_value<'a>(secret: &str, value: &'a str) -> Option<&'a str> {
    let (session_id, tag) = value.rsplit_once('.')?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(session_id.as_bytes());

    let mut expected = [0u8; 32];
    decode_hex_32(tag, &mut expected)?;
    mac.verify_slice(&expected).ok()?;
    Some(session_id)
}

/// Decode exactly 64 hex characters into `out`.
fn decode_hex_32(hex: &str, out: &mut [u8; 32]) -> Option<()> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    for (index, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
        let high = (chunk[0] as char).to_digit(16)?;
        let low = (chunk[1] as char).to_digit(16)?;
        out[index] = ((high << 4) | low) as u8;
    }
    Some(())
}

/// Full `Set-Cookie` header value minting a session cookie.
pub fn set_cookie_header(secret: &str, session_id: &str) -> String {
    format!(
        "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cookie_value(secret, session_id),
        SESSION_TTL.as_secs()
    )
}

/// Extract and verify the session id carried by the request's cookies.
pub fn session_id_from_headers(secret: &str, headers: &HeaderMap) -> Option<String> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookies) = cookie_header.to_str() else {
            continue;
        };
        for pair in cookies.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            if name == COOKIE_NAME
                && let Some(session_id) = verify_cookie_value(secret, value)
            {
                return Some(session_id.to_string());
            }
        }
    }
    None
}

/// Resolve the request's session from the store.
pub async fn resolve_session(
    state: &SharedState,
    headers: &HeaderMap,
) -> Result<SessionRecord, ServiceError> {
    let session_id = session_id_from_headers(&state.config().session_secret, headers)
        .ok_or_else(|| ServiceError::Unauthorized("Missing or invalid session".into()))?;

    let store = state.require_session_store().await?;
    store
        .get(&session_id)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Session expired".into()))
}

/// Bearer token used for forwarded platform calls: the `Authorization`
/// header when present, otherwise the session's stored access token.
pub async fn bearer_token(
    state: &SharedState,
    headers: &HeaderMap,
) -> Result<String, ServiceError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| ServiceError::Unauthorized("Malformed Authorization header".into()))?;
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Ok(token.to_string());
        }
        return Err(ServiceError::Unauthorized(
            "Malformed Authorization header".into(),
        ));
    }

    let session = resolve_session(state, headers).await?;
    Ok(session.access_token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn cookie_value_round_trips() {
        let value = cookie_value(SECRET, "abc-123");
        assert_eq!(verify_cookie_value(SECRET, &value), Some("abc-123"));
    }

    #[test]
    fn tampered_session_id_is_rejected() {
        let value = cookie_value(SECRET, "abc-123");
        let forged = value.replacen("abc-123", "abc-124", 1);
        assert_eq!(verify_cookie_value(SECRET, &forged), None);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let value = cookie_value(SECRET, "abc-123");
        assert_eq!(verify_cookie_value("other-secret", &value), None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(verify_cookie_value(SECRET, "no-separator"), None);
        assert_eq!(verify_cookie_value(SECRET, "sid.not-hex"), None);
        assert_eq!(verify_cookie_value(SECRET, "sid.abcd"), None);
    }

    #[test]
    fn session_id_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        let cookie = format!("theme=dark; {COOKIE_NAME}={}; lang=en", cookie_value(SECRET, "sid-1"));
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());

        assert_eq!(
            session_id_from_headers(SECRET, &headers),
            Some("sid-1".to_string())
        );
    }

    #[test]
    fn absent_cookie_yields_none() {
        assert_eq!(session_id_from_headers(SECRET, &HeaderMap::new()), None);
    }
}
