//! Cookie-carried login sessions.
//!
//! The session is URL-encoded JSON stored directly in the `session` cookie.
//! It is neither signed nor encrypted, so anyone able to set cookies can
//! claim any identity. There is no server-side session store.

use async_trait::async_trait;
use axum::http::{header::COOKIE, request::Parts, HeaderMap};
use axum_core::extract::FromRequestParts;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "session";

/// Cookie lifetime without "remember me", in seconds.
pub const SESSION_MAX_AGE: u64 = 60 * 60 * 24;

/// Cookie lifetime with "remember me", in seconds.
pub const REMEMBER_MAX_AGE: u64 = 60 * 60 * 24 * 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
}

pub fn encode(user_id: i32, email: &str) -> String {
    let claims = json!({ "id": user_id, "email": email });
    urlencoding::encode(&claims.to_string()).into_owned()
}

/// Find and decode the session in a `Cookie` header value.
///
/// Returns `None` when there is no session cookie or it does not decode.
pub fn decode(cookie_header: &str) -> Option<SessionUser> {
    let value = cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| match cookie.split_once('=') {
            Some((SESSION_COOKIE, value)) => Some(value),
            _ => None,
        })?;

    let json = urlencoding::decode(value).ok()?;
    serde_json::from_str(&json).ok()
}

pub fn from_headers(headers: &HeaderMap) -> Option<SessionUser> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(decode)
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, remember: bool, secure: bool) -> String {
    let max_age = if remember { REMEMBER_MAX_AGE } else { SESSION_MAX_AGE };
    cookie(token, max_age, secure)
}

/// `Set-Cookie` value that expires the session immediately.
pub fn clear_cookie(secure: bool) -> String {
    cookie("", 0, secure)
}

fn cookie(value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={value}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=Strict"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extracts the signed-in user, rejecting with 401 when absent.
///
/// Use `Option<Session>` where a missing session should not reject.
#[derive(Debug, Clone)]
pub struct Session(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match from_headers(&parts.headers) {
            Some(user) => Ok(Session(user)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "request without session");
                Err(ApiError::Unauthorized("Not signed in".to_owned()))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode_is_url_encoded_json() {
        let token = encode(7, "admin@example.com");
        assert!(!token.contains('{'));
        assert!(!token.contains(';'));

        let json = urlencoding::decode(&token).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, json!({ "id": 7, "email": "admin@example.com" }));
    }

    #[test]
    fn test_decode_finds_session_among_cookies() {
        let header = format!("theme=dark; session={}; other=1", encode(3, "a@b.c"));
        assert_eq!(
            decode(&header),
            Some(SessionUser {
                id: 3,
                email: "a@b.c".to_owned()
            })
        );
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("theme=dark"), None);
        assert_eq!(decode("session="), None);
        assert_eq!(decode("session=not-json"), None);
        assert_eq!(decode("sessionid=abc"), None);
        assert_eq!(decode("session=%7B%22id%22%3A%22x%22%7D"), None);
    }

    #[test]
    fn test_unsigned_session_is_accepted() {
        // forged but well formed, accepted because nothing is signed
        let forged = "session=%7B%22id%22%3A1%2C%22email%22%3A%22x%40y.z%22%7D";
        assert_eq!(decode(forged).map(|user| user.id), Some(1));
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("abc", false, true);
        assert_eq!(
            cookie,
            "session=abc; HttpOnly; Path=/; Max-Age=86400; SameSite=Strict; Secure"
        );
        assert!(session_cookie("abc", true, true).contains("Max-Age=2592000"));
        assert!(!session_cookie("abc", false, false).contains("Secure"));
        assert_eq!(
            clear_cookie(true),
            "session=; HttpOnly; Path=/; Max-Age=0; SameSite=Strict; Secure"
        );
    }

    #[tokio::test]
    async fn test_extractor() {
        let request = axum::http::Request::builder()
            .header(COOKIE, format!("session={}", encode(5, "e@x.io")))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let Session(user) = Session::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id, 5);

        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        assert!(Session::from_request_parts(&mut parts, &()).await.is_err());
    }
}
