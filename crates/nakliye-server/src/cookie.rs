//! The `access_token` session cookie

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use nakliye_app::session::SESSION_TTL_SECS;
use nakliye_types::BearerToken;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Bearer token from the request's cookies, if present and non-empty
pub fn access_token(headers: &HeaderMap) -> Option<BearerToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .and_then(|(_, value)| BearerToken::new(value.trim()))
}

pub fn set_access_token(token: &BearerToken) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly",
        ACCESS_TOKEN_COOKIE,
        token.as_str(),
        SESSION_TTL_SECS
    )
}

pub fn clear_access_token() -> String {
    format!("{}=; Max-Age=0; Path=/; HttpOnly", ACCESS_TOKEN_COOKIE)
}

/// Claims of a JWT, decoded without verifying the signature
///
/// The backend validates tokens; this only reads who the token says it is.
pub fn jwt_payload(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn jwt(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_token_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; access_token=abc.def.ghi"));
        let token = access_token(&headers).unwrap();
        assert_eq!(token.as_str(), "abc.def.ghi");
    }

    #[test]
    fn test_empty_or_missing_cookie() {
        let mut headers = HeaderMap::new();
        assert!(access_token(&headers).is_none());
        headers.insert(COOKIE, HeaderValue::from_static("access_token="));
        assert!(access_token(&headers).is_none());
    }

    #[test]
    fn test_set_cookie_attributes() {
        let token = BearerToken::new("t").unwrap();
        assert_eq!(
            set_access_token(&token),
            "access_token=t; Max-Age=28800; Path=/; HttpOnly"
        );
        assert!(clear_access_token().contains("Max-Age=0"));
    }

    #[test]
    fn test_jwt_payload_decodes_claims() {
        let claims = json!({"sub": "u1", "email": "ops@nakliye.test"});
        assert_eq!(jwt_payload(&jwt(&claims)), Some(claims));
        assert_eq!(jwt_payload("not-a-jwt"), None);
        assert_eq!(jwt_payload("a.!!!.c"), None);
    }
}
