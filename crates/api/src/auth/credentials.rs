// Credential extraction from request headers
// Decision: Bearer header first; the session cookie is only consulted when the
//           caller allows it (admin routes) and no usable bearer token exists
// Decision: "null" / "undefined" are stringified client-side nulls, not tokens

use axum::http::{header, HeaderMap};
use axum_extra::extract::CookieJar;

/// Cookie carrying the server-side session id
pub const SESSION_COOKIE: &str = "ondas.session";

/// Cookie carrying the refresh token (scoped to the auth routes)
pub const REFRESH_COOKIE: &str = "ondas.refresh";

/// A raw credential found on the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// Session id from the session cookie
    Session(String),
}

/// Values that clients send when they meant "no token"
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "null" || value == "undefined"
}

/// Bearer token from the Authorization header, if a usable one is present
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || is_placeholder(token) {
        return None;
    }
    Some(token.trim().to_string())
}

/// Session id from the session cookie
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE)
}

/// Refresh token from the refresh cookie
pub fn refresh_cookie(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, REFRESH_COOKIE)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !is_placeholder(value))
}

/// Extract zero or one credential from the request
pub fn extract(headers: &HeaderMap, allow_session: bool) -> Option<Credential> {
    if let Some(token) = bearer_token(headers) {
        return Some(Credential::Bearer(token));
    }
    if allow_session {
        return session_id(headers).map(Credential::Session);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_extracted() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer abc.def.ghi")]);
        assert_eq!(
            extract(&h, false),
            Some(Credential::Bearer("abc.def.ghi".to_string()))
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let h = headers(&[(header::AUTHORIZATION, "bearer abc")]);
        assert_eq!(bearer_token(&h), Some("abc".to_string()));
    }

    #[test]
    fn test_placeholders_are_absent() {
        for value in ["Bearer null", "Bearer undefined", "Bearer ", "Bearer"] {
            let h = headers(&[(header::AUTHORIZATION, value)]);
            assert_eq!(extract(&h, false), None, "{value} should be absent");
        }
    }

    #[test]
    fn test_other_schemes_ignored() {
        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract(&h, false), None);
    }

    #[test]
    fn test_session_only_when_allowed() {
        let h = headers(&[(header::COOKIE, "ondas.session=sess-123; theme=dark")]);
        assert_eq!(extract(&h, false), None);
        assert_eq!(
            extract(&h, true),
            Some(Credential::Session("sess-123".to_string()))
        );
    }

    #[test]
    fn test_bearer_wins_over_session() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer tok"),
            (header::COOKIE, "ondas.session=sess-123"),
        ]);
        assert_eq!(extract(&h, true), Some(Credential::Bearer("tok".to_string())));
    }

    #[test]
    fn test_placeholder_bearer_falls_back_to_session() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer undefined"),
            (header::COOKIE, "ondas.session=sess-123"),
        ]);
        assert_eq!(
            extract(&h, true),
            Some(Credential::Session("sess-123".to_string()))
        );
    }

    #[test]
    fn test_refresh_cookie() {
        let h = headers(&[(header::COOKIE, "ondas.refresh=r-tok")]);
        assert_eq!(refresh_cookie(&h), Some("r-tok".to_string()));
    }
}
