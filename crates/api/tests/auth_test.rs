// HTTP tests for signup, login, refresh, logout and credential handling

mod common;

use axum::http::{header, Method, StatusCode};
use common::{body_json, request, set_cookies, TestApp, TEST_PASSWORD};
use ondas_core::Role;
use serde_json::json;

#[tokio::test]
async fn test_signup_issues_tokens_and_cookies() {
    let app = TestApp::new();

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "  Nueva@Ondas.FM ",
                "password": "una clave larga",
                "name": "Nueva"
            })),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("ondas.session=")));
    assert!(cookies.iter().any(|c| c.starts_with("ondas.refresh=")));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "nueva@ondas.fm");
    assert_eq!(body["data"]["user"]["role"], "LISTENER");
    assert_eq!(body["data"]["tokenType"], "Bearer");
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert!(body["data"]["refreshToken"].as_str().is_some());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new();
    app.user("taken@ondas.fm", Role::Listener).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"email": "TAKEN@ondas.fm", "password": "una clave larga", "name": "Otro"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"email": "a@ondas.fm", "password": "corta", "name": "A"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_success_and_failures() {
    let app = TestApp::new();
    app.user("dj@ondas.fm", Role::Dj).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "DJ@ondas.fm", "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "DJ");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "dj@ondas.fm", "password": "wrong password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    // Unknown emails get the same answer
    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ghost@ondas.fm", "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let (_, access_token) = app.user("l@ondas.fm", Role::Listener).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({"refreshToken": access_token})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::POST, "/api/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({"refreshToken": "undefined"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_refresh_from_cookie() {
    let app = TestApp::new();
    let (user, _) = app.user("c@ondas.fm", Role::Listener).await;
    let pair = app
        .state
        .auth
        .jwt_service
        .issue_token_pair(&user.id.to_string(), Role::Listener)
        .unwrap();

    let mut req = request(Method::POST, "/api/auth/refresh", None, None);
    req.headers_mut().insert(
        header::COOKIE,
        format!("ondas.refresh={}", pair.refresh_token).parse().unwrap(),
    );
    let response = app.send(req).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("ondas.refresh=")));
    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["id"], user.id.to_string());
}

#[tokio::test]
async fn test_refresh_for_deleted_user() {
    let app = TestApp::new();
    let (user, _) = app.user("gone@ondas.fm", Role::Listener).await;
    let pair = app
        .state
        .auth
        .jwt_service
        .issue_token_pair(&user.id.to_string(), Role::Listener)
        .unwrap();
    app.state.storage.delete_user(user.id).await.unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({"refreshToken": pair.refresh_token})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_refresh_picks_up_role_change() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (dj, _) = app.user("dj@ondas.fm", Role::Dj).await;
    let pair = app
        .state
        .auth
        .jwt_service
        .issue_token_pair(&dj.id.to_string(), Role::Dj)
        .unwrap();

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/admin/users/{}/role", dj.id),
            Some(&admin_token),
            Some(json!({"role": "LISTENER"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({"refreshToken": pair.refresh_token})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "LISTENER");

    // The refreshed access token no longer reaches DJ routes
    let new_token = body["data"]["accessToken"].as_str().unwrap().to_string();
    let (status, body) = app
        .call(
            Method::POST,
            "/api/mixes",
            Some(&new_token),
            Some(json!({"title": "Set", "audioUrl": "https://cdn.ondas.fm/a.mp3"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_placeholder_bearer_is_missing_credential() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::GET, "/api/auth/me", Some("undefined"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");

    let (status, body) = app
        .call(Method::GET, "/api/admin/users", Some("null"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_garbage_bearer_is_invalid_token() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::GET, "/api/auth/me", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_me_returns_stored_user() {
    let app = TestApp::new();
    let (user, token) = app.user("me@ondas.fm", Role::Listener).await;

    let (status, body) = app.call(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["email"], "me@ondas.fm");
}

#[tokio::test]
async fn test_admin_session_cookie_and_logout() {
    let app = TestApp::new();
    app.user("boss@ondas.fm", Role::Admin).await;

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "boss@ondas.fm", "password": TEST_PASSWORD})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("ondas.session="))
        .unwrap();

    let with_session = |method: Method, uri: &str| {
        let mut req = request(method, uri, None, None);
        req.headers_mut()
            .insert(header::COOKIE, session.parse().unwrap());
        req
    };

    // Admin routes accept the session cookie without a bearer token
    let response = app.send(with_session(Method::GET, "/api/admin/users")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Other routes do not
    let response = app.send(with_session(Method::GET, "/api/auth/me")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(with_session(Method::POST, "/api/auth/logout")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(with_session(Method::GET, "/api/admin/users")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_demoted_admin_loses_session_access() {
    let app = TestApp::new();
    let (demoted, _) = app.user("a@ondas.fm", Role::Admin).await;
    let (_, other_admin_token) = app.user("b@ondas.fm", Role::Admin).await;

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "a@ondas.fm", "password": TEST_PASSWORD})),
        ))
        .await;
    let session = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("ondas.session="))
        .unwrap();
    let with_session = || {
        let mut req = request(Method::GET, "/api/admin/users", None, None);
        req.headers_mut()
            .insert(header::COOKIE, session.parse().unwrap());
        req
    };

    let response = app.send(with_session()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/admin/users/{}/role", demoted.id),
            Some(&other_admin_token),
            Some(json!({"role": "LISTENER"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let response = app.send(with_session()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_cookie_path_follows_api_prefix() {
    let app = TestApp::with_prefix("/v1");
    app.user("p@ondas.fm", Role::Listener).await;

    let response = app
        .send(request(
            Method::POST,
            "/v1/api/auth/login",
            None,
            Some(json!({"email": "p@ondas.fm", "password": TEST_PASSWORD})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let refresh = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with("ondas.refresh="))
        .unwrap()
        .to_string();
    assert!(refresh.contains("Path=/v1/api/auth"), "{refresh}");

    let token = refresh
        .split(';')
        .next()
        .unwrap()
        .trim_start_matches("ondas.refresh=")
        .to_string();
    let (status, _) = app
        .call(
            Method::POST,
            "/v1/api/auth/refresh",
            None,
            Some(json!({"refreshToken": token})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
