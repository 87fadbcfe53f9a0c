// HTTP tests for DJ applications, mix moderation and admin management

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use ondas_api::storage::{CreatePromoCodeRow, UserRow};
use ondas_core::Role;
use serde_json::{json, Value};
use uuid::Uuid;

/// Listener applies, admin approves; returns the new DJ with a DJ token
async fn approved_dj(app: &TestApp, admin_token: &str, email: &str) -> (UserRow, String, Uuid) {
    let (user, token) = app.user(email, Role::Listener).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/dj-requests",
            Some(&token),
            Some(json!({"artistName": "DJ Test", "message": "Pinchando desde 2010"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/admin/dj-requests/{request_id}"),
            Some(admin_token),
            Some(json!({"action": "approve"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let dj = app
        .state
        .storage
        .get_dj_by_user(user.id)
        .await
        .unwrap()
        .unwrap();
    let dj_token = app.token_for(&user, Role::Dj);
    (user, dj_token, dj.id)
}

async fn create_mix(app: &TestApp, token: &str, title: &str) -> Value {
    let (status, body) = app
        .call(
            Method::POST,
            "/api/mixes",
            Some(token),
            Some(json!({
                "title": title,
                "audioUrl": "https://cdn.ondas.fm/mix.mp3",
                "durationSeconds": 3600
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_dj_request_approval_promotes_user() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;

    let (user, _, dj_id) = approved_dj(&app, &admin_token, "nuevo@ondas.fm").await;

    let stored = app.state.storage.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.role(), Role::Dj);

    let (status, body) = app
        .call(Method::GET, &format!("/api/djs/{dj_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["artistName"], "DJ Test");
}

#[tokio::test]
async fn test_dj_request_already_processed() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (_, token) = app.user("fan@ondas.fm", Role::Listener).await;

    let (_, body) = app
        .call(
            Method::POST,
            "/api/dj-requests",
            Some(&token),
            Some(json!({"artistName": "Fan"})),
        )
        .await;
    let uri = format!("/api/admin/dj-requests/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&admin_token), Some(json!({"action": "approve"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "APPROVED");

    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&admin_token), Some(json!({"action": "reject"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "ALREADY_PROCESSED");
    assert_eq!(body["message"], "Solicitud ya procesada");
}

#[tokio::test]
async fn test_dj_request_duplicates() {
    let app = TestApp::new();
    let (_, token) = app.user("fan@ondas.fm", Role::Listener).await;
    let body = json!({"artistName": "Fan"});

    let (status, _) = app
        .call(Method::POST, "/api/dj-requests", Some(&token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(Method::POST, "/api/dj-requests", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_admin_lists_pending_requests() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (_, token) = app.user("fan@ondas.fm", Role::Listener).await;
    app.call(
        Method::POST,
        "/api/dj-requests",
        Some(&token),
        Some(json!({"artistName": "Fan"})),
    )
    .await;

    let (status, body) = app
        .call(
            Method::GET,
            "/api/admin/dj-requests?status=PENDING",
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .call(
            Method::GET,
            "/api/admin/dj-requests?status=APPROVED",
            Some(&admin_token),
            None,
        )
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_mix_moderation_flow() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (_, dj_token, _) = approved_dj(&app, &admin_token, "dj@ondas.fm").await;
    let (_, stranger_token) = app.user("otro@ondas.fm", Role::Listener).await;

    let mix = create_mix(&app, &dj_token, "Sesión de verano").await;
    assert_eq!(mix["status"], "PENDING");
    let mix_uri = format!("/api/mixes/{}", mix["id"].as_str().unwrap());

    // Pending mixes are not public
    let (_, body) = app.call(Method::GET, "/api/mixes", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    let (status, _) = app.call(Method::GET, &mix_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Method::GET, &mix_uri, Some(&stranger_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // ...but the owner sees it
    let (status, _) = app.call(Method::GET, &mix_uri, Some(&dj_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::PATCH,
            &format!("/api/admin/mixes/{}", mix["id"].as_str().unwrap()),
            Some(&admin_token),
            Some(json!({"action": "approve"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "APPROVED");

    let (_, body) = app.call(Method::GET, "/api/mixes", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Sesión de verano");
}

#[tokio::test]
async fn test_legacy_mix_approve_does_not_persist() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (_, dj_token, _) = approved_dj(&app, &admin_token, "dj@ondas.fm").await;
    let mix = create_mix(&app, &dj_token, "Legacy").await;
    let id = mix["id"].as_str().unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/admin/mixes/{id}/approve"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "APPROVED");

    let stored = app
        .state
        .storage
        .get_mix(Uuid::parse_str(id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status().as_str(), "PENDING");
}

#[tokio::test]
async fn test_mix_edit_requires_ownership() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (_, owner_token, _) = approved_dj(&app, &admin_token, "owner@ondas.fm").await;
    let (_, other_token, _) = approved_dj(&app, &admin_token, "other@ondas.fm").await;
    let mix = create_mix(&app, &owner_token, "Mío").await;
    let uri = format!("/api/mixes/{}", mix["id"].as_str().unwrap());

    let (status, _) = app
        .call(Method::PATCH, &uri, Some(&other_token), Some(json!({"title": "Robado"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(Method::PATCH, &uri, Some(&owner_token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&owner_token), Some(json!({"title": "Nuevo título"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Nuevo título");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_listener_cannot_publish_mix() {
    let app = TestApp::new();
    let (_, token) = app.user("l@ondas.fm", Role::Listener).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/mixes",
            Some(&token),
            Some(json!({"title": "x", "audioUrl": "https://cdn.ondas.fm/x.mp3"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_admin_routes_reject_non_admin_with_401() {
    let app = TestApp::new();
    let (_, dj_token) = app.user("dj@ondas.fm", Role::Dj).await;

    let (status, body) = app
        .call(Method::GET, "/api/admin/users", Some(&dj_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "No autorizado");
}

#[tokio::test]
async fn test_non_admin_promo_activation_touches_nothing() {
    let app = TestApp::new();
    let (_, token) = app.user("l@ondas.fm", Role::Listener).await;
    app.state
        .storage
        .create_promo_code(CreatePromoCodeRow {
            code: "VERANO".into(),
            description: None,
        })
        .await
        .unwrap()
        .unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/promo/activate",
            Some(&token),
            Some(json!({"code": "verano"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let promo = app
        .state
        .storage
        .get_promo_code("VERANO")
        .await
        .unwrap()
        .unwrap();
    assert!(!promo.active);
    assert!(promo.activated_by.is_none());
}

#[tokio::test]
async fn test_promo_code_lifecycle() {
    let app = TestApp::new();
    let (admin, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/promo-codes",
            Some(&admin_token),
            Some(json!({"code": " invierno ", "description": "Campaña"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["code"], "INVIERNO");
    assert_eq!(body["data"]["active"], false);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/admin/promo-codes",
            Some(&admin_token),
            Some(json!({"code": "INVIERNO"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let activate = |code: &str| json!({ "code": code });
    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/promo/activate",
            Some(&admin_token),
            Some(activate("invierno")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], true);
    assert_eq!(body["data"]["activatedBy"], admin.id.to_string());

    let (status, _) = app
        .call(
            Method::POST,
            "/api/admin/promo/activate",
            Some(&admin_token),
            Some(activate("INVIERNO")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/admin/promo/activate",
            Some(&admin_token),
            Some(activate("NOEXISTE")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = TestApp::new();
    let (admin, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (victim, _) = app.user("victim@ondas.fm", Role::Listener).await;

    let (status, body) = app
        .call(Method::GET, "/api/admin/users?search=VICTIM", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/users/{}", admin.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/users/{}", victim.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.state.storage.get_user(victim.id).await.unwrap().is_none());

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/users/{}", victim.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_user_removes_dj_profile_mixes_and_requests() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("admin@ondas.fm", Role::Admin).await;
    let (user, dj_token, _) = approved_dj(&app, &admin_token, "dj@ondas.fm").await;
    create_mix(&app, &dj_token, "Último set").await;

    let (_, body) = app.call(Method::GET, "/api/djs", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/users/{}", user.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call(Method::GET, "/api/djs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = app
        .call(Method::GET, "/api/admin/dj-requests", Some(&admin_token), None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = app
        .call(Method::GET, "/api/admin/mixes", Some(&admin_token), None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
