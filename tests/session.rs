mod common;

use std::sync::Arc;

use cinema_client::config::Config;
use cinema_client::controllers::LoginPage;
use cinema_client::routes::Route;
use cinema_client::services::AuthService;
use cinema_client::session::{FileStorage, SessionStore};
use cinema_client::{ClientContext, ClientError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

fn auth_body(id: i64, is_admin: bool) -> serde_json::Value {
    json!({
        "accessToken": "opaque-token",
        "user": { "id": id, "email": "admin@demo.com", "isAdmin": is_admin }
    })
}

#[tokio::test]
async fn login_persists_session_across_restarts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "admin@demo.com", "password": "min123!" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(1, true)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let config = Config::for_base_url(&format!("{}/api", server.uri())).unwrap();

    let store = SessionStore::restore(Arc::new(FileStorage::new(&file))).unwrap();
    let ctx = ClientContext::with_session(config.clone(), store).unwrap();
    let auth = AuthService::new(ctx.api.clone(), ctx.session.clone());

    let user = auth.login("admin@demo.com", "min123!").await.unwrap();
    assert!(user.is_admin);
    assert_eq!(ctx.session.token().as_deref(), Some("opaque-token"));

    let reopened = SessionStore::restore(Arc::new(FileStorage::new(&file))).unwrap();
    assert_eq!(reopened.user_id(), Some(1));
    assert!(reopened.is_admin());

    auth.logout().unwrap();
    let after_logout = SessionStore::restore(Arc::new(FileStorage::new(&file))).unwrap();
    assert!(!after_logout.is_authenticated());
}

#[tokio::test]
async fn failed_login_shows_form_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let ctx = anonymous(&server);
    let mut page = LoginPage::new(ctx.clone(), true);
    assert!(page.banner().is_some());

    page.email = "admin@demo.com".into();
    page.password = "wrong".into();
    assert!(page.submit().await.is_err());
    assert_eq!(page.error(), Some("Login failed"));
    assert!(!ctx.session.is_authenticated());
}

#[tokio::test]
async fn login_page_lands_on_home() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(4, false)))
        .mount(&server)
        .await;

    let ctx = anonymous(&server);
    let mut page = LoginPage::new(ctx.clone(), false);
    page.email = "admin@demo.com".into();
    page.password = "min123!".into();

    assert_eq!(page.submit().await.unwrap(), Route::Home);
    assert_eq!(ctx.session.user_id(), Some(4));
    assert_eq!(Route::AdminMovies.guard(&ctx.session), Route::Home);
}

#[tokio::test]
async fn malformed_auth_response_does_not_start_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "",
            "user": { "id": 4, "email": "not-an-email", "isAdmin": false }
        })))
        .mount(&server)
        .await;

    let ctx = anonymous(&server);
    let auth = AuthService::new(ctx.api.clone(), ctx.session.clone());
    let err = auth.signup("sam", "sam@demo.com", "secret").await.unwrap_err();

    assert!(matches!(err, ClientError::Schema { .. }));
    assert!(!ctx.session.is_authenticated());
}
