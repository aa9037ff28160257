#![allow(dead_code)]

use std::sync::Arc;

use cinema_client::config::Config;
use cinema_client::models::UserSummary;
use cinema_client::session::{Session, SessionStore};
use cinema_client::ClientContext;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub fn user(id: i64, is_admin: bool) -> UserSummary {
    UserSummary {
        id,
        email: format!("user{}@demo.com", id),
        is_admin,
    }
}

/// Контекст клиента против mock-сервера, без сессии.
pub fn anonymous(server: &MockServer) -> Arc<ClientContext> {
    let config = Config::for_base_url(&format!("{}/api", server.uri())).unwrap();
    ClientContext::with_session(config, SessionStore::in_memory()).unwrap()
}

pub fn signed_in(server: &MockServer, user: UserSummary) -> Arc<ClientContext> {
    let ctx = anonymous(server);
    ctx.session.set(Session::new(TOKEN, user)).unwrap();
    ctx
}

pub fn messages(ctx: &ClientContext) -> Vec<String> {
    ctx.notifier.active().into_iter().map(|n| n.message).collect()
}

pub fn seat(id: i64, row: &str, number: u32, taken: bool) -> Value {
    json!({ "id": id, "row": row, "number": number, "taken": taken })
}

pub fn screening(id: i64, movie_id: i64, datetime: &str, price: f64) -> Value {
    json!({
        "id": id,
        "datetime": datetime,
        "ticketPrice": price,
        "movieId": movie_id,
        "theaterId": 1,
        "fullyBooked": false
    })
}

pub fn movie(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "duration": 120,
        "description": format!("About {}", title),
        "releaseDate": "2024-03-01",
        "imageURL": format!("https://img.example/{}.jpg", id),
        "category": { "id": 2, "name": "Drama" }
    })
}

pub fn page(content: Vec<Value>, number: u32, total_pages: u32, total_elements: u64) -> Value {
    json!({
        "content": content,
        "number": number,
        "totalPages": total_pages,
        "size": 12,
        "totalElements": total_elements
    })
}

/// Тела запросов указанного метода к указанному пути, в порядке поступления.
pub async fn bodies(server: &MockServer, http_method: &str, url_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == url_path)
        .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
        .collect()
}

pub async fn count(server: &MockServer, http_method: &str, url_path: &str) -> usize {
    bodies(server, http_method, url_path).await.len()
}
