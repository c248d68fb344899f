use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub status: String,
    #[serde(default)]
    pub merge_fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct NewSubscriber {
    pub email: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub merge_fields: Map<String, Value>,
}

fn default_status() -> String {
    "active".to_string()
}

pub struct Account {
    api_key: String,
    subscribers: RwLock<HashMap<String, Subscriber>>,
}

pub type Db = Arc<Account>;

type ApiReply = (StatusCode, Json<Value>);

pub fn app(api_key: &str) -> Router {
    let db: Db = Arc::new(Account {
        api_key: api_key.to_string(),
        subscribers: RwLock::new(HashMap::new()),
    });
    Router::new()
        .route(
            "/api/v1/subscribers",
            get(list_subscribers).post(create_subscriber),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn authorize(db: &Account, headers: &HeaderMap) -> Result<(), ApiReply> {
    match headers.get("x-auth-token").and_then(|v| v.to_str().ok()) {
        Some(token) if token == db.api_key => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid API token"})),
        )),
    }
}

fn email_error(message: &str) -> ApiReply {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"errors": {"email": [message]}})),
    )
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

async fn list_subscribers(State(db): State<Db>, headers: HeaderMap) -> ApiReply {
    if let Err(reply) = authorize(&db, &headers) {
        return reply;
    }
    let subscribers = db.subscribers.read().await;
    let all: Vec<&Subscriber> = subscribers.values().collect();
    (StatusCode::OK, Json(json!({ "subscribers": all })))
}

async fn create_subscriber(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<NewSubscriber>,
) -> ApiReply {
    if let Err(reply) = authorize(&db, &headers) {
        return reply;
    }
    if !looks_like_email(&input.email) {
        return email_error("is invalid");
    }

    let key = input.email.to_lowercase();
    let mut subscribers = db.subscribers.write().await;
    if subscribers.contains_key(&key) {
        return email_error("has already been taken");
    }

    let subscriber = Subscriber {
        id: Uuid::new_v4(),
        email: input.email,
        status: input.status,
        merge_fields: input.merge_fields,
    };
    subscribers.insert(key, subscriber.clone());
    (StatusCode::CREATED, Json(json!(subscriber)))
}
