//! In-process fake of the inventory backend, served by axum on an
//! ephemeral port.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use stockroom_client::{InventoryApi, RetryPolicy};

#[derive(Default)]
pub struct FakeState {
    pub products: Mutex<Vec<Value>>,
    /// Number of upcoming bulk-create calls to answer with 429.
    pub throttle_bulk: AtomicU32,
    pub bulk_calls: AtomicU32,
    pub last_auth: Mutex<Option<String>>,
    pub last_body: Mutex<Option<Value>>,
}

pub fn product_doc(id: &str, serial: &str) -> Value {
    json!({
        "_id": id,
        "category": "Computer",
        "attributes": [
            { "key": "brand", "value": "Lenovo" },
            { "key": "model", "value": "ThinkPad X1" }
        ],
        "status": "Available",
        "productCondition": "Optimal",
        "location": "FP warehouse",
        "serialNumber": serial,
        "recoverable": true
    })
}

fn record_auth(state: &FakeState, headers: &HeaderMap) {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_auth.lock().unwrap() = auth;
}

async fn list_products(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Json<Value> {
    record_auth(&state, &headers);
    Json(Value::Array(state.products.lock().unwrap().clone()))
}

async fn get_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let products = state.products.lock().unwrap();
    match products.iter().find(|p| p["_id"] == id.as_str()) {
        Some(p) => (StatusCode::OK, Json(p.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "statusCode": 404, "message": "Product not found" })),
        ),
    }
}

async fn create_product(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    *state.last_body.lock().unwrap() = Some(body.clone());
    let serial = body["serialNumber"].as_str().unwrap_or_default().to_string();
    let mut products = state.products.lock().unwrap();
    if !serial.is_empty() && products.iter().any(|p| p["serialNumber"] == serial.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "statusCode": 400, "message": "Serial Number already exists" })),
        );
    }
    let mut doc = body;
    doc["_id"] = json!(format!("p{}", products.len() + 1));
    products.push(doc.clone());
    (StatusCode::CREATED, Json(doc))
}

async fn bulk_create(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.bulk_calls.fetch_add(1, Ordering::SeqCst);
    let throttled = state
        .throttle_bulk
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if throttled {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "message": "Too many requests" })),
        );
    }
    let mut products = state.products.lock().unwrap();
    let mut created = Vec::new();
    for item in body.as_array().cloned().unwrap_or_default() {
        let mut doc = item;
        doc["_id"] = json!(format!("p{}", products.len() + 1));
        products.push(doc.clone());
        created.push(doc);
    }
    (StatusCode::CREATED, Json(Value::Array(created)))
}

async fn reassign_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    *state.last_body.lock().unwrap() = Some(body.clone());
    let mut products = state.products.lock().unwrap();
    let Some(doc) = products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" })));
    };
    for key in ["assignedEmail", "assignedMember", "location", "status"] {
        doc[key] = body[key].clone();
    }
    (StatusCode::OK, Json(doc.clone()))
}

async fn delete_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut products = state.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn export_csv() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/csv")],
        "Category,Brand,Model\nComputer,Lenovo,ThinkPad X1\n",
    )
}

async fn list_members() -> Json<Value> {
    Json(json!([{
        "_id": "m1",
        "firstName": "Ana",
        "lastName": "Diaz",
        "email": "ana@acme.io",
        "dni": 30111222,
        "startDate": "2023-03-01T00:00:00.000Z",
        "team": { "_id": "t1", "name": "Design" }
    }]))
}

async fn list_offices() -> Json<Value> {
    Json(json!([{ "_id": "o1", "name": "HQ", "country": "AR", "isDefault": true }]))
}

pub fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/bulkcreate", post(bulk_create))
        .route("/api/products/export-csv", get(export_csv))
        .route("/api/products/{id}", get(get_product).delete(delete_product))
        .route("/api/products/{id}/reassign", patch(reassign_product))
        .route("/api/members", get(list_members))
        .route("/api/offices", get(list_offices))
        .with_state(state)
}

/// Start the fake backend and return a client pointed at it.
pub async fn spawn_backend(state: Arc<FakeState>) -> InventoryApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    InventoryApi::new(format!("http://{addr}/"), Duration::from_secs(5))
        .unwrap()
        .with_bulk_retry(RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            ..RetryPolicy::default()
        })
}
