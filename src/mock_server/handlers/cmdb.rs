//! CMDB table endpoint handlers.
//!
//! Responses use the appliance's envelope: `results` carries the payload,
//! `status` and `http_status` report the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::{mkey_of, MockState, Rejection};
use crate::MovePosition;

type SharedState = Arc<RwLock<MockState>>;
type Params = HashMap<String, String>;

fn envelope(method: &str, table: &str, results: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "http_method": method,
            "results": results,
            "vdom": "root",
            "path": table.split('/').next().unwrap_or_default(),
            "name": table.split('/').nth(1).unwrap_or_default(),
            "status": "success",
            "http_status": 200,
        })),
    )
        .into_response()
}

fn failure(status: StatusCode, error: i64) -> Response {
    (
        status,
        Json(json!({
            "status": "error",
            "http_status": status.as_u16(),
            "error": error,
        })),
    )
        .into_response()
}

fn rejection(r: Rejection) -> Response {
    match r {
        Rejection::NotFound => failure(StatusCode::NOT_FOUND, -3),
        Rejection::Invalid => failure(StatusCode::INTERNAL_SERVER_ERROR, -5),
        Rejection::Injected => failure(StatusCode::INTERNAL_SERVER_ERROR, -1),
    }
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let Some(required) = state.required_token.as_deref() else {
        return true;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(required)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": "error", "http_status": 401})),
    )
        .into_response()
}

/// Keep only the `|`-separated fields named by `format`.
fn project(entry: &Value, format: Option<&str>) -> Value {
    let (Some(format), Value::Object(fields)) = (format, entry) else {
        return entry.clone();
    };
    let wanted: Vec<&str> = format.split('|').collect();
    Value::Object(
        fields
            .iter()
            .filter(|(k, _)| wanted.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

/// GET /api/v2/cmdb/{category}/{collection}
pub async fn list_entries(
    State(state): State<SharedState>,
    Path((category, collection)): Path<(String, String)>,
    Query(params): Query<Params>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let table = format!("{category}/{collection}");

    match state.table(&table) {
        Some(t) => {
            let format = params.get("format").map(String::as_str);
            let results: Vec<Value> = t.entries.iter().map(|e| project(e, format)).collect();
            envelope("GET", &table, Value::Array(results))
        }
        None => failure(StatusCode::NOT_FOUND, -3),
    }
}

/// GET /api/v2/cmdb/{category}/{collection}/{mkey}
pub async fn get_entry(
    State(state): State<SharedState>,
    Path((category, collection, mkey)): Path<(String, String, String)>,
    Query(params): Query<Params>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let table = format!("{category}/{collection}");

    match state.get_entry(&table, &mkey) {
        Some(entry) => {
            let format = params.get("format").map(String::as_str);
            envelope("GET", &table, json!([project(entry, format)]))
        }
        None => failure(StatusCode::NOT_FOUND, -3),
    }
}

/// POST /api/v2/cmdb/{category}/{collection}
pub async fn create_entry(
    State(state): State<SharedState>,
    Path((category, collection)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let table = format!("{category}/{collection}");

    match state.insert_entry(&table, body) {
        Ok(mkey) => (
            StatusCode::OK,
            Json(json!({
                "http_method": "POST",
                "mkey": mkey,
                "status": "success",
                "http_status": 200,
            })),
        )
            .into_response(),
        Err(r) => rejection(r),
    }
}

/// PUT /api/v2/cmdb/{category}/{collection}/{mkey}
///
/// With `action=move` and one of `after`/`before`, relocates the entry;
/// otherwise merges the JSON body into it.
pub async fn update_entry(
    State(state): State<SharedState>,
    Path((category, collection, mkey)): Path<(String, String, String)>,
    Query(params): Query<Params>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let mut state = state.write().await;
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let table = format!("{category}/{collection}");

    if params.get("action").map(String::as_str) == Some("move") {
        let (position, target) = match (params.get("after"), params.get("before")) {
            (Some(target), None) => (MovePosition::After, target),
            (None, Some(target)) => (MovePosition::Before, target),
            _ => return failure(StatusCode::BAD_REQUEST, -651),
        };
        return match state.move_entry(&table, &mkey, position, target) {
            Ok(()) => envelope("PUT", &table, Value::Null),
            Err(r) => rejection(r),
        };
    }

    let Some(Json(patch)) = body else {
        return failure(StatusCode::BAD_REQUEST, -651);
    };
    let key_field = match state.table(&table) {
        Some(t) => t.key_field.clone(),
        None => return failure(StatusCode::NOT_FOUND, -3),
    };
    let new_mkey = mkey_of(&patch, &key_field).unwrap_or(mkey.clone());

    match state.update_entry(&table, &mkey, patch) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "http_method": "PUT",
                "mkey": new_mkey,
                "status": "success",
                "http_status": 200,
            })),
        )
            .into_response(),
        Err(r) => rejection(r),
    }
}

/// DELETE /api/v2/cmdb/{category}/{collection}/{mkey}
pub async fn delete_entry(
    State(state): State<SharedState>,
    Path((category, collection, mkey)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let table = format!("{category}/{collection}");

    match state.delete_entry(&table, &mkey) {
        Ok(()) => envelope("DELETE", &table, Value::Null),
        Err(r) => rejection(r),
    }
}
