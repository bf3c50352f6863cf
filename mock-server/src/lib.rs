//! Mock REST server for the administration console API.
//!
//! Serves CRUD over every collection in `store::COLLECTIONS`, plus bulk store
//! assignment, transaction upload, incentive reports and token refresh.
//! Some collections answer with a `{"data": ...}` envelope and some with the
//! bare payload, matching what clients see from the real backend.

pub mod reports;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::reports::{incentive_rows, to_csv, ReportParams};
use crate::store::{Rejection, Store};

pub use crate::reports::IncentiveRow;

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct BulkAssignment {
    pub assignments: Vec<Value>,
}

#[derive(Deserialize)]
pub struct TransactionUpload {
    pub file_name: String,
    pub rows: Vec<Value>,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/refresh-token", post(refresh_token))
        .route("/reports/incentives", get(incentive_report))
        .route("/reports/incentives/export", get(export_incentive_report))
        .route("/store-assignments/bulk", post(bulk_assign_stores))
        .route("/transactions/upload", post(upload_transactions))
        .route("/{collection}", get(list_records).post(create_record))
        .route(
            "/{collection}/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn rejection_status(rejection: Rejection) -> StatusCode {
    match rejection {
        Rejection::UnknownCollection => StatusCode::NOT_FOUND,
        Rejection::NotAnObject | Rejection::MissingField(_) | Rejection::WrongType(_) => {
            tracing::debug!(?rejection, "payload rejected");
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

async fn list_records(
    State(db): State<Db>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let collection = store.collection(&collection).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(collection.shape(Value::Array(collection.list()))))
}

async fn create_record(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut store = db.write().await;
    let collection = store.collection_mut(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let record = collection.insert(input).map_err(rejection_status)?;
    tracing::debug!(collection = collection.spec.name, id = %record["id"], "record created");
    Ok((StatusCode::CREATED, Json(collection.shape(record))))
}

async fn get_record(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, Uuid)>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let collection = store.collection(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let record = collection.get(id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(collection.shape(record)))
}

async fn update_record(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, Uuid)>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let collection = store.collection_mut(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let record = collection
        .update(id, patch)
        .map_err(rejection_status)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(collection.shape(record)))
}

async fn delete_record(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let collection = store.collection_mut(&collection).ok_or(StatusCode::NOT_FOUND)?;
    collection
        .remove(id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn bulk_assign_stores(
    State(db): State<Db>,
    Json(input): Json<BulkAssignment>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let created = db
        .write()
        .await
        .insert_all("store-assignments", input.assignments)
        .map_err(rejection_status)?;
    tracing::info!(count = created.len(), "bulk store assignment");
    Ok((StatusCode::CREATED, Json(json!({ "data": created }))))
}

async fn upload_transactions(
    State(db): State<Db>,
    Json(input): Json<TransactionUpload>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let imported = db
        .write()
        .await
        .insert_all("transactions", input.rows)
        .map_err(rejection_status)?
        .len();
    tracing::info!(file_name = %input.file_name, imported, "transactions uploaded");
    Ok((StatusCode::CREATED, Json(json!({ "data": { "imported": imported } }))))
}

async fn incentive_report(
    State(db): State<Db>,
    Query(params): Query<ReportParams>,
) -> Json<Value> {
    let rows = incentive_rows(&*db.read().await, &params);
    Json(json!({ "data": rows, "period": params.period }))
}

async fn export_incentive_report(
    State(db): State<Db>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    let rows = incentive_rows(&*db.read().await, &params);
    ([(header::CONTENT_TYPE, "text/csv")], to_csv(&rows))
}

async fn refresh_token(Json(input): Json<RefreshRequest>) -> Result<Json<Value>, StatusCode> {
    if input.refresh_token.trim().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "data": {
            "access_token": format!("access-{}", Uuid::new_v4()),
            "refresh_token": format!("refresh-{}", Uuid::new_v4()),
        }
    })))
}
