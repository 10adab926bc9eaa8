//! # API REST
//!
//! REST API implementation for FlowCMS.
//!
//! Handles:
//! - HTTP endpoints with axum, mapped one-to-one onto Entity Store calls
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status-code mapping)
//!
//! All persistence lives in `flowcms-core`; this crate never touches the
//! filesystem directly.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use flowcms_core::{ContentStore, EntityKind, Record, StoreError};

/// Application state for the REST API server.
///
/// The store is internally shared (cheap clone), so the state holds it by
/// value.
#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
}

/// Health check response.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Response for a successful delete.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct DeleteRes {
    /// Id of the deleted entity.
    pub deleted: String,
}

/// Request body for batch loads.
#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct BatchLoadReq {
    /// Entity ids to load; unreadable ids are silently omitted from the
    /// response.
    pub ids: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_flows,
        create_flow,
        update_flow,
        delete_flow,
        get_flow_component,
        batch_load_flows,
        list_nuggets,
        create_nugget,
        get_nugget,
        update_nugget,
        delete_nugget,
        batch_load_nuggets,
    ),
    components(schemas(HealthRes, DeleteRes, BatchLoadReq))
)]
struct ApiDoc;

/// Build the application router over the given state.
///
/// Mounted alongside the API routes: Swagger UI at `/swagger-ui` and the
/// OpenAPI document at `/api-docs/openapi.json`. CORS is permissive; the
/// server is meant to sit on a local or trusted network.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/flows", get(list_flows))
        .route("/flows", post(create_flow))
        .route("/flows/batch", post(batch_load_flows))
        .route("/flows/:id", put(update_flow))
        .route("/flows/:id", delete(delete_flow))
        .route("/flows/:id/components/:component", get(get_flow_component))
        .route("/nuggets", get(list_nuggets))
        .route("/nuggets", post(create_nugget))
        .route("/nuggets/batch", post(batch_load_nuggets))
        .route("/nuggets/:id", get(get_nugget))
        .route("/nuggets/:id", put(update_nugget))
        .route("/nuggets/:id", delete(delete_nugget))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Translate a store error into an HTTP response.
///
/// Missing entities map to 404, rejected component types to 400, everything
/// else is an internal error with the cause logged.
fn store_error_response(context: &'static str, e: StoreError) -> (StatusCode, &'static str) {
    match e {
        StoreError::InvalidComponentType(_) => {
            tracing::warn!("{context}: {e}");
            (StatusCode::BAD_REQUEST, "Invalid component type")
        }
        e if e.is_not_found() => {
            tracing::warn!("{context}: {e}");
            (StatusCode::NOT_FOUND, "Not found")
        }
        e => {
            tracing::error!("{context}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Entity payloads must be JSON objects, never arrays or scalars.
fn require_object(body: Value) -> Result<Record, (StatusCode, &'static str)> {
    match body {
        Value::Object(record) => Ok(record),
        _ => Err((StatusCode::BAD_REQUEST, "Request body must be a JSON object")),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "FlowCMS REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/flows",
    responses(
        (status = 200, description = "All Flow records"),
        (status = 500, description = "Internal server error")
    )
)]
/// List all Flows.
///
/// Unreadable Flow records are omitted rather than failing the listing.
#[axum::debug_handler]
async fn list_flows(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, (StatusCode, &'static str)> {
    match state.store.list_all_flows().await {
        Ok(flows) => Ok(Json(flows)),
        Err(e) => Err(store_error_response("list flows", e)),
    }
}

#[utoipa::path(
    post,
    path = "/flows",
    responses(
        (status = 201, description = "Flow created; full record with id and timestamps"),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a Flow from a partial payload.
#[axum::debug_handler]
async fn create_flow(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Record>), (StatusCode, &'static str)> {
    let partial = require_object(body)?;
    match state.store.create_flow(partial).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => Err(store_error_response("create flow", e)),
    }
}

#[utoipa::path(
    put,
    path = "/flows/{id}",
    responses(
        (status = 200, description = "Merged Flow record"),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Flow not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Merge a partial payload into a Flow.
#[axum::debug_handler]
async fn update_flow(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, (StatusCode, &'static str)> {
    let partial = require_object(body)?;
    match state.store.merge_update(EntityKind::Flow, &id, partial).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(store_error_response("update flow", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/flows/{id}",
    responses(
        (status = 200, description = "Flow deleted", body = DeleteRes),
        (status = 404, description = "Flow not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Delete a Flow and everything in its directory.
///
/// Nuggets referenced by the Flow are not deleted; they may be shared.
#[axum::debug_handler]
async fn delete_flow(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DeleteRes>, (StatusCode, &'static str)> {
    match state.store.delete_flow(&id).await {
        Ok(()) => Ok(Json(DeleteRes { deleted: id })),
        Err(e) => Err(store_error_response("delete flow", e)),
    }
}

#[utoipa::path(
    get,
    path = "/flows/{id}/components/{component}",
    responses(
        (status = 200, description = "Component data"),
        (status = 400, description = "Invalid component type"),
        (status = 404, description = "Component not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Read a named component of a Flow (`flow` or `nuggetSeq`).
#[axum::debug_handler]
async fn get_flow_component(
    State(state): State<AppState>,
    AxumPath((id, component)): AxumPath<(String, String)>,
) -> Result<Json<Record>, (StatusCode, &'static str)> {
    match state.store.get_flow_component(&id, &component).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(store_error_response("get flow component", e)),
    }
}

#[utoipa::path(
    post,
    path = "/flows/batch",
    request_body = BatchLoadReq,
    responses(
        (status = 200, description = "Successfully loaded Flow records; failed ids omitted")
    )
)]
/// Batch-load Flows by id (best-effort).
#[axum::debug_handler]
async fn batch_load_flows(
    State(state): State<AppState>,
    Json(req): Json<BatchLoadReq>,
) -> Json<Vec<Record>> {
    Json(
        state
            .store
            .load_entities_by_ids(EntityKind::Flow, &req.ids)
            .await,
    )
}

#[utoipa::path(
    get,
    path = "/nuggets",
    responses(
        (status = 200, description = "All Nugget records"),
        (status = 500, description = "Internal server error")
    )
)]
/// List all Nuggets.
#[axum::debug_handler]
async fn list_nuggets(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, (StatusCode, &'static str)> {
    match state.store.list_all_nuggets().await {
        Ok(nuggets) => Ok(Json(nuggets)),
        Err(e) => Err(store_error_response("list nuggets", e)),
    }
}

#[utoipa::path(
    post,
    path = "/nuggets",
    responses(
        (status = 201, description = "Nugget created; full record with id and timestamps"),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a Nugget from a partial payload.
#[axum::debug_handler]
async fn create_nugget(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Record>), (StatusCode, &'static str)> {
    let partial = require_object(body)?;
    match state.store.create_nugget(partial).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => Err(store_error_response("create nugget", e)),
    }
}

#[utoipa::path(
    get,
    path = "/nuggets/{id}",
    responses(
        (status = 200, description = "Nugget record"),
        (status = 404, description = "Nugget not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Read a single Nugget.
#[axum::debug_handler]
async fn get_nugget(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Record>, (StatusCode, &'static str)> {
    match state.store.get_nugget(&id).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(store_error_response("get nugget", e)),
    }
}

#[utoipa::path(
    put,
    path = "/nuggets/{id}",
    responses(
        (status = 200, description = "Merged Nugget record"),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Nugget not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Merge a partial payload into a Nugget.
#[axum::debug_handler]
async fn update_nugget(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, (StatusCode, &'static str)> {
    let partial = require_object(body)?;
    match state
        .store
        .merge_update(EntityKind::Nugget, &id, partial)
        .await
    {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(store_error_response("update nugget", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/nuggets/{id}",
    responses(
        (status = 200, description = "Nugget deleted", body = DeleteRes),
        (status = 404, description = "Nugget not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Delete a Nugget.
#[axum::debug_handler]
async fn delete_nugget(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DeleteRes>, (StatusCode, &'static str)> {
    match state.store.delete_nugget(&id).await {
        Ok(()) => Ok(Json(DeleteRes { deleted: id })),
        Err(e) => Err(store_error_response("delete nugget", e)),
    }
}

#[utoipa::path(
    post,
    path = "/nuggets/batch",
    request_body = BatchLoadReq,
    responses(
        (status = 200, description = "Successfully loaded Nugget records; failed ids omitted")
    )
)]
/// Batch-load Nuggets by id (best-effort).
#[axum::debug_handler]
async fn batch_load_nuggets(
    State(state): State<AppState>,
    Json(req): Json<BatchLoadReq>,
) -> Json<Vec<Record>> {
    Json(
        state
            .store
            .load_entities_by_ids(EntityKind::Nugget, &req.ids)
            .await,
    )
}
