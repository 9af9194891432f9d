use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{NewRecord, SearchQuery};
use super::service::{RecordService, RecordServiceError};
use crate::identity::{IdentityError, IdentityVerifier};
use crate::storage::RecordStore;

/// Router exposing the search and add-record endpoints.
pub fn record_router<S, V>(service: Arc<RecordService<S, V>>) -> Router
where
    S: RecordStore + 'static,
    V: IdentityVerifier + 'static,
{
    Router::new()
        .route("/api/search", post(search_handler::<S, V>))
        .route("/api/add-record", post(add_record_handler::<S, V>))
        .with_state(service)
}

pub(crate) async fn search_handler<S, V>(
    State(service): State<Arc<RecordService<S, V>>>,
    headers: HeaderMap,
    body: Result<Json<SearchQuery>, JsonRejection>,
) -> Response
where
    S: RecordStore + 'static,
    V: IdentityVerifier + 'static,
{
    if let Err(err) = service.authorize(&headers).await {
        return error_response(err);
    }
    let query = match body {
        Ok(Json(query)) => query,
        Err(rejection) => return malformed_body(rejection),
    };

    let name = query.name.unwrap_or_default();
    match service.search(&name).await {
        Ok(found) => (StatusCode::OK, Json(found)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_record_handler<S, V>(
    State(service): State<Arc<RecordService<S, V>>>,
    headers: HeaderMap,
    body: Result<Json<NewRecord>, JsonRejection>,
) -> Response
where
    S: RecordStore + 'static,
    V: IdentityVerifier + 'static,
{
    if let Err(err) = service.authorize(&headers).await {
        return error_response(err);
    }
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.add(request).await {
        Ok(record) => {
            let payload = json!({
                "message": "Tree planting record added successfully",
                "record": record,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// Body problems are only reported once the caller is authorized.
fn malformed_body(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn error_response(err: RecordServiceError) -> Response {
    match err {
        RecordServiceError::Identity(
            identity @ (IdentityError::MissingToken | IdentityError::MalformedToken),
        ) => {
            let payload = json!({ "error": identity.to_string() });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
        RecordServiceError::Identity(IdentityError::Rejected(details)) => {
            let payload = json!({ "error": "Unauthorized", "details": details });
            (StatusCode::FORBIDDEN, Json(payload)).into_response()
        }
        RecordServiceError::Validation(validation) => {
            let payload = json!({
                "error": validation.to_string(),
                "missing": validation.missing,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        RecordServiceError::NotFound { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        other @ (RecordServiceError::Identity(IdentityError::Unavailable(_))
        | RecordServiceError::Storage(_)) => {
            error!(error = %other, "upstream failure");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
