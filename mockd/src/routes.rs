//! HTTP surface of the mock backend.

use crate::state::{MockState, Rejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgerwatch_core::model::RegisterCompany;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

pub type SharedState = Arc<Mutex<MockState>>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/companies", get(list_companies).post(register_company))
        .route("/companies/:id/full_info", get(full_info))
        .route("/companies/:id/amm_info", get(amm_info))
        .route("/companies/:id/check_stakeholders", post(check_stakeholders))
        .route("/companies/:id/check_and_distribute", post(check_and_distribute))
        .route("/matching/all", get(matching_all))
        .route("/matching/investor/:id", get(investor_matches))
        .with_state(state)
}

fn reject(rejection: Rejection) -> Response {
    let status =
        StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "message": rejection.message }))).into_response()
}

async fn list_companies(State(state): State<SharedState>) -> Response {
    let state = state.lock().expect("mock state poisoned");
    Json(state.opportunities()).into_response()
}

async fn register_company(
    State(state): State<SharedState>,
    Json(request): Json<RegisterCompany>,
) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    match state.register(&request) {
        Ok(receipt) => {
            info!(company_id = %receipt.company_id, name = %request.name, "company registered");
            Json(receipt).into_response()
        }
        Err(rejection) => {
            // The registration route reports validation problems under
            // "error", matching the contract the form consumes.
            let status =
                StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::BAD_REQUEST);
            (status, Json(json!({ "error": rejection.message }))).into_response()
        }
    }
}

async fn full_info(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.lock().expect("mock state poisoned");
    match state.full_info(&id) {
        Ok(info) => Json(info).into_response(),
        Err(rejection) => reject(rejection),
    }
}

async fn amm_info(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().expect("mock state poisoned");
    let account = params.get("account").map(String::as_str).filter(|a| !a.is_empty());
    match state.amm_info(&id, account) {
        Ok(info) => Json(json!({ "amm_info": info })).into_response(),
        Err(rejection) => reject(rejection),
    }
}

async fn check_stakeholders(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    match state.check_stakeholders(&id) {
        Ok(receipt) => {
            info!(company_id = %id, "stakeholder check");
            Json(receipt).into_response()
        }
        Err(rejection) => reject(rejection),
    }
}

async fn check_and_distribute(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    match state.check_and_distribute(&id) {
        Ok(receipt) => {
            info!(company_id = %id, shareholders = receipt.distribution.len(), "distributed");
            Json(receipt).into_response()
        }
        Err(rejection) => {
            info!(company_id = %id, message = %rejection.message, "distribution rejected");
            reject(rejection)
        }
    }
}

async fn matching_all(State(state): State<SharedState>) -> Response {
    let state = state.lock().expect("mock state poisoned");
    Json(json!({ "investors": state.investors() })).into_response()
}

async fn investor_matches(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.lock().expect("mock state poisoned");
    match state.investor_matches(&id) {
        Ok(matches) => {
            let count = matches.len();
            Json(json!({ "matches": matches, "count": count })).into_response()
        }
        Err(rejection) => reject(rejection),
    }
}
