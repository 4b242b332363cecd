//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints. Every handler tags its log lines with a fresh correlation id
//! and stamps the caller from the `x-actor-id` header.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::Actor;
use crate::error::{EngineError, EngineResult};

use super::request::{
    AddNovedadRequest, ApproveSettlementRequest, CreatePeriodRequest, GenerateSettlementRequest,
    PaySettlementRequest, PeriodActionRequest, RejectSettlementRequest, UpdateSettlementRequest,
};
use super::response::{ApiError, ApiErrorResponse, NovedadResponse, SettlementResponse};
use super::state::AppState;

/// Header naming the user behind a request.
pub const ACTOR_HEADER: &str = "x-actor-id";

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/periods", post(create_period))
        .route("/periods/:id", get(get_period))
        .route(
            "/periods/:id/novedades",
            post(add_novedad).get(list_novedades),
        )
        .route("/periods/:id/liquidate", post(liquidate_period))
        .route("/periods/:id/entries", get(list_entries))
        .route("/periods/:id/approve", post(approve_period))
        .route("/periods/:id/close", post(close_period))
        .route("/settlements", post(generate_settlement))
        .route(
            "/settlements/:id",
            get(get_settlement).patch(update_settlement),
        )
        .route("/settlements/:id/submit", post(submit_settlement))
        .route("/settlements/:id/approve", post(approve_settlement))
        .route("/settlements/:id/reject", post(reject_settlement))
        .route("/settlements/:id/pay", post(pay_settlement))
        .route(
            "/contracts/:contract_id/settlement",
            get(get_contract_settlement),
        )
        .with_state(state)
}

fn actor_from(headers: &HeaderMap) -> Actor {
    headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Actor::new)
        .unwrap_or_else(Actor::system)
}

fn read_id(
    correlation_id: Uuid,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Uuid, ApiErrorResponse> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "Invalid path id");
            Err(ApiErrorResponse::bad_request(ApiError::with_details(
                "VALIDATION_ERROR",
                body_text,
                "field: id",
            )))
        }
    }
}

fn read_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(req)) => return Ok(req),
        Err(rejection) => rejection,
    };
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Parses a body that may be left out entirely.
fn read_optional_json<T: DeserializeOwned + Default>(
    correlation_id: Uuid,
    body: &Bytes,
) -> Result<T, ApiErrorResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Optional body rejected");
        ApiErrorResponse::bad_request(ApiError::malformed_json(err.to_string()))
    })
}

fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: EngineResult<T>,
) -> HandlerResult {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                status = status.as_u16(),
                "Request completed"
            );
            Ok((status, Json(body)).into_response())
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                kind = ?err.kind(),
                error = %err,
                "Request failed"
            );
            Err(err.into())
        }
    }
}

// ---- periods -----------------------------------------------------------

/// Handler for POST /periods.
async fn create_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePeriodRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    info!(correlation_id = %correlation_id, actor = %actor.id, "Processing create period request");

    let request = read_json(correlation_id, payload)?;
    let result = state.engine().create_period(&actor, request.into());
    respond(correlation_id, "create_period", StatusCode::CREATED, result)
}

/// Handler for GET /periods/:id.
async fn get_period(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let period_id = read_id(correlation_id, path)?;
    respond(
        correlation_id,
        "get_period",
        StatusCode::OK,
        state.engine().period(period_id),
    )
}

/// Handler for POST /periods/:id/novedades.
async fn add_novedad(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AddNovedadRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let period_id = read_id(correlation_id, path)?;
    info!(
        correlation_id = %correlation_id,
        period_id = %period_id,
        actor = %actor.id,
        "Processing add novedad request"
    );

    let request = read_json(correlation_id, payload)?;
    let result = state
        .engine()
        .add_novedad(&actor, period_id, request.into())
        .map(NovedadResponse::from);
    respond(correlation_id, "add_novedad", StatusCode::CREATED, result)
}

/// Handler for GET /periods/:id/novedades.
async fn list_novedades(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let period_id = read_id(correlation_id, path)?;
    let result = state.engine().novedades(period_id).map(|novedades| {
        novedades
            .into_iter()
            .map(NovedadResponse::from)
            .collect::<Vec<_>>()
    });
    respond(correlation_id, "list_novedades", StatusCode::OK, result)
}

/// Handler for POST /periods/:id/liquidate.
///
/// The batch runs on the blocking pool so the async workers stay free.
async fn liquidate_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let period_id = read_id(correlation_id, path)?;
    info!(
        correlation_id = %correlation_id,
        period_id = %period_id,
        actor = %actor.id,
        "Processing liquidation request"
    );

    let engine = state.engine_handle();
    let result = tokio::task::spawn_blocking(move || engine.liquidate(&actor, period_id))
        .await
        .unwrap_or_else(|join_error| {
            Err(EngineError::Persistence {
                message: format!("liquidation task failed: {}", join_error),
            })
        });
    respond(correlation_id, "liquidate_period", StatusCode::OK, result)
}

/// Handler for GET /periods/:id/entries.
async fn list_entries(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let period_id = read_id(correlation_id, path)?;
    respond(
        correlation_id,
        "list_entries",
        StatusCode::OK,
        state.engine().entries(period_id),
    )
}

/// Handler for POST /periods/:id/approve.
async fn approve_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let period_id = read_id(correlation_id, path)?;
    let request: PeriodActionRequest = read_optional_json(correlation_id, &body)?;

    let result = state
        .engine()
        .approve_period(&actor, period_id, request.comment);
    respond(correlation_id, "approve_period", StatusCode::OK, result)
}

/// Handler for POST /periods/:id/close.
async fn close_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let period_id = read_id(correlation_id, path)?;
    let request: PeriodActionRequest = read_optional_json(correlation_id, &body)?;

    let result = state
        .engine()
        .close_period(&actor, period_id, request.comment);
    respond(correlation_id, "close_period", StatusCode::OK, result)
}

// ---- settlements -------------------------------------------------------

/// Handler for POST /settlements.
async fn generate_settlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateSettlementRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    info!(correlation_id = %correlation_id, actor = %actor.id, "Processing settlement request");

    let request = read_json(correlation_id, payload)?;
    let result = state
        .engine()
        .generate_settlement(&actor, request.into())
        .map(SettlementResponse::from);
    respond(correlation_id, "generate_settlement", StatusCode::CREATED, result)
}

/// Handler for GET /settlements/:id.
async fn get_settlement(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let settlement_id = read_id(correlation_id, path)?;
    let result = state
        .engine()
        .settlement(settlement_id)
        .map(SettlementResponse::from);
    respond(correlation_id, "get_settlement", StatusCode::OK, result)
}

/// Handler for GET /contracts/:contract_id/settlement.
async fn get_contract_settlement(
    State(state): State<AppState>,
    Path(contract_id): Path<String>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let result = state
        .engine()
        .settlement_for_contract(&contract_id)
        .map(SettlementResponse::from);
    respond(correlation_id, "get_contract_settlement", StatusCode::OK, result)
}

/// Handler for PATCH /settlements/:id.
async fn update_settlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateSettlementRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let settlement_id = read_id(correlation_id, path)?;
    let request = read_json(correlation_id, payload)?;

    let result = state
        .engine()
        .update_settlement(
            &actor,
            settlement_id,
            &request.changes(),
            &request.justification,
        )
        .map(SettlementResponse::from);
    respond(correlation_id, "update_settlement", StatusCode::OK, result)
}

/// Handler for POST /settlements/:id/submit.
async fn submit_settlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let settlement_id = read_id(correlation_id, path)?;

    let result = state
        .engine()
        .submit_settlement(&actor, settlement_id)
        .map(SettlementResponse::from);
    respond(correlation_id, "submit_settlement", StatusCode::OK, result)
}

/// Handler for POST /settlements/:id/approve.
async fn approve_settlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let settlement_id = read_id(correlation_id, path)?;
    let request: ApproveSettlementRequest = read_optional_json(correlation_id, &body)?;

    let result = state
        .engine()
        .approve_settlement(&actor, settlement_id, request.comments)
        .map(SettlementResponse::from);
    respond(correlation_id, "approve_settlement", StatusCode::OK, result)
}

/// Handler for POST /settlements/:id/reject.
async fn reject_settlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RejectSettlementRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let settlement_id = read_id(correlation_id, path)?;
    let request = read_json(correlation_id, payload)?;

    let result = state
        .engine()
        .reject_settlement(&actor, settlement_id, &request.reason)
        .map(SettlementResponse::from);
    respond(correlation_id, "reject_settlement", StatusCode::OK, result)
}

/// Handler for POST /settlements/:id/pay.
async fn pay_settlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<PaySettlementRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let actor = actor_from(&headers);
    let settlement_id = read_id(correlation_id, path)?;
    let request = read_json(correlation_id, payload)?;

    let result = state
        .engine()
        .mark_settlement_paid(&actor, settlement_id, &request.payment_reference)
        .map(SettlementResponse::from);
    respond(correlation_id, "pay_settlement", StatusCode::OK, result)
}
