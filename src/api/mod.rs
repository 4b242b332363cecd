//! HTTP API module for the payroll engine.
//!
//! This module exposes the period lifecycle and the settlement workflow as
//! JSON endpoints on an axum router.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ACTOR_HEADER, create_router};
pub use request::{
    AddNovedadRequest, ApproveSettlementRequest, CreatePeriodRequest, GenerateSettlementRequest,
    PaySettlementRequest, PeriodActionRequest, RejectSettlementRequest, UpdateSettlementRequest,
};
pub use response::{ApiError, ApiErrorResponse, NovedadResponse, SettlementResponse};
pub use state::AppState;
