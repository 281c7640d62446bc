//! Action-group HTTP routes.
//!
//! - `POST /invoke`                   route by the invocation's `actionGroup`
//! - `POST /actions/{domain}`         dispatch against one domain's table
//! - `GET  /actions/{domain}/schema`  action-group definition for a domain
//!
//! A known group always answers `200` with a response envelope, whatever the
//! outcome of the call. Only requests that never reach a dispatcher get an
//! error status.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use concierge_agent::ActionGroupRegistry;
use concierge_core::{
    ActionGroupDefinition, ApplicationError, Domain, InterfaceError, Invocation, ResponseEnvelope,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct ActionsState {
    registry: Arc<ActionGroupRegistry>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn from_application(error: ApplicationError, route: &'static str) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        warn!(
            event_name = "server.action.rejected",
            correlation_id = %correlation_id,
            route,
            error = %error,
            "action request rejected before dispatch"
        );
        Self(error.into_interface(correlation_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiErrorBody {
            error: self.0.user_message(),
            detail: self.0.to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(registry: Arc<ActionGroupRegistry>) -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/actions/{domain}", post(invoke_domain))
        .route("/actions/{domain}/schema", get(domain_schema))
        .with_state(ActionsState { registry })
}

async fn invoke(
    State(state): State<ActionsState>,
    payload: Result<Json<Invocation>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Json(invocation) = payload.map_err(|rejection| {
        ApiError::from_application(
            ApplicationError::MalformedInvocation(rejection.body_text()),
            "/invoke",
        )
    })?;

    state
        .registry
        .dispatch(&invocation)
        .await
        .map(Json)
        .map_err(|error| ApiError::from_application(error, "/invoke"))
}

async fn invoke_domain(
    State(state): State<ActionsState>,
    Path(domain): Path<String>,
    payload: Result<Json<Invocation>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let route = "/actions/{domain}";
    let domain = parse_domain(&domain).map_err(|error| ApiError::from_application(error, route))?;
    let Json(invocation) = payload.map_err(|rejection| {
        ApiError::from_application(
            ApplicationError::MalformedInvocation(rejection.body_text()),
            route,
        )
    })?;

    let handler = state.registry.for_domain(domain).ok_or_else(|| {
        ApiError::from_application(ApplicationError::UnknownDomain(domain.to_string()), route)
    })?;
    Ok(Json(handler.handle(&invocation).await))
}

async fn domain_schema(
    State(state): State<ActionsState>,
    Path(domain): Path<String>,
) -> Result<Json<ActionGroupDefinition>, ApiError> {
    let route = "/actions/{domain}/schema";
    let domain = parse_domain(&domain).map_err(|error| ApiError::from_application(error, route))?;

    let definition = state.registry.for_domain(domain).and_then(|handler| {
        let group = state.registry.action_group_for(domain)?;
        Some(handler.table().definition(group))
    });
    definition.map(Json).ok_or_else(|| {
        ApiError::from_application(ApplicationError::UnknownDomain(domain.to_string()), route)
    })
}

fn parse_domain(raw: &str) -> Result<Domain, ApplicationError> {
    raw.parse::<Domain>().map_err(|_| ApplicationError::UnknownDomain(raw.to_string()))
}
