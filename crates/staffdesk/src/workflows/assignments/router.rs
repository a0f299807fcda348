use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AssignmentKind, CandidateMember, MemberId, TargetId};
use super::gateway::{AssignmentGateway, GatewayError};
use super::service::{AssignmentError, AssignmentService};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub candidates: Vec<CandidateMember>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignRequest {
    #[serde(alias = "member_ids")]
    pub member_ids: Vec<MemberId>,
}

/// Router builder exposing batch assignment endpoints for shifts and work
/// rules.
pub fn assignment_router<G>(service: Arc<AssignmentService<G>>) -> Router
where
    G: AssignmentGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/:kind/:target_id/assignments",
            post(assign_handler::<G>),
        )
        .route(
            "/api/v1/:kind/:target_id/unassignments",
            post(unassign_handler::<G>),
        )
        .with_state(service)
}

pub(crate) fn kind_from_segment(segment: &str) -> Option<AssignmentKind> {
    match segment {
        "shifts" => Some(AssignmentKind::Shift),
        "work-rules" => Some(AssignmentKind::WorkRule),
        _ => None,
    }
}

pub(crate) async fn assign_handler<G>(
    State(service): State<Arc<AssignmentService<G>>>,
    Path((segment, target_id)): Path<(String, i64)>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    G: AssignmentGateway + 'static,
{
    let Some(kind) = kind_from_segment(&segment) else {
        return unknown_kind_response(&segment);
    };

    match service
        .assign(kind, TargetId(target_id), &request.candidates)
        .await
    {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn unassign_handler<G>(
    State(service): State<Arc<AssignmentService<G>>>,
    Path((segment, target_id)): Path<(String, i64)>,
    axum::Json(request): axum::Json<UnassignRequest>,
) -> Response
where
    G: AssignmentGateway + 'static,
{
    let Some(kind) = kind_from_segment(&segment) else {
        return unknown_kind_response(&segment);
    };

    match service
        .unassign(kind, TargetId(target_id), &request.member_ids)
        .await
    {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

fn unknown_kind_response(segment: &str) -> Response {
    let payload = json!({
        "error": format!("unknown assignment target '{segment}'"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn error_response(err: AssignmentError) -> Response {
    let status = match &err {
        AssignmentError::NoMembersSelected
        | AssignmentError::NothingToAssign { .. }
        | AssignmentError::BatchTooLarge { .. }
        | AssignmentError::Batch(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssignmentError::Gateway(GatewayError::TargetNotFound { .. }) => StatusCode::NOT_FOUND,
        AssignmentError::Gateway(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
