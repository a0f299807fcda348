//! Batch assignment of members to shifts and work rules.
//!
//! A user selection is narrowed by [`eligible_candidates`], fanned out into
//! one gateway call per member by [`run_batch`], and reduced into a single
//! [`AggregateResult`] the caller turns into one notification.

pub mod domain;
pub mod eligibility;
pub mod gateway;
pub mod orchestrator;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AggregateResult, AssignmentKind, AssignmentTarget, BatchAction, CandidateMember, MemberId,
    OperationOutcome, TargetId, FALLBACK_FAILURE_MESSAGE,
};
pub use eligibility::eligible_candidates;
pub use gateway::{AssignmentGateway, GatewayError, GatewayOperation};
pub use orchestrator::{run_batch, AssignmentOperation, BatchError};
pub use router::{assignment_router, AssignRequest, UnassignRequest};
pub use service::{AssignmentError, AssignmentService, BatchReport};
