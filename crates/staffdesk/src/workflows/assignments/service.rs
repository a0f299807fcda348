use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{
    AggregateResult, AssignmentKind, AssignmentTarget, BatchAction, CandidateMember, MemberId,
    TargetId,
};
use super::eligibility::eligible_candidates;
use super::gateway::{AssignmentGateway, GatewayError, GatewayOperation};
use super::orchestrator::{run_batch, BatchError};
use crate::config::AssignmentConfig;

/// Service turning one user selection into a checked batch of gateway calls.
pub struct AssignmentService<G: ?Sized> {
    gateway: Arc<G>,
    config: AssignmentConfig,
}

/// What a batch attempted and how it ended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub action: BatchAction,
    pub kind: AssignmentKind,
    pub target_id: TargetId,
    pub attempted_member_ids: Vec<MemberId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_member_ids: Vec<MemberId>,
    pub result: AggregateResult,
}

impl<G> AssignmentService<G>
where
    G: AssignmentGateway + ?Sized + 'static,
{
    pub fn new(gateway: Arc<G>, config: AssignmentConfig) -> Self {
        Self { gateway, config }
    }

    /// Resolve the target and the members already linked to it.
    pub async fn target(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
    ) -> Result<AssignmentTarget, AssignmentError> {
        let already_associated_ids = self.gateway.associated_members(kind, target_id).await?;
        Ok(AssignmentTarget {
            kind,
            target_id,
            already_associated_ids,
        })
    }

    /// Assign every candidate not yet linked to the target.
    #[tracing::instrument(
        skip(self, kind, target_id, candidates),
        fields(kind = %kind, target = %target_id)
    )]
    pub async fn assign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        candidates: &[CandidateMember],
    ) -> Result<BatchReport, AssignmentError> {
        if candidates.is_empty() {
            return Err(AssignmentError::NoMembersSelected);
        }

        let target = self.target(kind, target_id).await?;
        let eligible = eligible_candidates(candidates, &target.already_associated_ids);
        let member_ids = distinct_in_order(eligible.iter().map(|candidate| candidate.id));
        if member_ids.is_empty() {
            return Err(AssignmentError::NothingToAssign { kind, target_id });
        }

        let skipped_member_ids = distinct_in_order(
            candidates
                .iter()
                .map(|candidate| candidate.id)
                .filter(|id| target.already_associated_ids.contains(id)),
        );

        self.execute(BatchAction::Assign, kind, target_id, member_ids, skipped_member_ids)
            .await
    }

    /// Unlink the selected members from the target.
    #[tracing::instrument(
        skip(self, kind, target_id, member_ids),
        fields(kind = %kind, target = %target_id)
    )]
    pub async fn unassign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_ids: &[MemberId],
    ) -> Result<BatchReport, AssignmentError> {
        let member_ids = distinct_in_order(member_ids.iter().copied());
        if member_ids.is_empty() {
            return Err(AssignmentError::NoMembersSelected);
        }

        // A missing target fails here rather than once per member.
        self.target(kind, target_id).await?;
        self.execute(BatchAction::Unassign, kind, target_id, member_ids, Vec::new())
            .await
    }

    async fn execute(
        &self,
        action: BatchAction,
        kind: AssignmentKind,
        target_id: TargetId,
        member_ids: Vec<MemberId>,
        skipped_member_ids: Vec<MemberId>,
    ) -> Result<BatchReport, AssignmentError> {
        if member_ids.len() > self.config.max_batch_size {
            return Err(AssignmentError::BatchTooLarge {
                requested: member_ids.len(),
                limit: self.config.max_batch_size,
            });
        }

        let operation = GatewayOperation::new(self.gateway.as_ref(), kind, action);
        let result = run_batch(target_id, &member_ids, &operation).await?;

        info!(
            action = action.label(),
            attempted = result.attempted,
            failed = result.failed,
            skipped = skipped_member_ids.len(),
            "batch finished"
        );

        Ok(BatchReport {
            action,
            kind,
            target_id,
            attempted_member_ids: member_ids,
            skipped_member_ids,
            result,
        })
    }
}

fn distinct_in_order(ids: impl IntoIterator<Item = MemberId>) -> Vec<MemberId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Error raised before a batch starts. Failures inside a batch are reported
/// through [`AggregateResult`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("no members were selected")]
    NoMembersSelected,
    #[error("every selected member is already assigned to {kind} {target_id}")]
    NothingToAssign {
        kind: AssignmentKind,
        target_id: TargetId,
    },
    #[error("batch of {requested} members exceeds the limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}
