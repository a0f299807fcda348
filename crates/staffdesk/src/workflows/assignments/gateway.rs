use std::collections::BTreeSet;

use async_trait::async_trait;

use super::domain::{AssignmentKind, BatchAction, MemberId, OperationOutcome, TargetId};
use super::orchestrator::AssignmentOperation;

/// Remote mutation endpoints for one backend, covering every target kind.
#[async_trait]
pub trait AssignmentGateway: Send + Sync {
    /// Members currently linked to the target.
    async fn associated_members(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
    ) -> Result<BTreeSet<MemberId>, GatewayError>;

    async fn assign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError>;

    async fn unassign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError>;
}

/// Faults below the structured `{ succeeded, message }` response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("remote endpoint returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("{kind} {target_id} not found")]
    TargetNotFound {
        kind: AssignmentKind,
        target_id: TargetId,
    },
}

impl GatewayError {
    /// Text suitable for a failed outcome: the server's own message when one
    /// came back, otherwise the transport description.
    pub fn best_effort_message(&self) -> String {
        match self {
            GatewayError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            GatewayError::Transport(message) if !message.trim().is_empty() => {
                message.trim().to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Binds a gateway call to one kind and action so the orchestrator can drive
/// it per member.
pub struct GatewayOperation<'a, G: ?Sized> {
    gateway: &'a G,
    kind: AssignmentKind,
    action: BatchAction,
}

impl<'a, G: ?Sized> GatewayOperation<'a, G> {
    pub fn new(gateway: &'a G, kind: AssignmentKind, action: BatchAction) -> Self {
        Self {
            gateway,
            kind,
            action,
        }
    }
}

#[async_trait]
impl<G> AssignmentOperation for GatewayOperation<'_, G>
where
    G: AssignmentGateway + ?Sized,
{
    async fn apply(
        &self,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        match self.action {
            BatchAction::Assign => self.gateway.assign(self.kind, target_id, member_id).await,
            BatchAction::Unassign => self.gateway.unassign(self.kind, target_id, member_id).await,
        }
    }
}
