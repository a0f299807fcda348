use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, warn};

use super::domain::{AggregateResult, MemberId, OperationOutcome, TargetId};
use super::gateway::GatewayError;

/// One remote mutation for a `(target, member)` pair.
#[async_trait]
pub trait AssignmentOperation: Send + Sync {
    async fn apply(
        &self,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError>;
}

#[async_trait]
impl<F, Fut> AssignmentOperation for F
where
    F: Fn(TargetId, MemberId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<OperationOutcome, GatewayError>> + Send + 'static,
{
    async fn apply(
        &self,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        (self)(target_id, member_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// Callers must check for an empty selection before starting a batch.
    #[error("a batch needs at least one member")]
    EmptyBatch,
}

/// Run `operation` once per member, all calls in flight together, and reduce
/// every outcome into one verdict.
///
/// Every call settles before the reduction: a failing member never cancels
/// its siblings, and members that succeeded stay applied. Transport errors
/// and panics inside `operation` become failed outcomes. The reported
/// failure is the first one in `member_ids` order.
#[tracing::instrument(
    name = "run_batch",
    skip(target_id, member_ids, operation),
    fields(target = %target_id, batch_size = member_ids.len())
)]
pub async fn run_batch<O>(
    target_id: TargetId,
    member_ids: &[MemberId],
    operation: &O,
) -> Result<AggregateResult, BatchError>
where
    O: AssignmentOperation + ?Sized,
{
    if member_ids.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    let calls = member_ids
        .iter()
        .map(|&member_id| settle(operation, target_id, member_id));
    let outcomes = join_all(calls).await;

    let result = AggregateResult::from_outcomes(&outcomes);
    if result.all_succeeded {
        debug!(attempted = result.attempted, "batch settled without failures");
    } else {
        warn!(
            attempted = result.attempted,
            failed = result.failed,
            first_failure = result.first_failure_message.as_deref().unwrap_or_default(),
            "batch settled with failures"
        );
    }

    Ok(result)
}

async fn settle<O>(operation: &O, target_id: TargetId, member_id: MemberId) -> OperationOutcome
where
    O: AssignmentOperation + ?Sized,
{
    let attempt = AssertUnwindSafe(operation.apply(target_id, member_id))
        .catch_unwind()
        .await;

    match attempt {
        Ok(Ok(outcome)) => {
            if !outcome.succeeded {
                debug!(member = %member_id, message = ?outcome.message, "member rejected");
            }
            outcome
        }
        Ok(Err(err)) => {
            warn!(member = %member_id, error = %err, "member call failed in transport");
            OperationOutcome::failure(err.best_effort_message())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(member = %member_id, %message, "member call panicked");
            OperationOutcome::failure(message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "operation aborted unexpectedly".to_string()
    }
}
