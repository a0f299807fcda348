use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use staffdesk::error::AppError;
use staffdesk::workflows::assignments::{
    AssignmentGateway, AssignmentKind, GatewayError, MemberId, OperationOutcome, TargetId,
};
use staffdesk::workflows::payroll::{LedgerCsvImporter, PayrollReportPayload};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Clone)]
struct RosterSlot {
    capacity: Option<usize>,
    members: BTreeSet<MemberId>,
}

/// Process-local roster standing in for the scheduling backend.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRoster {
    slots: Arc<Mutex<HashMap<(AssignmentKind, TargetId), RosterSlot>>>,
}

impl InMemoryRoster {
    /// Roster used by the service and the demo: two shifts and two work rules.
    pub(crate) fn seeded() -> Self {
        let roster = Self::default();
        roster.add_target(AssignmentKind::Shift, TargetId(1), Some(3), &[1, 2]);
        roster.add_target(AssignmentKind::Shift, TargetId(2), None, &[]);
        roster.add_target(AssignmentKind::WorkRule, TargetId(1), None, &[3]);
        roster.add_target(AssignmentKind::WorkRule, TargetId(2), None, &[]);
        roster
    }

    pub(crate) fn add_target(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        capacity: Option<usize>,
        members: &[i64],
    ) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(
                (kind, target_id),
                RosterSlot {
                    capacity,
                    members: members.iter().copied().map(MemberId).collect(),
                },
            );
        }
    }

    fn slots(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<(AssignmentKind, TargetId), RosterSlot>>, GatewayError>
    {
        self.slots
            .lock()
            .map_err(|_| GatewayError::Transport("roster lock poisoned".to_string()))
    }
}

#[async_trait]
impl AssignmentGateway for InMemoryRoster {
    async fn associated_members(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
    ) -> Result<BTreeSet<MemberId>, GatewayError> {
        self.slots()?
            .get(&(kind, target_id))
            .map(|slot| slot.members.clone())
            .ok_or(GatewayError::TargetNotFound { kind, target_id })
    }

    async fn assign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        let mut slots = self.slots()?;
        let slot = slots
            .get_mut(&(kind, target_id))
            .ok_or(GatewayError::TargetNotFound { kind, target_id })?;

        if slot.members.contains(&member_id) {
            return Ok(OperationOutcome::failure(format!(
                "member {member_id} is already assigned to {kind} {target_id}"
            )));
        }
        if slot
            .capacity
            .is_some_and(|capacity| slot.members.len() >= capacity)
        {
            return Ok(OperationOutcome::failure(format!(
                "{kind} {target_id} is full"
            )));
        }

        slot.members.insert(member_id);
        Ok(OperationOutcome::success())
    }

    async fn unassign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        let mut slots = self.slots()?;
        let slot = slots
            .get_mut(&(kind, target_id))
            .ok_or(GatewayError::TargetNotFound { kind, target_id })?;

        if slot.members.remove(&member_id) {
            Ok(OperationOutcome::success())
        } else {
            Ok(OperationOutcome::failure(format!(
                "member {member_id} is not assigned to {kind} {target_id}"
            )))
        }
    }
}

/// Read a report payload from JSON, optionally replacing either ledger with a
/// CSV export.
pub(crate) fn load_report(
    report: &Path,
    deductions_csv: Option<&Path>,
    details_csv: Option<&Path>,
) -> Result<PayrollReportPayload, AppError> {
    let raw = std::fs::read_to_string(report)?;
    let mut payload: PayrollReportPayload = serde_json::from_str(&raw)?;

    if let Some(path) = deductions_csv {
        payload.deductions = Some(LedgerCsvImporter::from_path(path)?);
    }
    if let Some(path) = details_csv {
        payload.deduction_details = Some(LedgerCsvImporter::from_path(path)?);
    }

    Ok(payload)
}
