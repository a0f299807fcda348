use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::config::AssignmentConfig;
use crate::workflows::assignments::domain::{
    AssignmentKind, CandidateMember, MemberId, OperationOutcome, TargetId,
};
use crate::workflows::assignments::gateway::{AssignmentGateway, GatewayError};
use crate::workflows::assignments::service::AssignmentService;

pub(super) const SHIFT: TargetId = TargetId(41);

#[derive(Debug, Clone)]
pub(super) enum Failure {
    Reject(Option<String>),
    Transport(String),
    Panic(&'static str),
}

/// In-memory backend that records call order and can fail or delay members.
#[derive(Default, Clone)]
pub(super) struct MemoryGateway {
    links: Arc<Mutex<HashMap<(AssignmentKind, TargetId), BTreeSet<MemberId>>>>,
    failures: Arc<Mutex<HashMap<MemberId, Failure>>>,
    delays: Arc<Mutex<HashMap<MemberId, Duration>>>,
    issued: Arc<Mutex<Vec<MemberId>>>,
    completed: Arc<Mutex<Vec<MemberId>>>,
    known_targets_only: bool,
}

impl MemoryGateway {
    pub(super) fn with_links(kind: AssignmentKind, target: TargetId, members: &[i64]) -> Self {
        let gateway = Self::default();
        gateway
            .links
            .lock()
            .expect("links mutex poisoned")
            .insert((kind, target), members.iter().copied().map(MemberId).collect());
        gateway
    }

    /// Lookups for targets without links report the target as missing.
    pub(super) fn known_targets_only(mut self) -> Self {
        self.known_targets_only = true;
        self
    }

    pub(super) fn fail(&self, member: i64, failure: Failure) {
        self.failures
            .lock()
            .expect("failures mutex poisoned")
            .insert(MemberId(member), failure);
    }

    pub(super) fn delay(&self, member: i64, millis: u64) {
        self.delays
            .lock()
            .expect("delays mutex poisoned")
            .insert(MemberId(member), Duration::from_millis(millis));
    }

    pub(super) fn issued(&self) -> Vec<i64> {
        self.issued
            .lock()
            .expect("issued mutex poisoned")
            .iter()
            .map(|id| id.0)
            .collect()
    }

    pub(super) fn completed(&self) -> Vec<i64> {
        self.completed
            .lock()
            .expect("completed mutex poisoned")
            .iter()
            .map(|id| id.0)
            .collect()
    }

    pub(super) fn linked(&self, kind: AssignmentKind, target: TargetId) -> Vec<i64> {
        self.links
            .lock()
            .expect("links mutex poisoned")
            .get(&(kind, target))
            .map(|members| members.iter().map(|id| id.0).collect())
            .unwrap_or_default()
    }

    async fn mutate(
        &self,
        kind: AssignmentKind,
        target: TargetId,
        member: MemberId,
        link: bool,
    ) -> Result<OperationOutcome, GatewayError> {
        self.issued.lock().expect("issued mutex poisoned").push(member);

        let delay = self
            .delays
            .lock()
            .expect("delays mutex poisoned")
            .get(&member)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.completed
            .lock()
            .expect("completed mutex poisoned")
            .push(member);

        let failure = self
            .failures
            .lock()
            .expect("failures mutex poisoned")
            .get(&member)
            .cloned();
        match failure {
            Some(Failure::Reject(message)) => {
                return Ok(OperationOutcome {
                    succeeded: false,
                    message,
                })
            }
            Some(Failure::Transport(message)) => return Err(GatewayError::Transport(message)),
            Some(Failure::Panic(message)) => panic!("{}", message),
            None => {}
        }

        let mut links = self.links.lock().expect("links mutex poisoned");
        let members = links.entry((kind, target)).or_default();
        if link {
            members.insert(member);
        } else {
            members.remove(&member);
        }
        Ok(OperationOutcome::success())
    }
}

#[async_trait]
impl AssignmentGateway for MemoryGateway {
    async fn associated_members(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
    ) -> Result<BTreeSet<MemberId>, GatewayError> {
        let links = self.links.lock().expect("links mutex poisoned");
        match links.get(&(kind, target_id)) {
            Some(members) => Ok(members.clone()),
            None if self.known_targets_only => {
                Err(GatewayError::TargetNotFound { kind, target_id })
            }
            None => Ok(BTreeSet::new()),
        }
    }

    async fn assign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        self.mutate(kind, target_id, member_id, true).await
    }

    async fn unassign(
        &self,
        kind: AssignmentKind,
        target_id: TargetId,
        member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        self.mutate(kind, target_id, member_id, false).await
    }
}

/// Backend whose lookups are unreachable.
pub(super) struct OfflineGateway;

#[async_trait]
impl AssignmentGateway for OfflineGateway {
    async fn associated_members(
        &self,
        _kind: AssignmentKind,
        _target_id: TargetId,
    ) -> Result<BTreeSet<MemberId>, GatewayError> {
        Err(GatewayError::Transport("connection refused".to_string()))
    }

    async fn assign(
        &self,
        _kind: AssignmentKind,
        _target_id: TargetId,
        _member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        Err(GatewayError::Transport("connection refused".to_string()))
    }

    async fn unassign(
        &self,
        _kind: AssignmentKind,
        _target_id: TargetId,
        _member_id: MemberId,
    ) -> Result<OperationOutcome, GatewayError> {
        Err(GatewayError::Transport("connection refused".to_string()))
    }
}

pub(super) fn candidates(ids: &[i64]) -> Vec<CandidateMember> {
    ids.iter()
        .map(|id| CandidateMember::named(*id, format!("Employee {id}")))
        .collect()
}

pub(super) fn member_ids(ids: &[i64]) -> Vec<MemberId> {
    ids.iter().copied().map(MemberId).collect()
}

pub(super) fn build_service(
    gateway: MemoryGateway,
    max_batch_size: usize,
) -> AssignmentService<MemoryGateway> {
    AssignmentService::new(Arc::new(gateway), AssignmentConfig { max_batch_size })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
}
