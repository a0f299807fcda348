use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Message used when a failed call carries no message of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Operation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub i64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of entity members are linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Shift,
    WorkRule,
}

impl AssignmentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::WorkRule => "work rule",
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of a batch mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Assign,
    Unassign,
}

impl BatchAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Unassign => "unassign",
        }
    }
}

/// The entity being assigned to, with the members already linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentTarget {
    pub kind: AssignmentKind,
    pub target_id: TargetId,
    pub already_associated_ids: BTreeSet<MemberId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMember {
    pub id: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CandidateMember {
    pub fn new(id: i64) -> Self {
        Self {
            id: MemberId(id),
            name: None,
        }
    }

    pub fn named(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id),
            name: Some(name.into()),
        }
    }
}

/// Result of one remote mutation for one `(target, member)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: Some(message.into()),
        }
    }

    /// Message worth showing to a user, ignoring blank backend text.
    pub fn meaningful_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Reduction of every outcome in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub all_succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_failure_message: Option<String>,
    pub attempted: usize,
    pub failed: usize,
}

impl AggregateResult {
    /// Fold outcomes listed in issue order. The first failure is taken by
    /// position, never by completion time.
    pub fn from_outcomes(outcomes: &[OperationOutcome]) -> Self {
        let failed = outcomes.iter().filter(|outcome| !outcome.succeeded).count();
        let first_failure_message = outcomes
            .iter()
            .find(|outcome| !outcome.succeeded)
            .map(|outcome| {
                outcome
                    .meaningful_message()
                    .unwrap_or(FALLBACK_FAILURE_MESSAGE)
                    .to_string()
            });

        Self {
            all_succeeded: failed == 0,
            first_failure_message,
            attempted: outcomes.len(),
            failed,
        }
    }
}
