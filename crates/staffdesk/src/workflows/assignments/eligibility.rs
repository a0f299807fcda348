use std::collections::BTreeSet;

use super::domain::{CandidateMember, MemberId};

/// Candidates not yet linked to the target, in pool order.
///
/// An empty result is not an error; callers decide how to report
/// "nothing to assign".
pub fn eligible_candidates<'a>(
    pool: &'a [CandidateMember],
    already_associated: &BTreeSet<MemberId>,
) -> Vec<&'a CandidateMember> {
    pool.iter()
        .filter(|candidate| !already_associated.contains(&candidate.id))
        .collect()
}
