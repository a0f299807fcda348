use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::reconcile::ReconciledRecord;

/// Key reported for records whose reason is missing or blank.
pub const UNSPECIFIED_CATEGORY: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Reason(String),
    Unspecified,
}

impl CategoryKey {
    pub fn for_reason(reason: Option<&str>) -> Self {
        match reason.map(str::trim).filter(|reason| !reason.is_empty()) {
            Some(reason) => Self::Reason(reason.to_string()),
            None => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Reason(reason) => reason,
            Self::Unspecified => UNSPECIFIED_CATEGORY,
        }
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub key: CategoryKey,
    pub total_amount: f64,
    pub count: usize,
    pub members: Vec<ReconciledRecord>,
}

/// Groups in order of first appearance, addressable by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReasonGroups(Vec<CategoryGroup>);

impl ReasonGroups {
    pub fn get(&self, key: &CategoryKey) -> Option<&CategoryGroup> {
        self.0.iter().find(|group| &group.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReasonGroups {
    type Item = &'a CategoryGroup;
    type IntoIter = std::slice::Iter<'a, CategoryGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Group reconciled records by trimmed reason.
pub fn group_by_reason(records: &[ReconciledRecord]) -> ReasonGroups {
    let mut positions: HashMap<CategoryKey, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for record in records {
        let key = CategoryKey::for_reason(record.reason.as_deref());
        let index = *positions.entry(key.clone()).or_insert_with(|| {
            groups.push(CategoryGroup {
                key,
                total_amount: 0.0,
                count: 0,
                members: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[index];
        group.total_amount += record.amount_or_zero();
        group.count += 1;
        group.members.push(record.clone());
    }

    ReasonGroups(groups)
}
