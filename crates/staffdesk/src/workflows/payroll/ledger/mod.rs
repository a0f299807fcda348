mod grouping;
mod reconcile;

pub use grouping::{
    group_by_reason, CategoryGroup, CategoryKey, ReasonGroups, UNSPECIFIED_CATEGORY,
};
pub use reconcile::{merge, parse_record_date, ReconciledRecord};
