use serde::{Deserialize, Serialize};

use crate::types::Uuid;

/// Number of entries logged against one body part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPartCount {
    pub id: Uuid,
    pub name: String,
    pub count: u64,
}

/// Order counts from busiest to quietest. Ties keep catalog order
pub fn rank(mut counts: Vec<BodyPartCount>) -> Vec<BodyPartCount> {
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
