use serde::{Deserialize, Serialize};

mod entries;
pub use entries::*;

mod exercise;
pub use exercise::*;

mod program;
pub use program::*;

mod search;
pub use search::*;

mod workout;
pub use workout::*;

/// Body of successful writes that don't return a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `?id=` query parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Optional `?startDate=&endDate=` bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
