use serde::{Deserialize, Serialize};

use crate::model::{ExerciseDetail, WorkoutView};

pub const EXERCISE_SEARCH_LIMIT: u64 = 7;
pub const COMBINED_SEARCH_LIMIT: u64 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// Trimmed search text, `None` when there's nothing to search for
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSearchResponse {
    pub results: Vec<ExerciseDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub workouts: Vec<WorkoutView>,
    pub exercises: Vec<ExerciseDetail>,
}
