use serde::{Deserialize, Serialize};

use crate::model::{ExerciseDetail, ExerciseSummary, NewExercise};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub bodypart: Option<String>,
    pub workout: Option<String>,
    pub program: Option<String>,
    pub page_num: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub exercises: Vec<ExerciseSummary>,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub exercise: ExerciseDetail,
}

/// Add an exercise to a workout, or take it out when `edit_flag` is false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkExerciseRequest {
    pub exercise_id: String,
    pub workout_id: String,
    pub edit_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExercisesRequest {
    pub workout_id: String,
    #[serde(default)]
    pub exercises: Vec<NewExercise>,
}
