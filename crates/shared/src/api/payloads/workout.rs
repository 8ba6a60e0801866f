use serde::{Deserialize, Serialize};

use crate::{
    model::{ExerciseDetail, WorkoutView},
    types::DayNumber,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutRequest {
    pub program: String,
    pub name: String,
    pub day: DayNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameWorkoutRequest {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDayRequest {
    pub day: DayNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutExercisesResponse {
    pub workout: WorkoutView,
    pub exercises: Vec<ExerciseDetail>,
}
