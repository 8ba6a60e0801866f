use serde::{Deserialize, Serialize};

use crate::{
    model::{ProgramView, WorkoutView},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgramRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgramResponse {
    pub message: String,
    pub program_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditProgramRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetCurrentProgramRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramResponse {
    pub program: ProgramView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramsResponse {
    pub programs: Vec<ProgramView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramWorkoutsResponse {
    pub program: ProgramView,
    pub workouts: Vec<WorkoutView>,
}
