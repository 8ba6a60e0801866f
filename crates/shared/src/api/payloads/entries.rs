use serde::{Deserialize, Serialize};

use crate::{
    journal::{BodyPartCount, EntryGroup},
    model::{BodyPart, EntryView, HistoryEntry, NewEntry, Performance},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntriesResponse {
    pub payload: Vec<EntryGroup<EntryView>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub dates: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddEntriesRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub exercises: Vec<NewEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEntryRequest {
    pub id: String,
    #[serde(flatten)]
    pub performance: Performance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistoryResponse {
    pub exercise: String,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPartsResponse {
    pub bodyparts: Vec<BodyPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyResponse {
    pub data: Vec<BodyPartCount>,
}
