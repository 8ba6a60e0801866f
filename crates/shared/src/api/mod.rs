use const_format::concatcp;
pub mod error;
pub mod payloads;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";

/// Header the authenticating proxy uses to pass on the trainee identity
pub const TRAINEE_HEADER: &str = "x-trainee-id";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    Program,
    ProgramAll,
    ProgramCurrent,
    ProgramWorkouts,
    Workout,
    WorkoutDay,
    WorkoutExercises,
    BodyParts,
    BodyPartTally,
    Exercise,
    ExerciseAdd,
    ExerciseFilter,
    ExerciseEntries,
    Entry,
    Entries,
    EntriesCalendar,
    EntriesAdd,
    Search,
    SearchExercises,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Ping => concatcp!(API_BASE_PATH, "ping"),
            Program => concatcp!(API_BASE_PATH, "program"),
            ProgramAll => concatcp!(API_BASE_PATH, "program/all"),
            ProgramCurrent => concatcp!(API_BASE_PATH, "program/current"),
            ProgramWorkouts => concatcp!(API_BASE_PATH, "program/:id/workouts"),
            Workout => concatcp!(API_BASE_PATH, "workout"),
            WorkoutDay => concatcp!(API_BASE_PATH, "workout/:id/day"),
            WorkoutExercises => concatcp!(API_BASE_PATH, "workout/:id/exercises"),
            BodyParts => concatcp!(API_BASE_PATH, "bodyparts"),
            BodyPartTally => concatcp!(API_BASE_PATH, "bodyparts/tally"),
            Exercise => concatcp!(API_BASE_PATH, "exercise"),
            ExerciseAdd => concatcp!(API_BASE_PATH, "exercise/add"),
            ExerciseFilter => concatcp!(API_BASE_PATH, "exercise/filter"),
            ExerciseEntries => concatcp!(API_BASE_PATH, "entry/all/:id"),
            Entry => concatcp!(API_BASE_PATH, "entry"),
            Entries => concatcp!(API_BASE_PATH, "entries"),
            EntriesCalendar => concatcp!(API_BASE_PATH, "entries/calendar"),
            EntriesAdd => concatcp!(API_BASE_PATH, "entries/add"),
            Search => concatcp!(API_BASE_PATH, "search"),
            SearchExercises => concatcp!(API_BASE_PATH, "search/exercises"),
        }
    }

    /// Path with the `:id` segment filled in
    pub fn with_id<T: std::fmt::Display>(&self, id: T) -> String {
        self.path().replace(":id", &id.to_string())
    }
}
