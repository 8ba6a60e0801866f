#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use clap::Parser;
use rusqlite::Connection;
use serde_json::Value;
use server::{cli::Cli, db, routes, AppState};
use shared::{
    api::{error::Nothing, TRAINEE_HEADER},
    model::{
        BodyPart, Entry, Exercise, ExerciseBodyPart, ExerciseWorkout, Model, Program, Trainee, TraineeId,
        Workout,
    },
    types::{Day, Intensity, Uuid},
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TRAINEE: &str = "sam";
pub const OTHER_TRAINEE: &str = "alex";

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn trainee_id(name: &str) -> TraineeId {
    TraineeId::new(name).unwrap()
}

/// In memory database with every migration applied and `TRAINEE` created
pub fn migrated_connection() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::run_pragmas(&conn).unwrap();
    db::migrate_connection(&mut conn).unwrap();
    Trainee::ensure::<Nothing>(&conn, &trainee_id(TRAINEE)).unwrap();
    Trainee::ensure::<Nothing>(&conn, &trainee_id(OTHER_TRAINEE)).unwrap();
    conn
}

pub fn body_part(conn: &Connection, name: &str) -> BodyPart {
    BodyPart::fetch_all::<Nothing>(conn)
        .unwrap()
        .into_iter()
        .find(|b| b.name == name)
        .unwrap_or_else(|| panic!("No body part named {name}"))
}

pub fn program(conn: &mut Connection, trainee: &str, name: &str) -> Program {
    Program::create::<Nothing>(conn, Program::new(trainee_id(trainee), name.to_string(), None)).unwrap()
}

pub fn workout(conn: &mut Connection, program: &Program, name: &str, day: Day) -> Workout {
    let workout = Workout::new(program.trainee_id.clone(), program.id, name.to_string());
    Workout::create::<Nothing>(conn, workout, day).unwrap()
}

/// Exercise tagged with `body_parts` and included in `workouts`
pub fn exercise(
    conn: &Connection,
    trainee: &str,
    name: &str,
    body_parts: &[&BodyPart],
    workouts: &[&Workout],
) -> Exercise {
    let exercise = Exercise::new(trainee_id(trainee), name.to_string(), None);
    exercise.insert(conn).unwrap();
    for body_part in body_parts {
        ExerciseBodyPart {
            exercise_id: exercise.id,
            body_part_id: body_part.id,
        }
        .insert(conn)
        .unwrap();
    }
    for workout in workouts {
        ExerciseWorkout {
            exercise_id: exercise.id,
            workout_id: workout.id,
        }
        .insert(conn)
        .unwrap();
    }
    exercise
}

pub fn entry(conn: &Connection, exercise: &Exercise, timestamp: &str) -> Entry {
    let entry = Entry {
        id: Uuid::new_v4(),
        trainee_id: exercise.trainee_id.clone(),
        exercise_id: Some(exercise.id),
        sets: 3,
        reps: 5,
        intensity: Intensity::from_str("60").unwrap(),
        timestamp: date(timestamp),
    };
    entry.insert(conn).unwrap();
    entry
}

/// Router over a migrated database in a temporary directory
pub struct TestApp {
    // Held so the database outlives the test
    _dir: TempDir,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.sqlite");
        let path = path.to_str().unwrap();

        db::run_migrations(path).unwrap();
        let pool = db::create_pool(path).unwrap();
        let args = Cli::parse_from(["server", "--sqlite-connection-string", path]);

        Self {
            _dir: dir,
            router: routes::app(AppState::new(pool, args)),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        trainee: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(trainee) = trainee {
            builder = builder.header(TRAINEE_HEADER, trainee);
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(TRAINEE), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(TRAINEE), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(TRAINEE), Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(TRAINEE), None).await
    }
}
