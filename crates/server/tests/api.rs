//! Routes driven through the router over a database on disk

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::{json, Value};
use shared::api::Object;

/// Create a program with one workout and return their ids
async fn program_with_workout(app: &TestApp, program: &str, workout: &str) -> (String, String) {
    let (status, body) = app
        .post(Object::Program.path(), json!({ "name": program, "description": null }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let program_id = body["programId"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            Object::Workout.path(),
            json!({ "program": program_id, "name": workout, "day": "0" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get(&Object::ProgramWorkouts.with_id(&program_id)).await;
    let workout_id = body["workouts"][0]["id"].as_str().unwrap().to_string();
    (program_id, workout_id)
}

async fn body_part_id(app: &TestApp, name: &str) -> String {
    let (_, body) = app.get(Object::BodyParts.path()).await;
    body["bodyparts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["name"] == name)
        .and_then(|b| b["id"].as_str())
        .unwrap()
        .to_string()
}

/// Add exercises to a workout and return their ids by name
async fn add_exercises(app: &TestApp, workout_id: &str, exercises: Value) -> Vec<(String, String)> {
    let (status, body) = app
        .post(
            Object::ExerciseAdd.path(),
            json!({ "workoutId": workout_id, "exercises": exercises }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (_, body) = app.get(&Object::WorkoutExercises.with_id(workout_id)).await;
    body["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["name"].as_str().unwrap().to_string(), e["id"].as_str().unwrap().to_string()))
        .collect()
}

#[tokio::test]
async fn test_ping_needs_no_trainee() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, Object::Ping.path(), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_trainee_header_required() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, Object::Entries.path(), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app
        .request(Method::GET, Object::Entries.path(), Some("   "), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_log_and_list_entries() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Lower").await;
    let legs = body_part_id(&app, "Legs").await;
    let exercises = add_exercises(&app, &workout_id, json!([{ "name": "Squat", "bodyparts": [legs] }])).await;
    let squat = &exercises[0].1;

    for (day, sets) in [("2024-01-01", 5), ("2024-01-01", 3), ("2023-12-31", 4)] {
        let (status, body) = app
            .post(
                Object::EntriesAdd.path(),
                json!({ "date": day, "exercises": [{ "id": squat, "sets": sets, "reps": 5, "intensity": "100" }] }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (status, body) = app
        .get(&format!("{}?startDate=2023-12-25&endDate=2024-01-07", Object::Entries.path()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let groups = body["payload"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["date"], "2024-01-01");
    assert_eq!(groups[0]["entries"][0]["sets"], 5);
    assert_eq!(groups[0]["entries"][1]["sets"], 3);
    assert_eq!(groups[0]["entries"][0]["exercise"]["name"], "Squat");
    assert_eq!(groups[0]["entries"][0]["intensity"], "100.00");
    assert_eq!(groups[1]["date"], "2023-12-31");

    let (status, body) = app
        .get(&format!("{}?startDate=2024-02-30", Object::Entries.path()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2024-02-30"));

    let (status, body) = app
        .get(&format!("{}?year=2024&month=1", Object::EntriesCalendar.path()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"], json!([1]));

    let (status, _) = app
        .get(&format!("{}?year=2024&month=13", Object::EntriesCalendar.path()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(&format!("{}?year=10000&month=1", Object::EntriesCalendar.path()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(&format!("{}?startDate=2024-01-01&endDate=10000-01-01", Object::Entries.path()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get(&Object::ExerciseEntries.with_id(squat)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exercise"], "Squat");
    assert_eq!(body["entries"].as_array().unwrap().len(), 3);
    assert_eq!(body["entries"][2]["date"], "2023-12-31");
}

#[tokio::test]
async fn test_entry_batch_rejects_unknown_exercise() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Lower").await;
    let exercises = add_exercises(&app, &workout_id, json!([{ "name": "Squat" }])).await;
    let squat = &exercises[0].1;
    let missing = "4b0e1b6c-5f1c-4d8e-9a57-3f8c2f0d9e11";

    let (status, body) = app
        .post(
            Object::EntriesAdd.path(),
            json!({ "date": "2024-06-03", "exercises": [
                { "id": squat, "sets": 3, "reps": 5, "intensity": 50 },
                { "id": missing, "sets": 3, "reps": 5, "intensity": 50 },
            ] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(missing));

    let (_, body) = app
        .get(&format!("{}?startDate=2024-06-03&endDate=2024-06-03", Object::Entries.path()))
        .await;
    assert_eq!(body["payload"], json!([]));
}

#[tokio::test]
async fn test_edit_and_delete_entry() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Lower").await;
    let exercises = add_exercises(&app, &workout_id, json!([{ "name": "Squat" }])).await;
    let squat = &exercises[0].1;
    app.post(
        Object::EntriesAdd.path(),
        json!({ "date": "2024-06-03", "exercises": [{ "id": squat, "sets": 3, "reps": 5, "intensity": "50" }] }),
    )
    .await;
    let entries_uri = format!("{}?startDate=2024-06-03&endDate=2024-06-03", Object::Entries.path());
    let (_, body) = app.get(&entries_uri).await;
    let entry_id = body["payload"][0]["entries"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(
            Object::Entry.path(),
            json!({ "id": entry_id, "sets": 4, "reps": 6, "intensity": "52.5" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&entries_uri).await;
    assert_eq!(body["payload"][0]["entries"][0]["sets"], 4);
    assert_eq!(body["payload"][0]["entries"][0]["intensity"], "52.50");

    let (status, _) = app
        .put(
            Object::Entry.path(),
            json!({ "id": entry_id, "sets": 0, "reps": 6, "intensity": "52.5" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            Object::Entry.path(),
            json!({ "id": entry_id, "sets": 1, "reps": 1, "intensity": "1.234" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete(&format!("{}?id={entry_id}", Object::Entry.path())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("{}?id={entry_id}", Object::Entry.path())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_and_pages() {
    let app = TestApp::new();
    let (program_id, w1) = program_with_workout(&app, "Strength", "W1").await;
    let legs = body_part_id(&app, "Legs").await;
    let arms = body_part_id(&app, "Arms").await;
    let exercises = add_exercises(
        &app,
        &w1,
        json!([
            { "name": "Squat", "bodyparts": [legs] },
            { "name": "Curl", "bodyparts": [arms] },
        ]),
    )
    .await;
    let squat = exercises.iter().find(|(name, _)| name == "Squat").unwrap().1.clone();

    let uri = format!(
        "{}?bodypart={legs}&workout={w1}&pageNum=1",
        Object::ExerciseFilter.path()
    );
    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exercises"].as_array().unwrap().len(), 1);
    assert_eq!(body["exercises"][0]["id"], squat.as_str());
    assert_eq!(body["exercises"][0]["programs"][0]["id"], program_id.as_str());
    assert_eq!(body["hasNext"], false);
    assert_eq!(body["hasPrevious"], false);

    let uri = format!("{}?program={program_id}&pageNum=2", Object::ExerciseFilter.path());
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("{}?pageNum=one", Object::ExerciseFilter.path());
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("{}?workout=nope&pageNum=1", Object::ExerciseFilter.path());
    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Workout"));
}

#[tokio::test]
async fn test_filter_ids_must_exist() {
    let app = TestApp::new();
    let missing = "4b0e1b6c-5f1c-4d8e-9a57-3f8c2f0d9e11";

    for (param, kind) in [("bodypart", "Body part"), ("workout", "Workout"), ("program", "Program")] {
        let uri = format!("{}?{param}={missing}&pageNum=1", Object::ExerciseFilter.path());
        let (status, body) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{param}");
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with(kind), "{error}");
        assert!(error.contains(missing), "{error}");
    }

    // Unknown filters win over a bad page number
    let uri = format!("{}?workout={missing}&pageNum=x", Object::ExerciseFilter.path());
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_by_another_trainees_program() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            Object::Program.path(),
            Some(OTHER_TRAINEE),
            Some(json!({ "name": "Theirs" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let theirs = body["programId"].as_str().unwrap().to_string();

    let uri = format!("{}?program={theirs}&pageNum=1", Object::ExerciseFilter.path());
    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Program"));

    let (status, body) = app
        .request(Method::GET, &uri, Some(OTHER_TRAINEE), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exercises"], json!([]));
}

#[tokio::test]
async fn test_tally_lists_every_body_part() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Lower").await;
    let legs = body_part_id(&app, "Legs").await;
    let exercises = add_exercises(&app, &workout_id, json!([{ "name": "Squat", "bodyparts": [legs] }])).await;
    app.post(
        Object::EntriesAdd.path(),
        json!({ "date": "2024-06-04", "exercises": [{ "id": exercises[0].1, "sets": 3, "reps": 5, "intensity": "50" }] }),
    )
    .await;

    let (_, catalog) = app.get(Object::BodyParts.path()).await;
    let (status, body) = app
        .get(&format!("{}?startDate=2024-06-03&endDate=2024-06-09", Object::BodyPartTally.path()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), catalog["bodyparts"].as_array().unwrap().len());
    assert_eq!(data[0]["name"], "Legs");
    assert_eq!(data[0]["count"], 1);
    assert!(data[1..].iter().all(|row| row["count"] == 0));
}

#[tokio::test]
async fn test_program_lifecycle() {
    let app = TestApp::new();
    let (status, _) = app.post(Object::Program.path(), json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (program_id, workout_id) = program_with_workout(&app, "Strength", "Lower").await;

    let (status, _) = app.get(&Object::ProgramWorkouts.with_id("current")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(Object::ProgramCurrent.path(), json!({ "id": program_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&Object::ProgramWorkouts.with_id("current")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["program"]["isCurrent"], true);
    assert_eq!(body["workouts"][0]["days"], json!([{ "day": "Monday", "dayNum": 0 }]));

    let (status, _) = app
        .put(
            Object::Program.path(),
            json!({ "id": program_id, "name": "Hypertrophy", "description": "12 weeks" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(Object::ProgramAll.path()).await;
    assert_eq!(body["programs"][0]["name"], "Hypertrophy");
    assert_eq!(body["programs"][0]["description"], "12 weeks");

    // Another trainee can't see it
    let (status, _) = app
        .request(
            Method::GET,
            &format!("{}?id={program_id}", Object::Program.path()),
            Some(OTHER_TRAINEE),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("{}?id={program_id}", Object::Program.path())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&Object::WorkoutExercises.with_id(&workout_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&Object::ProgramWorkouts.with_id("current")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workout_days_and_links() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Lower").await;
    let (_, other_workout) = program_with_workout(&app, "Cardio", "Run").await;
    let exercises = add_exercises(&app, &workout_id, json!([{ "name": "Squat" }])).await;
    let squat = &exercises[0].1;

    let (status, _) = app
        .post(&Object::WorkoutDay.with_id(&workout_id), json!({ "day": 3 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post(&Object::WorkoutDay.with_id(&workout_id), json!({ "day": 7 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .post(&Object::WorkoutDay.with_id(&workout_id), json!({ "day": "Tuesday" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get(&Object::WorkoutExercises.with_id(&workout_id)).await;
    assert_eq!(body["workout"]["days"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .put(
            Object::Exercise.path(),
            json!({ "exerciseId": squat, "workoutId": other_workout, "editFlag": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&Object::WorkoutExercises.with_id(&other_workout)).await;
    assert_eq!(body["exercises"][0]["name"], "Squat");

    let (status, _) = app
        .put(
            Object::Exercise.path(),
            json!({ "exerciseId": squat, "workoutId": other_workout, "editFlag": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&Object::WorkoutExercises.with_id(&other_workout)).await;
    assert_eq!(body["exercises"], json!([]));

    let (status, _) = app
        .put(Object::Workout.path(), json!({ "id": workout_id, "name": "Legs" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("{}?id={workout_id}", Object::Workout.path())).await;
    assert_eq!(status, StatusCode::OK);

    // The exercise stays after its workout is gone
    let (status, body) = app.get(&format!("{}?id={squat}", Object::Exercise.path())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exercise"]["name"], "Squat");
}

#[tokio::test]
async fn test_deleted_exercise_keeps_entries() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Lower").await;
    let exercises = add_exercises(&app, &workout_id, json!([{ "name": "Squat" }])).await;
    let squat = &exercises[0].1;
    app.post(
        Object::EntriesAdd.path(),
        json!({ "date": "2024-06-03", "exercises": [{ "id": squat, "sets": 3, "reps": 5, "intensity": "50" }] }),
    )
    .await;

    let (status, _) = app.delete(&format!("{}?id={squat}", Object::Exercise.path())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("{}?startDate=2024-06-03&endDate=2024-06-03", Object::Entries.path()))
        .await;
    assert_eq!(body["payload"][0]["entries"][0]["exercise"], Value::Null);
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new();
    let (_, workout_id) = program_with_workout(&app, "Strength", "Squat day").await;
    add_exercises(
        &app,
        &workout_id,
        json!([{ "name": "Back Squat" }, { "name": "Front Squat" }, { "name": "Row" }]),
    )
    .await;

    let (status, body) = app
        .get(&format!("{}?q=squat", Object::SearchExercises.path()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let (_, body) = app.get(&format!("{}?q=%20", Object::SearchExercises.path())).await;
    assert_eq!(body["results"], json!([]));

    let (status, body) = app.get(&format!("{}?q=SQUAT", Object::Search.path())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workouts"][0]["name"], "Squat day");
    assert_eq!(body["exercises"].as_array().unwrap().len(), 2);
}
