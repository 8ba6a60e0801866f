use std::sync::Arc;

use axum::{
    extract::{FromRef, Path},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{
            IdQuery, MessageResponse, NewWorkoutRequest, RenameWorkoutRequest, WorkoutDayRequest,
            WorkoutExercisesResponse,
        },
        response_errors::DayError,
        Object,
    },
    model::{Exercise, Program, Workout},
    not_found_error, other_error,
    types::Uuid,
};
use tracing::{debug, instrument};

use super::parse_id;
use crate::{
    cli::Cli,
    db::DatabaseConnection,
    extract::{Json, Query},
    TraineeState,
};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
    Arc<Cli>: FromRef<S>,
{
    Router::new()
        .route(
            Object::Workout.path(),
            post(create_workout).put(rename_workout).delete(delete_workout),
        )
        .route(Object::WorkoutDay.path(), post(add_day).delete(remove_day))
        .route(Object::WorkoutExercises.path(), get(workout_exercises))
}

/// New workout in one of the trainee's programs, scheduled on one day
#[instrument(skip(conn))]
pub async fn create_workout(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<NewWorkoutRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError<DayError>> {
    let day = request.day.to_day()?;
    let program_id = Uuid::parse(&request.program)
        .map_err(|_| not_found_error!("Given program ID does not exist!"))?;
    let name = request.name.trim().to_string();

    let workout = conn
        .interact(move |conn| {
            let program = Program::fetch_maybe(conn, &trainee.id, &program_id)?
                .ok_or_else(|| not_found_error!("Given program ID does not exist!"))?;
            let workout = Workout::new(trainee.id, program.id, name);
            Workout::create(conn, workout, day)
        })
        .await??;
    debug!(id = %workout.id, %day, "Created workout");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "Successfully added {} on {day}",
            workout.name
        ))),
    ))
}

#[instrument(skip(conn))]
pub async fn rename_workout(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<RenameWorkoutRequest>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Workout", Some(&request.id))?;

    conn.interact(move |conn| {
        let mut workout = Workout::fetch(conn, &trainee.id, &id)?;
        workout.rename(conn, request.name.trim().to_string())
    })
    .await??;

    Ok(Json(MessageResponse::new("Successfully updated workout name!")))
}

/// Exercises in the workout stay, only their link to it goes
#[instrument(skip(conn))]
pub async fn delete_workout(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Workout", query.id.as_deref())?;

    conn.interact(move |conn| {
        Workout::fetch(conn, &trainee.id, &id)?.delete(conn)?;
        Ok::<_, ServerError<_>>(())
    })
    .await??;

    Ok(Json(MessageResponse::new("Workout deleted successfully!")))
}

#[instrument(skip(conn))]
pub async fn add_day(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Path(id): Path<String>,
    Json(request): Json<WorkoutDayRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError<DayError>> {
    let id = parse_id("Workout", Some(&id))?;
    let day = request.day.to_day()?;

    let name = conn
        .interact(move |conn| {
            let workout = Workout::fetch(conn, &trainee.id, &id)?;
            workout.add_day(conn, day)?;
            Ok::<_, ServerError<_>>(workout.name)
        })
        .await??;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Successfully added {name} on {day}"))),
    ))
}

#[instrument(skip(conn))]
pub async fn remove_day(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Path(id): Path<String>,
    Json(request): Json<WorkoutDayRequest>,
) -> Result<Json<MessageResponse>, ServerError<DayError>> {
    let id = parse_id("Workout", Some(&id))?;
    let day = request.day.to_day()?;

    let name = conn
        .interact(move |conn| {
            let workout = Workout::fetch(conn, &trainee.id, &id)?;
            workout.remove_day(conn, day)?;
            Ok::<_, ServerError<_>>(workout.name)
        })
        .await??;

    Ok(Json(MessageResponse::new(format!("Successfully removed {name} on {day}"))))
}

#[instrument(skip(conn))]
pub async fn workout_exercises(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Path(id): Path<String>,
) -> Result<Json<WorkoutExercisesResponse>, ServerError<Nothing>> {
    let id = parse_id("Workout", Some(&id))?;

    let response = conn
        .interact(move |conn| {
            let workout = Workout::fetch(conn, &trainee.id, &id)?;
            let exercises = Exercise::fetch_for_workout(conn, &trainee.id, &workout.id)?;
            let workout = Workout::views(conn, vec![workout])?
                .into_iter()
                .next()
                .ok_or_else(|| other_error!("Workout {id} has no view"))?;

            Ok::<_, ServerError<Nothing>>(WorkoutExercisesResponse {
                workout,
                exercises: Exercise::details(conn, exercises)?,
            })
        })
        .await??;

    Ok(Json(response))
}
