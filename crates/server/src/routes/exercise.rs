use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{
            AddExercisesRequest, ExerciseResponse, FilterQuery, FilterResponse, IdQuery,
            LinkExerciseRequest, MessageResponse,
        },
        response_errors::{ExerciseBatchError, FilterError},
        Object,
    },
    journal::{parse_page_num, ExerciseFilter, Paginator},
    model::{BodyPart, Exercise, Program, Workout},
    other_error,
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
            Object::Exercise.path(),
            get(fetch_exercise).put(link_exercise).delete(delete_exercise),
        )
        .route(Object::ExerciseAdd.path(), post(add_exercises))
        .route(Object::ExerciseFilter.path(), get(filter_exercises))
}

#[instrument(skip(conn))]
pub async fn fetch_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<IdQuery>,
) -> Result<Json<ExerciseResponse>, ServerError<Nothing>> {
    let id = parse_id("Exercise", query.id.as_deref())?;

    let exercise = conn
        .interact(move |conn| {
            let exercise = Exercise::fetch(conn, &trainee.id, &id)?;
            let detail = Exercise::details(conn, vec![exercise])?
                .into_iter()
                .next()
                .ok_or_else(|| other_error!("Exercise {id} has no details"))?;
            Ok::<_, ServerError<Nothing>>(detail)
        })
        .await??;

    Ok(Json(ExerciseResponse { exercise }))
}

/// Logged entries of the exercise are kept without it
#[instrument(skip(conn))]
pub async fn delete_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Exercise", query.id.as_deref())?;

    conn.interact(move |conn| {
        Exercise::fetch(conn, &trainee.id, &id)?.delete(conn)?;
        Ok::<_, ServerError<_>>(())
    })
    .await??;

    Ok(Json(MessageResponse::new("Exercise deleted successfully")))
}

#[instrument(skip(conn))]
pub async fn link_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<LinkExerciseRequest>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let exercise_id = parse_id("Exercise", Some(&request.exercise_id))?;
    let workout_id = parse_id("Workout", Some(&request.workout_id))?;

    conn.interact(move |conn| {
        let exercise = Exercise::fetch(conn, &trainee.id, &exercise_id)?;
        let workout = Workout::fetch(conn, &trainee.id, &workout_id)?;
        if request.edit_flag {
            exercise.link_workout(conn, &workout)
        } else {
            exercise.unlink_workout(conn, &workout)
        }
    })
    .await??;

    let message = if request.edit_flag {
        "Exercise added to workout"
    } else {
        "Exercise removed from workout"
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Create several exercises in a workout, all of them or none
#[instrument(skip(conn))]
pub async fn add_exercises(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<AddExercisesRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError<ExerciseBatchError>> {
    let unknown = || ExerciseBatchError::UnknownWorkout {
        id: request.workout_id.clone(),
    };
    let workout_id = Uuid::parse(&request.workout_id).map_err(|_| unknown())?;
    let unknown = unknown();

    let added = conn
        .interact(move |conn| {
            let workout = Workout::fetch_maybe(conn, &trainee.id, &workout_id)?.ok_or(unknown)?;
            Exercise::create_batch(conn, &trainee.id, &workout, request.exercises)
        })
        .await??;
    debug!(count = added.len(), "Created exercises");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Exercises added successfully")),
    ))
}

/// One page of the trainee's exercises, narrowed by every filter given
#[instrument(skip(conn))]
pub async fn filter_exercises(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<FilterQuery>,
) -> Result<Json<FilterResponse>, ServerError<FilterError>> {
    let filter = ExerciseFilter::parse(
        query.bodypart.as_deref(),
        query.workout.as_deref(),
        query.program.as_deref(),
    )?;

    let response = conn
        .interact(move |conn| {
            if let Some(id) = &filter.body_part {
                BodyPart::fetch_maybe(conn, id)?
                    .ok_or_else(|| FilterError::UnknownBodyPart { id: id.to_string() })?;
            }
            if let Some(id) = &filter.workout {
                Workout::fetch_maybe(conn, &trainee.id, id)?
                    .ok_or_else(|| FilterError::UnknownWorkout { id: id.to_string() })?;
            }
            if let Some(id) = &filter.program {
                Program::fetch_maybe(conn, &trainee.id, id)?
                    .ok_or_else(|| FilterError::UnknownProgram { id: id.to_string() })?;
            }

            // Unknown filters are reported before a bad page number
            let page_num = parse_page_num(query.page_num.as_deref())?;
            let total = Exercise::filter_count(conn, &trainee.id, &filter)?;
            let page = Paginator::new(total).page(page_num).map_err(FilterError::from)?;
            debug!(total, ?page, "Filtering exercises");

            let exercises = Exercise::filter_page(conn, &trainee.id, &filter, &page)?;
            Ok::<_, ServerError<FilterError>>(FilterResponse {
                exercises: Exercise::summaries(conn, exercises)?,
                has_next: page.has_next,
                has_previous: page.has_previous,
            })
        })
        .await??;

    Ok(Json(response))
}
