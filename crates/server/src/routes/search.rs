use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{
            ExerciseSearchResponse, SearchQuery, SearchResponse, COMBINED_SEARCH_LIMIT,
            EXERCISE_SEARCH_LIMIT,
        },
        Object,
    },
    model::{Exercise, Workout},
};
use tracing::instrument;

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
        .route(Object::SearchExercises.path(), get(search_exercises))
        .route(Object::Search.path(), get(search_all))
}

#[instrument(skip(conn))]
pub async fn search_exercises(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ExerciseSearchResponse>, ServerError<Nothing>> {
    let Some(text) = query.text().map(str::to_string) else {
        return Ok(Json(ExerciseSearchResponse { results: Vec::new() }));
    };

    let results = conn
        .interact(move |conn| {
            let exercises = Exercise::search(conn, &trainee.id, &text, EXERCISE_SEARCH_LIMIT)?;
            Exercise::details(conn, exercises)
        })
        .await??;

    Ok(Json(ExerciseSearchResponse { results }))
}

/// Workouts and exercises matching the query, a few of each
#[instrument(skip(conn))]
pub async fn search_all(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ServerError<Nothing>> {
    let Some(text) = query.text().map(str::to_string) else {
        return Ok(Json(SearchResponse {
            workouts: Vec::new(),
            exercises: Vec::new(),
        }));
    };

    let response = conn
        .interact(move |conn| {
            let workouts = Workout::search(conn, &trainee.id, &text, COMBINED_SEARCH_LIMIT)?;
            let exercises = Exercise::search(conn, &trainee.id, &text, COMBINED_SEARCH_LIMIT)?;
            Ok::<_, ServerError<Nothing>>(SearchResponse {
                workouts: Workout::views(conn, workouts)?,
                exercises: Exercise::details(conn, exercises)?,
            })
        })
        .await??;

    Ok(Json(response))
}
