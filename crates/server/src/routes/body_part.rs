use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{BodyPartsResponse, RangeQuery, TallyResponse},
        response_errors::RangeError,
        Object,
    },
    journal::DateRange,
    model::BodyPart,
};
use tracing::{debug, instrument};

use super::today;
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
        .route(Object::BodyParts.path(), get(body_parts))
        .route(Object::BodyPartTally.path(), get(tally))
}

/// The body part catalog in seed order
#[instrument(skip(conn))]
pub async fn body_parts(
    DatabaseConnection(conn): DatabaseConnection,
    _trainee: TraineeState,
) -> Result<Json<BodyPartsResponse>, ServerError<Nothing>> {
    let bodyparts = conn.interact(|conn| BodyPart::fetch_all(conn)).await??;
    Ok(Json(BodyPartsResponse { bodyparts }))
}

/// How many entries hit each body part in the window, most trained first
#[instrument(skip(conn))]
pub async fn tally(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<RangeQuery>,
) -> Result<Json<TallyResponse>, ServerError<RangeError>> {
    let range = DateRange::resolve(query.start_date.as_deref(), query.end_date.as_deref(), today())
        .map_err(RangeError::from)?;
    debug!(%range, "Tallying body parts");

    let data = conn
        .interact(move |conn| BodyPart::tally(conn, &trainee.id, &range))
        .await??;

    Ok(Json(TallyResponse { data }))
}
