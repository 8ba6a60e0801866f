use std::sync::Arc;

use axum::{
    extract::{FromRef, Path},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{
            AddEntriesRequest, CalendarQuery, CalendarResponse, EditEntryRequest, EntriesResponse,
            ExerciseHistoryResponse, IdQuery, MessageResponse, RangeQuery,
        },
        response_errors::{CalendarError, EntryBatchError, RangeError},
        Object,
    },
    journal::{parse_date_arg, DateRange},
    model::{Entry, Exercise},
};
use tracing::{debug, instrument};

use super::{parse_id, today};
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
        .route(Object::Entries.path(), get(entries_in_range))
        .route(Object::EntriesCalendar.path(), get(calendar))
        .route(Object::EntriesAdd.path(), post(add_entries))
        .route(Object::Entry.path(), put(edit_entry).delete(delete_entry))
        .route(Object::ExerciseEntries.path(), get(exercise_history))
}

/// Entries in the requested window grouped by day, newest day first
#[instrument(skip(conn))]
pub async fn entries_in_range(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<RangeQuery>,
) -> Result<Json<EntriesResponse>, ServerError<RangeError>> {
    let range = DateRange::resolve(query.start_date.as_deref(), query.end_date.as_deref(), today())
        .map_err(RangeError::from)?;
    debug!(%range, "Fetching entries");

    let payload = conn
        .interact(move |conn| Entry::fetch_grouped(conn, &trainee.id, &range))
        .await??;

    Ok(Json(EntriesResponse { payload }))
}

#[instrument(skip(conn))]
pub async fn calendar(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ServerError<CalendarError>> {
    let year = query.year.as_deref().and_then(|v| v.trim().parse::<i32>().ok());
    let month = query.month.as_deref().and_then(|v| v.trim().parse::<u32>().ok());
    let range = year
        .zip(month)
        .and_then(|(year, month)| DateRange::month(year, month))
        .ok_or(CalendarError::InvalidYearMonth)?;

    let dates = conn
        .interact(move |conn| Entry::calendar_days(conn, &trainee.id, &range))
        .await??;

    Ok(Json(CalendarResponse { dates }))
}

#[instrument(skip(conn))]
pub async fn add_entries(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<AddEntriesRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError<EntryBatchError>> {
    let date = match request.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => parse_date_arg(date).map_err(EntryBatchError::from)?,
        None => today(),
    };

    let added = conn
        .interact(move |conn| Entry::create_batch(conn, &trainee.id, date, request.exercises))
        .await??;
    debug!(count = added.len(), %date, "Logged entries");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Entries added successfully")),
    ))
}

/// Only sets, reps and intensity can be changed
#[instrument(skip(conn))]
pub async fn edit_entry(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<EditEntryRequest>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Entry", Some(&request.id))?;

    conn.interact(move |conn| {
        let mut entry = Entry::fetch(conn, &trainee.id, &id)?;
        entry.update_performance(conn, &request.performance)?;
        Ok::<_, ServerError<_>>(())
    })
    .await??;

    Ok(Json(MessageResponse::new("Entry updated successfully")))
}

#[instrument(skip(conn))]
pub async fn delete_entry(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Entry", query.id.as_deref())?;

    conn.interact(move |conn| {
        Entry::fetch(conn, &trainee.id, &id)?.delete(conn)?;
        Ok::<_, ServerError<_>>(())
    })
    .await??;

    Ok(Json(MessageResponse::new("Entry deleted successfully")))
}

/// Everything logged against one exercise, newest first
#[instrument(skip(conn))]
pub async fn exercise_history(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Path(id): Path<String>,
) -> Result<Json<ExerciseHistoryResponse>, ServerError<Nothing>> {
    let id = parse_id("Exercise", Some(&id))?;

    let response = conn
        .interact(move |conn| {
            let exercise = Exercise::fetch(conn, &trainee.id, &id)?;
            let entries = Entry::history(conn, &exercise)?;
            Ok::<_, ServerError<_>>(ExerciseHistoryResponse {
                exercise: exercise.name,
                entries,
            })
        })
        .await??;

    Ok(Json(response))
}
