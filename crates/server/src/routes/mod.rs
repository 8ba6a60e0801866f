use std::sync::Arc;

use axum::{extract::FromRef, Router};
use chrono::{Local, NaiveDate};
use deadpool_sqlite::Pool;
use shared::{api::error::ServerError, not_found_error, types::Uuid, validation_error};
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{cli::Cli, AppState};

mod body_part;
mod entries;
mod exercise;
mod ping;
mod program;
mod search;
mod workout;

/// Largest request body accepted. Batches of entries and exercises are the
/// biggest payloads
const BODY_MAX_BYTES: usize = 64 * 1024;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
    Arc<Cli>: FromRef<S>,
{
    Router::new()
        .merge(ping::router())
        .merge(entries::router())
        .merge(body_part::router())
        .merge(exercise::router())
        .merge(program::router())
        .merge(workout::router())
        .merge(search::router())
        .layer(RequestBodyLimitLayer::new(BODY_MAX_BYTES))
}

/// Every route with request tracing, bound to `state`
pub fn app(state: AppState) -> Router {
    router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Date used when a request doesn't say which day it's about
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Ids are required. One that can't be parsed can't name a record either
pub(crate) fn parse_id<T>(kind: &str, value: Option<&str>) -> Result<Uuid, ServerError<T>> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| validation_error!("{kind} id is required"))?;
    Uuid::parse(value).map_err(|_| not_found_error!("{kind} with given ID does not exist! ({value})"))
}
