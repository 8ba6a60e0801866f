use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use deadpool_sqlite::Pool;
use shared::{
    api::error::{Nothing, ServerError},
    model::{Trainee, TraineeId},
    unauthorized_error,
};
use tracing::trace;

use crate::cli::Cli;

/// Trainee making the request, as identified by the authenticating proxy
///
/// The first request from a trainee creates their record
#[derive(Debug, Clone)]
pub struct TraineeState {
    pub id: TraineeId,
}

impl TraineeState {
    fn from_header(parts: &Parts, header: &str) -> Result<TraineeId, ServerError<Nothing>> {
        let value = parts
            .headers
            .get(header)
            .ok_or_else(|| unauthorized_error!("Missing trainee identity"))?;
        let value = value
            .to_str()
            .map_err(|_| unauthorized_error!("Trainee identity isn't valid text"))?;
        TraineeId::new(value).map_err(|e| unauthorized_error!("Invalid trainee identity: {e}"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TraineeState
where
    S: Send + Sync,
    Pool: FromRef<S>,
    Arc<Cli>: FromRef<S>,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let args = <Arc<Cli>>::from_ref(state);
        let id = Self::from_header(parts, &args.trainee_header)?;
        trace!(trainee = %id, "Identified trainee");

        let conn = Pool::from_ref(state).get().await?;
        let id = conn
            .interact(move |conn| {
                Trainee::ensure::<Nothing>(conn, &id)?;
                Ok::<_, ServerError<Nothing>>(id)
            })
            .await??;

        Ok(Self { id })
    }
}
