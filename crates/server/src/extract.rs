//! `Json` and `Query` that reject with the same JSON error body as the routes

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::api::error::{Nothing, ServerError};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError<Nothing>))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError<Nothing>))]
pub struct Query<T>(pub T);
