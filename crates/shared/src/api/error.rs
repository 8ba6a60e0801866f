use std::{error::Error, fmt};

use http::StatusCode;
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub use backend::*;

#[cfg(feature = "backend")]
mod backend {
    use std::fmt;

    use axum::{
        extract::rejection::{JsonRejection, QueryRejection},
        response::{IntoResponse, Response},
        Json,
    };
    use serde::Serialize;
    use tracing::{debug, error};

    use super::{ServerError, ValidationError};

    #[derive(Debug, Serialize)]
    struct ErrorBody {
        error: String,
    }

    impl<T: fmt::Display> IntoResponse for ServerError<T> {
        fn into_response(self) -> Response {
            let code = self.code();
            let message = self.to_string();
            if code.is_server_error() {
                error!(%code, %message, "Request failed");
            } else {
                debug!(%code, %message, "Request rejected");
            }
            (code, Json(ErrorBody { error: message })).into_response()
        }
    }

    impl<T> From<rusqlite::Error> for ServerError<T> {
        fn from(err: rusqlite::Error) -> Self {
            match err {
                // Every lookup is scoped by trainee so a missing row is either
                // absent or owned by someone else. Both surface the same way
                rusqlite::Error::QueryReturnedNoRows => Self::NotFound {
                    message: "Requested record does not exist".to_string(),
                },
                other => Self::Other {
                    message: format!("Database error: {other}"),
                },
            }
        }
    }

    impl<T> From<sea_query::error::Error> for ServerError<T> {
        fn from(err: sea_query::error::Error) -> Self {
            Self::Other {
                message: format!("Query build error: {err}"),
            }
        }
    }

    impl<T> From<deadpool_sqlite::InteractError> for ServerError<T> {
        fn from(err: deadpool_sqlite::InteractError) -> Self {
            Self::Other {
                message: format!("Database interact error: {err}"),
            }
        }
    }

    impl<T> From<JsonRejection> for ServerError<T> {
        fn from(rejection: JsonRejection) -> Self {
            Self::Validation {
                inner: ValidationError::new(format!("Invalid request body: {}", rejection.body_text())),
            }
        }
    }

    impl<T> From<QueryRejection> for ServerError<T> {
        fn from(rejection: QueryRejection) -> Self {
            Self::Validation {
                inner: ValidationError::new(format!("Invalid query string: {}", rejection.body_text())),
            }
        }
    }

    impl<T> From<deadpool_sqlite::PoolError> for ServerError<T> {
        fn from(err: deadpool_sqlite::PoolError) -> Self {
            Self::Other {
                message: format!("Database pool error: {err}"),
            }
        }
    }
}

/// Placeholder inner error for routes that have no failure modes of their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nothing {}

impl fmt::Display for Nothing {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Error for Nothing {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            error_messages: vec![message.into()],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_messages.join("; "))
    }
}

impl Error for ValidationError {}

/// Error returned by every route. `T` is the route specific error, the other
/// variants are shared by all routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerError<T> {
    Inner {
        #[serde(with = "http_serde::status_code")]
        code: StatusCode,
        inner: T,
    },
    Validation {
        inner: ValidationError,
    },
    NotFound {
        message: String,
    },
    Unauthorized {
        message: String,
    },
    Other {
        message: String,
    },
    WithContext {
        context: String,
        inner: Box<Self>,
    },
}

impl<T> ServerError<T> {
    pub fn code(&self) -> StatusCode {
        match self {
            Self::Inner { code, .. } => *code,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::WithContext { inner, .. } => inner.code(),
        }
    }

    /// The route specific error, if that's what this is
    pub fn inner(&self) -> Option<&T> {
        match self {
            Self::Inner { inner, .. } => Some(inner),
            Self::WithContext { inner, .. } => inner.inner(),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServerError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner { inner, .. } => write!(f, "{inner}"),
            Self::Validation { inner } => write!(f, "{inner}"),
            Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Other { message } => write!(f, "{message}"),
            Self::WithContext { context, inner } => write!(f, "{context}: {inner}"),
        }
    }
}

impl<T: fmt::Debug + fmt::Display> Error for ServerError<T> {}

impl<T> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

impl<T> ServerError<T> {
    /// Add helpful context to the error
    pub fn context<S: Into<String>>(self, context: S) -> Self {
        Self::WithContext {
            context: context.into(),
            inner: Box::new(self),
        }
    }
}

pub trait ResultContext<T, I> {
    /// Add helpful context to errors
    ///
    /// `context` is provided as a closure to avoid potential formatting cost if
    /// the result isn't an error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F) -> Result<T, ServerError<I>>;
    /// Add helpful context to errors
    fn context<S: Into<String>>(self, context: S) -> Result<T, ServerError<I>>;
}

impl<T, I, E: Into<ServerError<I>>> ResultContext<T, I> for Result<T, E> {
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F) -> Result<T, ServerError<I>> {
        self.map_err(|e| e.into().context(context()))
    }
    fn context<S: Into<String>>(self, context: S) -> Result<T, ServerError<I>> {
        self.map_err(|e| e.into().context(context))
    }
}

#[macro_export]
macro_rules! not_found_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::NotFound { message: format!($($arg)*) }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Validation {
            inner: $crate::api::error::ValidationError::new(format!($($arg)*)),
        }
    };
}

#[macro_export]
macro_rules! unauthorized_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Unauthorized { message: format!($($arg)*) }
    };
}

#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Other { message: format!($($arg)*) }
    };
}
