use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    api::error::ServerError,
    journal::{InvalidDate, InvalidPage},
};

macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            #[error($($message:tt)*)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
        pub enum $name {
            $(
                #[error($($message)*)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        impl $name {
            pub fn code(&self) -> StatusCode {
                match self {
                    $( $name::$variant { .. } => $variant_code, )*
                }
            }
        }

        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                Self::Inner { code: inner.code(), inner }
            }
        }
    };
}

response_error!(RangeError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Invalid arguments to start or end date ({value})")]
    InvalidDate { value: String },
});

impl From<InvalidDate> for RangeError {
    fn from(err: InvalidDate) -> Self {
        Self::InvalidDate { value: err.value }
    }
}

response_error!(CalendarError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Invalid year/month value")]
    InvalidYearMonth,
});

response_error!(FilterError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("Body part with given ID does not exist! ({id})")]
    UnknownBodyPart { id: String },
    #[code(StatusCode::NOT_FOUND)]
    #[error("Workout with given ID does not exist! ({id})")]
    UnknownWorkout { id: String },
    #[code(StatusCode::NOT_FOUND)]
    #[error("Program with given ID does not exist! ({id})")]
    UnknownProgram { id: String },
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Page number must be an integer!")]
    PageNotInteger { value: Option<String> },
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Requested page number is either empty or invalid ({number} of {num_pages})")]
    InvalidPage { number: i64, num_pages: usize },
});

impl From<InvalidPage> for FilterError {
    fn from(err: InvalidPage) -> Self {
        Self::InvalidPage {
            number: err.number,
            num_pages: err.num_pages,
        }
    }
}

response_error!(EntryBatchError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Given date is invalid! ({value})")]
    InvalidDate { value: String },
    #[code(StatusCode::NOT_FOUND)]
    #[error("Exercise with id {id} does not exist")]
    UnknownExercise { id: String },
});

impl From<InvalidDate> for EntryBatchError {
    fn from(err: InvalidDate) -> Self {
        Self::InvalidDate { value: err.value }
    }
}

response_error!(ExerciseBatchError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("Workout with given ID does not exist! ({id})")]
    UnknownWorkout { id: String },
    #[code(StatusCode::NOT_FOUND)]
    #[error("Could not add {name}. Bodypart does not exist! ({id})")]
    UnknownBodyPart { name: String, id: String },
});

response_error!(DayError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Received day field is not a number")]
    NotANumber,
    #[code(StatusCode::BAD_REQUEST)]
    #[error("Given day is outside the 0-6 range")]
    OutOfRange { value: i64 },
});

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_variant_codes() {
        assert_eq!(
            FilterError::UnknownWorkout { id: "w".into() }.code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FilterError::InvalidPage { number: 4, num_pages: 3 }.code(),
            StatusCode::BAD_REQUEST
        );

        let err: ServerError<FilterError> = FilterError::UnknownProgram { id: "p".into() }.into();
        assert_eq!(err.code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Program with given ID does not exist! (p)");
    }
}
