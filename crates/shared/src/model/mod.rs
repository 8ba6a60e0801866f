use serde::{Deserialize, Serialize};

use crate::{api::error::ValidationError, types::Uuid};

#[cfg(feature = "backend")]
pub use exemplar::Model;

mod body_part;
pub use body_part::*;

mod entry;
pub use entry::*;

mod exercise;
pub use exercise::*;

mod program;
pub use program::*;

mod trainee;
pub use trainee::*;

mod workout;
pub use workout::*;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Id and display name of a related record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// Names are required and can't be only whitespace
pub(crate) fn validate_name(kind: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(format!("{kind} name cannot be empty!")));
    }
    Ok(())
}
