use serde::{Deserialize, Serialize};

use crate::{api::response_errors::FilterError, types::Uuid};

/// Categorical filters over a trainee's exercises. Every filter that is set
/// has to match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseFilter {
    pub body_part: Option<Uuid>,
    pub workout: Option<Uuid>,
    pub program: Option<Uuid>,
}

impl ExerciseFilter {
    /// Parse raw query values. Empty values are ignored, values that can't be
    /// an id can't match anything either
    pub fn parse(
        body_part: Option<&str>,
        workout: Option<&str>,
        program: Option<&str>,
    ) -> Result<Self, FilterError> {
        let body_part = Uuid::parse_param(body_part)
            .transpose()
            .map_err(|_| FilterError::UnknownBodyPart {
                id: body_part.unwrap_or_default().to_string(),
            })?;
        let workout = Uuid::parse_param(workout)
            .transpose()
            .map_err(|_| FilterError::UnknownWorkout {
                id: workout.unwrap_or_default().to_string(),
            })?;
        let program = Uuid::parse_param(program)
            .transpose()
            .map_err(|_| FilterError::UnknownProgram {
                id: program.unwrap_or_default().to_string(),
            })?;

        Ok(Self {
            body_part,
            workout,
            program,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.body_part.is_none() && self.workout.is_none() && self.program.is_none()
    }
}

/// Page numbers are required and must be integers
pub fn parse_page_num(value: Option<&str>) -> Result<i64, FilterError> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| FilterError::PageNotInteger {
            value: value.map(str::to_string),
        })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_values_are_ignored() {
        let filter = ExerciseFilter::parse(Some(""), None, Some("  ")).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_ids_are_parsed() {
        let id = Uuid::new_v4();
        let filter = ExerciseFilter::parse(None, Some(&id.to_string()), None).unwrap();
        assert_eq!(filter.workout, Some(id));
        assert_eq!(filter.body_part, None);
    }

    #[test]
    fn test_malformed_ids_name_the_filter() {
        assert_eq!(
            ExerciseFilter::parse(Some("legs"), None, None),
            Err(FilterError::UnknownBodyPart { id: "legs".into() })
        );
        assert_eq!(
            ExerciseFilter::parse(None, None, Some("42")),
            Err(FilterError::UnknownProgram { id: "42".into() })
        );
    }

    #[test]
    fn test_page_num() {
        assert_eq!(parse_page_num(Some("3")), Ok(3));
        assert_eq!(parse_page_num(Some(" 2 ")), Ok(2));
        assert_eq!(parse_page_num(Some("-1")), Ok(-1));
        assert_eq!(parse_page_num(None), Err(FilterError::PageNotInteger { value: None }));
        assert_eq!(
            parse_page_num(Some("two")),
            Err(FilterError::PageNotInteger {
                value: Some("two".into())
            })
        );
    }
}
