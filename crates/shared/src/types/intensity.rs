use std::{fmt, ops::Deref, str::FromStr};

#[cfg(feature = "backend")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::error::ValidationError;

/// Weight used for an entry. Fixed point so repeated edits never drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Intensity(Decimal);

impl Intensity {
    pub const DECIMAL_PLACES: u32 = 2;
    pub const MAX_DIGITS: u32 = 6;

    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value.normalize().scale() > Self::DECIMAL_PLACES {
            return Err(ValidationError::new(format!(
                "Intensity {value} has more than {} decimal places",
                Self::DECIMAL_PLACES
            )));
        }

        let mut value = value;
        value.rescale(Self::DECIMAL_PLACES);

        let limit = Decimal::from(10i64.pow(Self::MAX_DIGITS - Self::DECIMAL_PLACES));
        if value.abs() >= limit {
            return Err(ValidationError::new(format!(
                "Intensity {value} has more than {} digits",
                Self::MAX_DIGITS
            )));
        }

        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::new(0, Self::DECIMAL_PLACES))
    }
}

impl Deref for Intensity {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<Decimal> for Intensity {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for Decimal {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

impl FromStr for Intensity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| ValidationError::new(format!("Intensity {s:?} is not a number: {e}")))?;
        Self::new(value)
    }
}

#[cfg(feature = "backend")]
impl ToSql for Intensity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(self.0.to_string().into()))
    }
}

#[cfg(feature = "backend")]
impl FromSql for Intensity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let decimal = match value {
            ValueRef::Integer(i) => Decimal::from(i),
            ValueRef::Real(f) => {
                Decimal::try_from(f).map_err(|e| FromSqlError::Other(Box::new(e)))?
            },
            _ => Decimal::from_str(value.as_str()?)
                .map_err(|e| FromSqlError::Other(Box::new(e)))?,
        };
        Intensity::new(decimal.round_dp(Self::DECIMAL_PLACES))
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(feature = "backend")]
impl From<Intensity> for sea_query::Value {
    fn from(value: Intensity) -> Self {
        value.0.to_string().into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rescales_to_two_places() {
        let intensity = Intensity::from_str("62.5").unwrap();
        assert_eq!(intensity.to_string(), "62.50");

        let intensity = Intensity::from_str("100").unwrap();
        assert_eq!(intensity.to_string(), "100.00");
    }

    #[test]
    fn test_rejects_extra_precision() {
        assert!(Intensity::from_str("1.005").is_err());
        // Trailing zeros don't count as precision
        assert!(Intensity::from_str("1.500").is_ok());
    }

    #[test]
    fn test_rejects_too_many_digits() {
        assert!(Intensity::from_str("9999.99").is_ok());
        assert!(Intensity::from_str("10000").is_err());
        assert!(Intensity::from_str("-10000").is_err());
    }

    #[test]
    fn test_serde_accepts_strings_and_numbers() {
        let from_str: Intensity = serde_json::from_str("\"42.25\"").unwrap();
        let from_num: Intensity = serde_json::from_str("42.25").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"42.25\"");
    }

    #[test]
    fn test_repeated_edits_do_not_drift() {
        let mut total = Intensity::zero();
        for _ in 0..1000 {
            let next = *total + Decimal::new(1, 2);
            total = Intensity::new(next).unwrap();
        }
        assert_eq!(total.to_string(), "10.00");
    }
}
