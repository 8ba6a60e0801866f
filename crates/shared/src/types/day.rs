use std::fmt;

#[cfg(feature = "backend")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::api::response_errors::DayError;

/// Weekday a workout is scheduled on. Numbered from Monday like
/// `chrono::Weekday::num_days_from_monday`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<i64> for Day {
    type Error = DayError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Day::ALL.get(i).copied())
            .ok_or(DayError::OutOfRange { value })
    }
}

impl From<chrono::Weekday> for Day {
    fn from(value: chrono::Weekday) -> Self {
        Day::ALL[value.num_days_from_monday() as usize]
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Day", 2)?;
        s.serialize_field("day", self.name())?;
        s.serialize_field("dayNum", &self.number())?;
        s.end()
    }
}

/// Day as sent by clients, either `3` or `"3"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayNumber {
    Number(i64),
    Text(String),
}

impl DayNumber {
    pub fn to_day(&self) -> Result<Day, DayError> {
        let value = match self {
            DayNumber::Number(n) => *n,
            DayNumber::Text(s) => s.trim().parse::<i64>().map_err(|_| DayError::NotANumber)?,
        };
        Day::try_from(value)
    }
}

#[cfg(feature = "backend")]
impl ToSql for Day {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.number() as i64))
    }
}

#[cfg(feature = "backend")]
impl FromSql for Day {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let n = value.as_i64()?;
        Day::try_from(n).map_err(|_| FromSqlError::OutOfRange(n))
    }
}

#[cfg(feature = "backend")]
impl From<Day> for sea_query::Value {
    fn from(value: Day) -> Self {
        (value.number() as i64).into()
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_day_numbers() {
        assert_eq!(Day::try_from(0i64), Ok(Day::Monday));
        assert_eq!(Day::try_from(6i64), Ok(Day::Sunday));
        assert_eq!(Day::try_from(7i64), Err(DayError::OutOfRange { value: 7 }));
        assert_eq!(Day::try_from(-1i64), Err(DayError::OutOfRange { value: -1 }));

        let saturday = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        assert_eq!(Day::from(chrono::Datelike::weekday(&saturday)), Day::Saturday);
    }

    #[test]
    fn test_day_number_payload() {
        let n: DayNumber = serde_json::from_str("2").unwrap();
        assert_eq!(n.to_day(), Ok(Day::Wednesday));

        let s: DayNumber = serde_json::from_str("\" 4 \"").unwrap();
        assert_eq!(s.to_day(), Ok(Day::Friday));

        let bad: DayNumber = serde_json::from_str("\"friday\"").unwrap();
        assert_eq!(bad.to_day(), Err(DayError::NotANumber));
    }

    #[test]
    fn test_serializes_name_and_number() {
        let json = serde_json::to_value(Day::Thursday).unwrap();
        assert_eq!(json, serde_json::json!({ "day": "Thursday", "dayNum": 3 }));
    }
}
