use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::{
        api::{error::ServerError, response_errors::EntryBatchError},
        journal::{group_by_date, DateRange, EntryGroup},
        model::{Exercise, ExerciseIden},
    },
    chrono::Datelike as _,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension, Row},
    sea_query::{enum_def, Alias, Expr, Order, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use crate::{
    api::error::ValidationError,
    journal::Dated,
    model::{NamedRef, TraineeId},
    types::{Intensity, Uuid},
};

/// Largest value a set or rep count can hold
pub const MAX_COUNT: i64 = i16::MAX as i64;

/// One logged performance of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("entry"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Entry {
    pub id: Uuid,
    pub trainee_id: TraineeId,
    pub exercise_id: Option<Uuid>,
    pub sets: u16,
    pub reps: u16,
    pub intensity: Intensity,
    pub timestamp: NaiveDate,
}

/// Entry as listed under its day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub id: Uuid,
    #[serde(skip)]
    pub date: NaiveDate,
    pub exercise: Option<NamedRef>,
    pub sets: u16,
    pub reps: u16,
    pub intensity: Intensity,
}

impl Dated for EntryView {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Entry in an exercise's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub sets: u16,
    pub reps: u16,
    pub intensity: Intensity,
    pub date: NaiveDate,
}

/// Sets, reps and intensity of a performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub sets: i64,
    pub reps: i64,
    pub intensity: Intensity,
}

/// Validated set and rep counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub sets: u16,
    pub reps: u16,
}

impl Performance {
    pub fn counts(&self) -> Result<Counts, ValidationError> {
        let mut messages = Vec::new();
        let sets = validate_count("Sets", self.sets, &mut messages);
        let reps = validate_count("Reps", self.reps, &mut messages);
        match (sets, reps) {
            (Some(sets), Some(reps)) => Ok(Counts { sets, reps }),
            _ => Err(ValidationError {
                error_messages: messages,
            }),
        }
    }
}

fn validate_count(field: &str, value: i64, messages: &mut Vec<String>) -> Option<u16> {
    if (1..=MAX_COUNT).contains(&value) {
        u16::try_from(value).ok()
    } else {
        messages.push(format!("{field} must be between 1 and {MAX_COUNT} ({value})"));
        None
    }
}

/// Entry to be logged for an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub id: String,
    #[serde(flatten)]
    pub performance: Performance,
}

#[cfg(feature = "backend")]
impl Entry {
    const COLUMNS: [EntryIden; 7] = [
        EntryIden::Id,
        EntryIden::TraineeId,
        EntryIden::ExerciseId,
        EntryIden::Sets,
        EntryIden::Reps,
        EntryIden::Intensity,
        EntryIden::Timestamp,
    ];

    pub fn fetch<T>(conn: &Connection, trainee_id: &TraineeId, id: &Uuid) -> Result<Entry, ServerError<T>> {
        Self::fetch_maybe(conn, trainee_id, id)?
            .ok_or_else(|| crate::not_found_error!("Requested entry with given ID does not exist! ({id})"))
    }

    pub fn fetch_maybe<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        id: &Uuid,
    ) -> Result<Option<Entry>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(EntryIden::Table)
            .and_where(Expr::col(EntryIden::Id).eq(id))
            .and_where(Expr::col(EntryIden::TraineeId).eq(trainee_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let entry = stmt.query_row(&*values.as_params(), Entry::from_row).optional()?;
        Ok(entry)
    }

    fn view_from_row(row: &Row<'_>) -> rusqlite::Result<EntryView> {
        let exercise_id: Option<Uuid> = row.get("exercise_id")?;
        let exercise_name: Option<String> = row.get("exercise_name")?;
        Ok(EntryView {
            id: row.get("id")?,
            date: row.get("timestamp")?,
            exercise: exercise_id
                .zip(exercise_name)
                .map(|(id, name)| NamedRef { id, name }),
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            intensity: row.get("intensity")?,
        })
    }

    /// Entries of `trainee_id` logged in `range`, newest day first and in the
    /// order they were logged within a day
    pub fn fetch_in_range<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        range: &DateRange,
    ) -> Result<Vec<EntryView>, ServerError<T>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let (sql, values) = Query::select()
            .columns([
                (EntryIden::Table, EntryIden::Id),
                (EntryIden::Table, EntryIden::ExerciseId),
                (EntryIden::Table, EntryIden::Sets),
                (EntryIden::Table, EntryIden::Reps),
                (EntryIden::Table, EntryIden::Intensity),
                (EntryIden::Table, EntryIden::Timestamp),
            ])
            .expr_as(
                Expr::col((ExerciseIden::Table, ExerciseIden::Name)),
                Alias::new("exercise_name"),
            )
            .from(EntryIden::Table)
            .left_join(
                ExerciseIden::Table,
                Expr::col((ExerciseIden::Table, ExerciseIden::Id))
                    .equals((EntryIden::Table, EntryIden::ExerciseId)),
            )
            .and_where(Expr::col((EntryIden::Table, EntryIden::TraineeId)).eq(trainee_id))
            .and_where(Expr::col((EntryIden::Table, EntryIden::Timestamp)).between(range.start, range.end))
            .order_by((EntryIden::Table, EntryIden::Timestamp), Order::Desc)
            .order_by((EntryIden::Table, Alias::new("rowid")), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let entries = stmt
            .query_map(&*values.as_params(), Self::view_from_row)?
            .collect::<Result<_, _>>()?;
        Ok(entries)
    }

    /// Entries in `range` grouped by the day they were logged
    pub fn fetch_grouped<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        range: &DateRange,
    ) -> Result<Vec<EntryGroup<EntryView>>, ServerError<T>> {
        let entries = Self::fetch_in_range(conn, trainee_id, range)?;
        Ok(group_by_date(entries))
    }

    /// Days of the month in `range` with at least one entry, ascending
    pub fn calendar_days<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        range: &DateRange,
    ) -> Result<Vec<u32>, ServerError<T>> {
        let (sql, values) = Query::select()
            .distinct()
            .column(EntryIden::Timestamp)
            .from(EntryIden::Table)
            .and_where(Expr::col(EntryIden::TraineeId).eq(trainee_id))
            .and_where(Expr::col(EntryIden::Timestamp).between(range.start, range.end))
            .order_by(EntryIden::Timestamp, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let days = stmt
            .query_map(&*values.as_params(), |row| row.get::<_, NaiveDate>(0))?
            .map(|date| date.map(|d| d.day()))
            .collect::<Result<_, _>>()?;
        Ok(days)
    }

    /// Every entry logged against `exercise`, newest first
    pub fn history<T>(conn: &Connection, exercise: &Exercise) -> Result<Vec<HistoryEntry>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns([
                EntryIden::Id,
                EntryIden::Sets,
                EntryIden::Reps,
                EntryIden::Intensity,
                EntryIden::Timestamp,
            ])
            .from(EntryIden::Table)
            .and_where(Expr::col(EntryIden::ExerciseId).eq(&exercise.id))
            .and_where(Expr::col(EntryIden::TraineeId).eq(&exercise.trainee_id))
            .order_by(EntryIden::Timestamp, Order::Desc)
            .order_by(Alias::new("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let entries = stmt
            .query_map(&*values.as_params(), |row| {
                Ok(HistoryEntry {
                    id: row.get("id")?,
                    sets: row.get("sets")?,
                    reps: row.get("reps")?,
                    intensity: row.get("intensity")?,
                    date: row.get("timestamp")?,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(entries)
    }

    /// Sets, reps and intensity are the only things that change once logged
    pub fn update_performance<T>(
        &mut self,
        conn: &Connection,
        performance: &Performance,
    ) -> Result<(), ServerError<T>> {
        let Counts { sets, reps } = performance.counts()?;
        self.sets = sets;
        self.reps = reps;
        self.intensity = performance.intensity;

        let (sql, values) = Query::update()
            .table(EntryIden::Table)
            .values([
                (EntryIden::Sets, self.sets.into()),
                (EntryIden::Reps, self.reps.into()),
                (EntryIden::Intensity, self.intensity.into()),
            ])
            .and_where(Expr::col(EntryIden::Id).eq(&self.id))
            .and_where(Expr::col(EntryIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    pub fn delete<T>(&self, conn: &Connection) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::delete()
            .from_table(EntryIden::Table)
            .and_where(Expr::col(EntryIden::Id).eq(&self.id))
            .and_where(Expr::col(EntryIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    /// Log entries for `date`, all of them or none
    ///
    /// Each exercise has to belong to the trainee. Every entry is checked
    /// before anything is written
    pub fn create_batch(
        conn: &mut Connection,
        trainee_id: &TraineeId,
        date: NaiveDate,
        new_entries: Vec<NewEntry>,
    ) -> Result<Vec<Entry>, ServerError<EntryBatchError>> {
        let mut pending = Vec::with_capacity(new_entries.len());
        for new_entry in new_entries {
            let unknown = || EntryBatchError::UnknownExercise {
                id: new_entry.id.clone(),
            };
            let exercise_id = Uuid::parse(&new_entry.id).map_err(|_| unknown())?;
            let exercise = Exercise::fetch_maybe::<EntryBatchError>(conn, trainee_id, &exercise_id)?
                .ok_or_else(unknown)?;
            let Counts { sets, reps } = new_entry.performance.counts()?;

            pending.push(Entry {
                id: Uuid::new_v4(),
                trainee_id: trainee_id.clone(),
                exercise_id: Some(exercise.id),
                sets,
                reps,
                intensity: new_entry.performance.intensity,
                timestamp: date,
            });
        }

        if pending.is_empty() {
            return Ok(pending);
        }

        let tx = conn.transaction()?;
        for entry in &pending {
            entry.insert(&tx)?;
        }
        tx.commit()?;

        Ok(pending)
    }
}
