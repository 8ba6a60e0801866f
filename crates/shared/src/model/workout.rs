use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::api::error::ServerError,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, LikeExpr, OnConflict, Order, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    std::collections::HashMap,
};

use crate::{
    api::error::ValidationError,
    model::{validate_name, TraineeId, ValidateModel},
    types::{Day, Uuid},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Workout {
    pub id: Uuid,
    pub trainee_id: TraineeId,
    pub program_id: Uuid,
    pub name: String,
    pub creation_date: DateTime<Utc>,
}

impl ValidateModel for Workout {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("Workout", &self.name)
    }
}

/// Weekday a workout is scheduled on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout_day"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct WorkoutDay {
    pub workout_id: Uuid,
    pub day: Day,
}

/// Workout as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutView {
    pub id: Uuid,
    pub name: String,
    pub days: Vec<Day>,
}

impl Workout {
    pub fn new(trainee_id: TraineeId, program_id: Uuid, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            trainee_id,
            program_id,
            name,
            creation_date: Utc::now(),
        }
    }
}

#[cfg(feature = "backend")]
impl Workout {
    const COLUMNS: [WorkoutIden; 5] = [
        WorkoutIden::Id,
        WorkoutIden::TraineeId,
        WorkoutIden::ProgramId,
        WorkoutIden::Name,
        WorkoutIden::CreationDate,
    ];

    pub fn fetch<T>(conn: &Connection, trainee_id: &TraineeId, id: &Uuid) -> Result<Workout, ServerError<T>> {
        Self::fetch_maybe(conn, trainee_id, id)?
            .ok_or_else(|| crate::not_found_error!("Workout does not exist ({id})"))
    }

    pub fn fetch_maybe<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        id: &Uuid,
    ) -> Result<Option<Workout>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::Id).eq(id))
            .and_where(Expr::col(WorkoutIden::TraineeId).eq(trainee_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let workout = stmt.query_row(&*values.as_params(), Workout::from_row).optional()?;
        Ok(workout)
    }

    /// Workouts of a program in creation order
    pub fn fetch_for_program<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        program_id: &Uuid,
    ) -> Result<Vec<Workout>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::ProgramId).eq(program_id))
            .and_where(Expr::col(WorkoutIden::TraineeId).eq(trainee_id))
            .order_by(WorkoutIden::CreationDate, Order::Asc)
            .order_by(WorkoutIden::Name, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let workouts = stmt
            .query_map(&*values.as_params(), Workout::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(workouts)
    }

    /// Workouts whose name contains `query`, ignoring ASCII case
    pub fn search<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        query: &str,
        limit: u64,
    ) -> Result<Vec<Workout>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::TraineeId).eq(trainee_id))
            .and_where(Expr::col(WorkoutIden::Name).like(contains_pattern(query)))
            .order_by(WorkoutIden::Name, Order::Asc)
            .limit(limit)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let workouts = stmt
            .query_map(&*values.as_params(), Workout::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(workouts)
    }

    /// Create the workout scheduled on `day`
    pub fn create<T>(conn: &mut Connection, workout: Workout, day: Day) -> Result<Workout, ServerError<T>> {
        workout.validate()?;

        let tx = conn.transaction()?;
        let workout = {
            workout.insert(&tx)?;
            WorkoutDay {
                workout_id: workout.id,
                day,
            }
            .insert(&tx)?;
            Workout::fetch(&tx, &workout.trainee_id, &workout.id)?
        };
        tx.commit()?;

        Ok(workout)
    }

    pub fn rename<T>(&mut self, conn: &Connection, name: String) -> Result<(), ServerError<T>> {
        self.name = name;
        self.validate()?;

        let (sql, values) = Query::update()
            .table(WorkoutIden::Table)
            .values([(WorkoutIden::Name, self.name.clone().into())])
            .and_where(Expr::col(WorkoutIden::Id).eq(&self.id))
            .and_where(Expr::col(WorkoutIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    /// Only the workout's day and exercise links go with it
    pub fn delete<T>(&self, conn: &Connection) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::delete()
            .from_table(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::Id).eq(&self.id))
            .and_where(Expr::col(WorkoutIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    /// Scheduling a day twice is a no-op
    pub fn add_day<T>(&self, conn: &Connection, day: Day) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::insert()
            .into_table(WorkoutDayIden::Table)
            .columns([WorkoutDayIden::WorkoutId, WorkoutDayIden::Day])
            .values([self.id.into(), day.into()])?
            .on_conflict(
                OnConflict::columns([WorkoutDayIden::WorkoutId, WorkoutDayIden::Day])
                    .do_nothing()
                    .to_owned(),
            )
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    pub fn remove_day<T>(&self, conn: &Connection, day: Day) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::delete()
            .from_table(WorkoutDayIden::Table)
            .and_where(Expr::col(WorkoutDayIden::WorkoutId).eq(&self.id))
            .and_where(Expr::col(WorkoutDayIden::Day).eq(day))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    /// Attach scheduled days, Monday first
    pub fn views<T>(conn: &Connection, workouts: Vec<Workout>) -> Result<Vec<WorkoutView>, ServerError<T>> {
        if workouts.is_empty() {
            return Ok(Vec::new());
        }

        let (sql, values) = Query::select()
            .columns([WorkoutDayIden::WorkoutId, WorkoutDayIden::Day])
            .from(WorkoutDayIden::Table)
            .and_where(Expr::col(WorkoutDayIden::WorkoutId).is_in(workouts.iter().map(|w| w.id)))
            .order_by(WorkoutDayIden::Day, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut days: HashMap<Uuid, Vec<Day>> = HashMap::new();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(&*values.as_params(), WorkoutDay::from_row)?;
        for row in rows {
            let row = row?;
            days.entry(row.workout_id).or_default().push(row.day);
        }

        Ok(workouts
            .into_iter()
            .map(|w| WorkoutView {
                days: days.remove(&w.id).unwrap_or_default(),
                id: w.id,
                name: w.name,
            })
            .collect())
    }
}

/// `LIKE` pattern matching `query` anywhere, with wildcards in `query` escaped
#[cfg(feature = "backend")]
pub(crate) fn contains_pattern(query: &str) -> LikeExpr {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}
