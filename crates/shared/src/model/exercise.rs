use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::workout::contains_pattern,
    crate::{
        api::{error::ServerError, response_errors::ExerciseBatchError},
        journal::{ExerciseFilter, PageBounds},
        model::{BodyPartIden, ProgramIden, Workout, WorkoutIden},
    },
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{
        enum_def, Condition, Expr, Func, OnConflict, Order, Query, SelectStatement,
        SqliteQueryBuilder,
    },
    sea_query_rusqlite::RusqliteBinder,
    std::collections::HashMap,
};

use crate::{
    api::error::ValidationError,
    model::{validate_name, BodyPart, NamedRef, TraineeId, ValidateModel},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Exercise {
    pub id: Uuid,
    pub trainee_id: TraineeId,
    pub name: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
}

impl ValidateModel for Exercise {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("Exercise", &self.name)
    }
}

/// Body part tag on an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise_body_part"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct ExerciseBodyPart {
    pub exercise_id: Uuid,
    pub body_part_id: Uuid,
}

/// Exercise included in a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise_workout"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct ExerciseWorkout {
    pub exercise_id: Uuid,
    pub workout_id: Uuid,
}

/// Exercise with its body parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub bodypart: Vec<BodyPart>,
}

/// Exercise with everything it's related to, as listed by the filter view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub id: Uuid,
    pub name: String,
    pub workouts: Vec<NamedRef>,
    pub programs: Vec<NamedRef>,
    pub bodyparts: Vec<NamedRef>,
}

/// Exercise to be created along with its body part tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bodyparts: Vec<String>,
}

impl Exercise {
    pub fn new(trainee_id: TraineeId, name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trainee_id,
            name,
            description,
            creation_date: Utc::now(),
        }
    }
}

#[cfg(feature = "backend")]
impl Exercise {
    const COLUMNS: [ExerciseIden; 5] = [
        ExerciseIden::Id,
        ExerciseIden::TraineeId,
        ExerciseIden::Name,
        ExerciseIden::Description,
        ExerciseIden::CreationDate,
    ];

    fn select() -> SelectStatement {
        Query::select()
            .columns(Self::COLUMNS.map(|c| (ExerciseIden::Table, c)))
            .from(ExerciseIden::Table)
            .to_owned()
    }

    fn query_all<T>(conn: &Connection, query: &SelectStatement) -> Result<Vec<Exercise>, ServerError<T>> {
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);
        let mut stmt = conn.prepare_cached(&sql)?;
        let exercises = stmt
            .query_map(&*values.as_params(), Exercise::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(exercises)
    }

    pub fn fetch<T>(conn: &Connection, trainee_id: &TraineeId, id: &Uuid) -> Result<Exercise, ServerError<T>> {
        Self::fetch_maybe(conn, trainee_id, id)?
            .ok_or_else(|| crate::not_found_error!("Exercise with given ID does not exist! ({id})"))
    }

    pub fn fetch_maybe<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        id: &Uuid,
    ) -> Result<Option<Exercise>, ServerError<T>> {
        let (sql, values) = Self::select()
            .and_where(Expr::col((ExerciseIden::Table, ExerciseIden::Id)).eq(id))
            .and_where(Expr::col((ExerciseIden::Table, ExerciseIden::TraineeId)).eq(trainee_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let exercise = stmt.query_row(&*values.as_params(), Exercise::from_row).optional()?;
        Ok(exercise)
    }

    /// Exercises included in a workout, by name
    pub fn fetch_for_workout<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        workout_id: &Uuid,
    ) -> Result<Vec<Exercise>, ServerError<T>> {
        let query = Self::select()
            .inner_join(
                ExerciseWorkoutIden::Table,
                Expr::col((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::ExerciseId))
                    .equals((ExerciseIden::Table, ExerciseIden::Id)),
            )
            .and_where(Expr::col((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::WorkoutId)).eq(workout_id))
            .and_where(Expr::col((ExerciseIden::Table, ExerciseIden::TraineeId)).eq(trainee_id))
            .order_by((ExerciseIden::Table, ExerciseIden::Name), Order::Asc)
            .to_owned();
        Self::query_all(conn, &query)
    }

    /// Exercises whose name contains `query`, ignoring ASCII case
    pub fn search<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        query: &str,
        limit: u64,
    ) -> Result<Vec<Exercise>, ServerError<T>> {
        let select = Self::select()
            .and_where(Expr::col((ExerciseIden::Table, ExerciseIden::TraineeId)).eq(trainee_id))
            .and_where(Expr::col((ExerciseIden::Table, ExerciseIden::Name)).like(contains_pattern(query)))
            .order_by((ExerciseIden::Table, ExerciseIden::Name), Order::Asc)
            .limit(limit)
            .to_owned();
        Self::query_all(conn, &select)
    }

    fn filter_condition(trainee_id: &TraineeId, filter: &ExerciseFilter) -> Condition {
        let mut condition = Condition::all()
            .add(Expr::col((ExerciseIden::Table, ExerciseIden::TraineeId)).eq(trainee_id));

        if let Some(body_part_id) = &filter.body_part {
            condition = condition.add(
                Expr::col((ExerciseIden::Table, ExerciseIden::Id)).in_subquery(
                    Query::select()
                        .column(ExerciseBodyPartIden::ExerciseId)
                        .from(ExerciseBodyPartIden::Table)
                        .and_where(Expr::col(ExerciseBodyPartIden::BodyPartId).eq(body_part_id))
                        .to_owned(),
                ),
            );
        }

        if let Some(workout_id) = &filter.workout {
            condition = condition.add(
                Expr::col((ExerciseIden::Table, ExerciseIden::Id)).in_subquery(
                    Query::select()
                        .column(ExerciseWorkoutIden::ExerciseId)
                        .from(ExerciseWorkoutIden::Table)
                        .and_where(Expr::col(ExerciseWorkoutIden::WorkoutId).eq(workout_id))
                        .to_owned(),
                ),
            );
        }

        if let Some(program_id) = &filter.program {
            condition = condition.add(
                Expr::col((ExerciseIden::Table, ExerciseIden::Id)).in_subquery(
                    Query::select()
                        .column((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::ExerciseId))
                        .from(ExerciseWorkoutIden::Table)
                        .inner_join(
                            WorkoutIden::Table,
                            Expr::col((WorkoutIden::Table, WorkoutIden::Id))
                                .equals((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::WorkoutId)),
                        )
                        .and_where(Expr::col((WorkoutIden::Table, WorkoutIden::ProgramId)).eq(program_id))
                        .to_owned(),
                ),
            );
        }

        condition
    }

    /// Number of the trainee's exercises matching `filter`
    pub fn filter_count<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        filter: &ExerciseFilter,
    ) -> Result<usize, ServerError<T>> {
        let (sql, values) = Query::select()
            .expr(Func::count(Expr::col((ExerciseIden::Table, ExerciseIden::Id))))
            .from(ExerciseIden::Table)
            .cond_where(Self::filter_condition(trainee_id, filter))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let count: i64 = stmt.query_row(&*values.as_params(), |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// One page of the trainee's exercises matching `filter`, by name
    pub fn filter_page<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        filter: &ExerciseFilter,
        page: &PageBounds,
    ) -> Result<Vec<Exercise>, ServerError<T>> {
        if page.limit == 0 {
            return Ok(Vec::new());
        }

        let query = Self::select()
            .cond_where(Self::filter_condition(trainee_id, filter))
            .order_by((ExerciseIden::Table, ExerciseIden::Name), Order::Asc)
            .order_by((ExerciseIden::Table, ExerciseIden::CreationDate), Order::Asc)
            .limit(page.limit as u64)
            .offset(page.offset as u64)
            .to_owned();
        Self::query_all(conn, &query)
    }

    /// Body parts tagged on each of `exercise_ids`, in catalog order
    fn body_parts_for(
        conn: &Connection,
        exercise_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<BodyPart>>, rusqlite::Error> {
        let mut map: HashMap<Uuid, Vec<BodyPart>> = HashMap::new();
        if exercise_ids.is_empty() {
            return Ok(map);
        }

        let (sql, values) = Query::select()
            .column((ExerciseBodyPartIden::Table, ExerciseBodyPartIden::ExerciseId))
            .column((BodyPartIden::Table, BodyPartIden::Id))
            .column((BodyPartIden::Table, BodyPartIden::Name))
            .from(ExerciseBodyPartIden::Table)
            .inner_join(
                BodyPartIden::Table,
                Expr::col((BodyPartIden::Table, BodyPartIden::Id))
                    .equals((ExerciseBodyPartIden::Table, ExerciseBodyPartIden::BodyPartId)),
            )
            .and_where(
                Expr::col((ExerciseBodyPartIden::Table, ExerciseBodyPartIden::ExerciseId))
                    .is_in(exercise_ids.iter().copied()),
            )
            .order_by((BodyPartIden::Table, sea_query::Alias::new("rowid")), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(&*values.as_params(), |row| {
            Ok((
                row.get::<_, Uuid>(0)?,
                BodyPart {
                    id: row.get(1)?,
                    name: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (exercise_id, body_part) = row?;
            map.entry(exercise_id).or_default().push(body_part);
        }
        Ok(map)
    }

    /// Workouts, along with their program, each of `exercise_ids` is in
    fn workouts_for(
        conn: &Connection,
        exercise_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<(NamedRef, NamedRef)>>, rusqlite::Error> {
        let mut map: HashMap<Uuid, Vec<(NamedRef, NamedRef)>> = HashMap::new();
        if exercise_ids.is_empty() {
            return Ok(map);
        }

        let (sql, values) = Query::select()
            .column((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::ExerciseId))
            .column((WorkoutIden::Table, WorkoutIden::Id))
            .column((WorkoutIden::Table, WorkoutIden::Name))
            .column((ProgramIden::Table, ProgramIden::Id))
            .column((ProgramIden::Table, ProgramIden::Name))
            .from(ExerciseWorkoutIden::Table)
            .inner_join(
                WorkoutIden::Table,
                Expr::col((WorkoutIden::Table, WorkoutIden::Id))
                    .equals((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::WorkoutId)),
            )
            .inner_join(
                ProgramIden::Table,
                Expr::col((ProgramIden::Table, ProgramIden::Id))
                    .equals((WorkoutIden::Table, WorkoutIden::ProgramId)),
            )
            .and_where(
                Expr::col((ExerciseWorkoutIden::Table, ExerciseWorkoutIden::ExerciseId))
                    .is_in(exercise_ids.iter().copied()),
            )
            .order_by((WorkoutIden::Table, WorkoutIden::CreationDate), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(&*values.as_params(), |row| {
            Ok((
                row.get::<_, Uuid>(0)?,
                NamedRef {
                    id: row.get(1)?,
                    name: row.get(2)?,
                },
                NamedRef {
                    id: row.get(3)?,
                    name: row.get(4)?,
                },
            ))
        })?;
        for row in rows {
            let (exercise_id, workout, program) = row?;
            map.entry(exercise_id).or_default().push((workout, program));
        }
        Ok(map)
    }

    /// Attach body parts
    pub fn details<T>(conn: &Connection, exercises: Vec<Exercise>) -> Result<Vec<ExerciseDetail>, ServerError<T>> {
        let ids: Vec<Uuid> = exercises.iter().map(|e| e.id).collect();
        let mut body_parts = Self::body_parts_for(conn, &ids)?;

        Ok(exercises
            .into_iter()
            .map(|e| ExerciseDetail {
                bodypart: body_parts.remove(&e.id).unwrap_or_default(),
                id: e.id,
                name: e.name,
                description: e.description,
            })
            .collect())
    }

    /// Attach workouts, programs and body parts
    pub fn summaries<T>(
        conn: &Connection,
        exercises: Vec<Exercise>,
    ) -> Result<Vec<ExerciseSummary>, ServerError<T>> {
        let ids: Vec<Uuid> = exercises.iter().map(|e| e.id).collect();
        let mut body_parts = Self::body_parts_for(conn, &ids)?;
        let mut workouts = Self::workouts_for(conn, &ids)?;

        Ok(exercises
            .into_iter()
            .map(|e| {
                let (workouts, programs) = split_workouts(workouts.remove(&e.id).unwrap_or_default());
                ExerciseSummary {
                    id: e.id,
                    name: e.name,
                    workouts,
                    programs,
                    bodyparts: body_parts
                        .remove(&e.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|b| NamedRef { id: b.id, name: b.name })
                        .collect(),
                }
            })
            .collect())
    }

    /// Entries logged against the exercise keep their data but lose the link
    pub fn delete<T>(&self, conn: &Connection) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::delete()
            .from_table(ExerciseIden::Table)
            .and_where(Expr::col(ExerciseIden::Id).eq(&self.id))
            .and_where(Expr::col(ExerciseIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    /// Adding an exercise to a workout it's already in is a no-op
    pub fn link_workout<T>(&self, conn: &Connection, workout: &Workout) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::insert()
            .into_table(ExerciseWorkoutIden::Table)
            .columns([ExerciseWorkoutIden::ExerciseId, ExerciseWorkoutIden::WorkoutId])
            .values([self.id.into(), workout.id.into()])?
            .on_conflict(
                OnConflict::columns([ExerciseWorkoutIden::ExerciseId, ExerciseWorkoutIden::WorkoutId])
                    .do_nothing()
                    .to_owned(),
            )
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    pub fn unlink_workout<T>(&self, conn: &Connection, workout: &Workout) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::delete()
            .from_table(ExerciseWorkoutIden::Table)
            .and_where(Expr::col(ExerciseWorkoutIden::ExerciseId).eq(&self.id))
            .and_where(Expr::col(ExerciseWorkoutIden::WorkoutId).eq(&workout.id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    /// Create exercises in `workout`, all of them or none
    ///
    /// Every exercise is checked before anything is written
    pub fn create_batch(
        conn: &mut Connection,
        trainee_id: &TraineeId,
        workout: &Workout,
        new_exercises: Vec<NewExercise>,
    ) -> Result<Vec<Exercise>, ServerError<ExerciseBatchError>> {
        let mut pending = Vec::with_capacity(new_exercises.len());
        for new_exercise in new_exercises {
            let exercise = Exercise::new(
                trainee_id.clone(),
                new_exercise.name.trim().to_string(),
                new_exercise.description,
            );
            exercise.validate()?;

            let mut tags = Vec::with_capacity(new_exercise.bodyparts.len());
            for raw_id in &new_exercise.bodyparts {
                let unknown = || ExerciseBatchError::UnknownBodyPart {
                    name: exercise.name.clone(),
                    id: raw_id.clone(),
                };
                let body_part_id = Uuid::parse(raw_id).map_err(|_| unknown())?;
                if BodyPart::fetch_maybe::<ExerciseBatchError>(conn, &body_part_id)?.is_none() {
                    return Err(unknown().into());
                }
                if !tags.contains(&body_part_id) {
                    tags.push(body_part_id);
                }
            }
            pending.push((exercise, tags));
        }

        let tx = conn.transaction()?;
        for (exercise, tags) in &pending {
            exercise.insert(&tx)?;
            ExerciseWorkout {
                exercise_id: exercise.id,
                workout_id: workout.id,
            }
            .insert(&tx)?;
            for body_part_id in tags {
                ExerciseBodyPart {
                    exercise_id: exercise.id,
                    body_part_id: *body_part_id,
                }
                .insert(&tx)?;
            }
        }
        tx.commit()?;

        Ok(pending.into_iter().map(|(exercise, _)| exercise).collect())
    }
}

/// Split workout/program pairs, listing each program once
#[cfg(feature = "backend")]
fn split_workouts(pairs: Vec<(NamedRef, NamedRef)>) -> (Vec<NamedRef>, Vec<NamedRef>) {
    let mut workouts = Vec::with_capacity(pairs.len());
    let mut programs: Vec<NamedRef> = Vec::new();
    for (workout, program) in pairs {
        workouts.push(workout);
        if !programs.iter().any(|p| p.id == program.id) {
            programs.push(program);
        }
    }
    (workouts, programs)
}
