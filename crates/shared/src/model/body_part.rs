use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::{
        api::error::ServerError,
        journal::{rank, BodyPartCount, DateRange},
        model::{EntryIden, ExerciseBodyPartIden},
    },
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Alias, Condition, Expr, Func, Order, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use crate::{model::TraineeId, types::Uuid};

/// Muscle group from the seeded catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("body_part"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct BodyPart {
    pub id: Uuid,
    pub name: String,
}

#[cfg(feature = "backend")]
impl BodyPart {
    /// The catalog in seed order
    pub fn fetch_all<T>(conn: &Connection) -> Result<Vec<BodyPart>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns([BodyPartIden::Id, BodyPartIden::Name])
            .from(BodyPartIden::Table)
            .order_by(Alias::new("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let body_parts = stmt
            .query_map(&*values.as_params(), BodyPart::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(body_parts)
    }

    pub fn fetch_maybe<T>(conn: &Connection, id: &Uuid) -> Result<Option<BodyPart>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns([BodyPartIden::Id, BodyPartIden::Name])
            .from(BodyPartIden::Table)
            .and_where(Expr::col(BodyPartIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let body_part = stmt.query_row(&*values.as_params(), BodyPart::from_row).optional()?;
        Ok(body_part)
    }

    /// Entries of `trainee_id` logged in `range`, counted per body part
    ///
    /// Every body part gets a row, even with nothing logged against it. An
    /// exercise tagged with several body parts counts towards each of them
    pub fn tally<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        range: &DateRange,
    ) -> Result<Vec<BodyPartCount>, ServerError<T>> {
        let (sql, values) = Query::select()
            .column((BodyPartIden::Table, BodyPartIden::Id))
            .column((BodyPartIden::Table, BodyPartIden::Name))
            .expr_as(
                Func::count(Expr::col((EntryIden::Table, EntryIden::Id))),
                Alias::new("count"),
            )
            .from(BodyPartIden::Table)
            .left_join(
                ExerciseBodyPartIden::Table,
                Expr::col((ExerciseBodyPartIden::Table, ExerciseBodyPartIden::BodyPartId))
                    .equals((BodyPartIden::Table, BodyPartIden::Id)),
            )
            .left_join(
                EntryIden::Table,
                Condition::all()
                    .add(
                        Expr::col((EntryIden::Table, EntryIden::ExerciseId))
                            .equals((ExerciseBodyPartIden::Table, ExerciseBodyPartIden::ExerciseId)),
                    )
                    .add(Expr::col((EntryIden::Table, EntryIden::TraineeId)).eq(trainee_id))
                    .add(
                        Expr::col((EntryIden::Table, EntryIden::Timestamp))
                            .between(range.start, range.end),
                    ),
            )
            .group_by_col((BodyPartIden::Table, BodyPartIden::Id))
            .group_by_col((BodyPartIden::Table, BodyPartIden::Name))
            .order_by((BodyPartIden::Table, Alias::new("rowid")), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let counts = stmt
            .query_map(&*values.as_params(), |row| {
                Ok(BodyPartCount {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    count: row.get::<_, i64>(2)?.max(0) as u64,
                })
            })?
            .collect::<Result<_, _>>()?;

        Ok(rank(counts))
    }
}
