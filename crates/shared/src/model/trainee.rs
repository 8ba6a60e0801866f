use std::{fmt, ops::Deref};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::api::error::ServerError,
    exemplar::Model,
    rusqlite::{
        types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
        Connection, ToSql,
    },
    sea_query::{enum_def, Expr, OnConflict, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use crate::{api::error::ValidationError, types::Uuid};

/// Username handed over by the authenticating proxy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraineeId(String);

impl TraineeId {
    pub const MAX_LEN: usize = 50;

    pub fn new<S: AsRef<str>>(username: S) -> Result<Self, ValidationError> {
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(ValidationError::new("Trainee id is empty"));
        }
        if username.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::new(format!(
                "Trainee id is longer than {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(username.to_string()))
    }
}

impl fmt::Display for TraineeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for TraineeId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(feature = "backend")]
impl ToSql for TraineeId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

#[cfg(feature = "backend")]
impl FromSql for TraineeId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(Self)
    }
}

#[cfg(feature = "backend")]
impl From<&TraineeId> for sea_query::Value {
    fn from(value: &TraineeId) -> Self {
        value.0.clone().into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("trainee"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Trainee {
    pub id: TraineeId,
    pub current_program_id: Option<Uuid>,
    pub creation_date: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Trainee {
    /// Make sure a row exists for `id`. Trainees are created the first time
    /// they're seen
    pub fn ensure<T>(conn: &Connection, id: &TraineeId) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::insert()
            .into_table(TraineeIden::Table)
            .columns([TraineeIden::Id, TraineeIden::CreationDate])
            .values([id.into(), Utc::now().into()])?
            .on_conflict(OnConflict::column(TraineeIden::Id).do_nothing().to_owned())
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }

    pub fn fetch<T>(conn: &Connection, id: &TraineeId) -> Result<Trainee, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns([
                TraineeIden::Id,
                TraineeIden::CurrentProgramId,
                TraineeIden::CreationDate,
            ])
            .from(TraineeIden::Table)
            .and_where(Expr::col(TraineeIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let trainee = stmt.query_row(&*values.as_params(), Trainee::from_row)?;
        Ok(trainee)
    }

    /// Callers are responsible for checking the program belongs to `id`
    pub fn set_current_program<T>(
        conn: &Connection,
        id: &TraineeId,
        program_id: Option<&Uuid>,
    ) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::update()
            .table(TraineeIden::Table)
            .values([(TraineeIden::CurrentProgramId, program_id.copied().into())])
            .and_where(Expr::col(TraineeIden::Id).eq(id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;
        Ok(())
    }
}
