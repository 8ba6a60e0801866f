use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::{api::error::ServerError, model::Trainee},
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use crate::{
    api::error::ValidationError,
    model::{validate_name, TraineeId, ValidateModel},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("program"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Program {
    pub id: Uuid,
    pub trainee_id: TraineeId,
    pub name: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
}

impl ValidateModel for Program {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("Program", &self.name)
    }
}

/// Program as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_current: bool,
}

impl Program {
    pub fn new(trainee_id: TraineeId, name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trainee_id,
            name,
            description,
            creation_date: Utc::now(),
        }
    }

    pub fn view(&self, current_program_id: Option<&Uuid>) -> ProgramView {
        ProgramView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            is_current: current_program_id == Some(&self.id),
        }
    }
}

#[cfg(feature = "backend")]
impl Program {
    const COLUMNS: [ProgramIden; 5] = [
        ProgramIden::Id,
        ProgramIden::TraineeId,
        ProgramIden::Name,
        ProgramIden::Description,
        ProgramIden::CreationDate,
    ];

    pub fn fetch<T>(conn: &Connection, trainee_id: &TraineeId, id: &Uuid) -> Result<Program, ServerError<T>> {
        Self::fetch_maybe(conn, trainee_id, id)?
            .ok_or_else(|| crate::not_found_error!("Program does not exist ({id})"))
    }

    pub fn fetch_maybe<T>(
        conn: &Connection,
        trainee_id: &TraineeId,
        id: &Uuid,
    ) -> Result<Option<Program>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(ProgramIden::Table)
            .and_where(Expr::col(ProgramIden::Id).eq(id))
            .and_where(Expr::col(ProgramIden::TraineeId).eq(trainee_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let program = stmt.query_row(&*values.as_params(), Program::from_row).optional()?;
        Ok(program)
    }

    /// Every program of the trainee in creation order
    pub fn fetch_all<T>(conn: &Connection, trainee_id: &TraineeId) -> Result<Vec<Program>, ServerError<T>> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(ProgramIden::Table)
            .and_where(Expr::col(ProgramIden::TraineeId).eq(trainee_id))
            .order_by(ProgramIden::CreationDate, Order::Asc)
            .order_by(ProgramIden::Name, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let programs = stmt
            .query_map(&*values.as_params(), Program::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(programs)
    }

    /// The trainee's current program, if one is set
    pub fn fetch_current<T>(conn: &Connection, trainee_id: &TraineeId) -> Result<Option<Program>, ServerError<T>> {
        let trainee = Trainee::fetch(conn, trainee_id)?;
        match trainee.current_program_id {
            Some(id) => Self::fetch_maybe(conn, trainee_id, &id),
            None => Ok(None),
        }
    }

    pub fn create<T>(conn: &mut Connection, program: Program) -> Result<Program, ServerError<T>> {
        program.validate()?;

        let tx = conn.transaction()?;
        let program = {
            program.insert(&tx)?;
            Program::fetch(&tx, &program.trainee_id, &program.id)?
        };
        tx.commit()?;

        Ok(program)
    }

    pub fn update<T>(&self, conn: &Connection) -> Result<(), ServerError<T>> {
        self.validate()?;

        let (sql, values) = Query::update()
            .table(ProgramIden::Table)
            .values([
                (ProgramIden::Name, self.name.clone().into()),
                (ProgramIden::Description, self.description.clone().into()),
            ])
            .and_where(Expr::col(ProgramIden::Id).eq(&self.id))
            .and_where(Expr::col(ProgramIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;

        Ok(())
    }

    /// Workouts go with the program. The trainee's current program reference
    /// is cleared by the schema
    pub fn delete<T>(&self, conn: &Connection) -> Result<(), ServerError<T>> {
        let (sql, values) = Query::delete()
            .from_table(ProgramIden::Table)
            .and_where(Expr::col(ProgramIden::Id).eq(&self.id))
            .and_where(Expr::col(ProgramIden::TraineeId).eq(&self.trainee_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;

        Ok(())
    }
}
