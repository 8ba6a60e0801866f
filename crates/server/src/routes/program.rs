use std::sync::Arc;

use axum::{
    extract::{FromRef, Path},
    http::StatusCode,
    routing::{get, put},
    Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{
            EditProgramRequest, IdQuery, MessageResponse, NewProgramRequest, NewProgramResponse,
            ProgramResponse, ProgramWorkoutsResponse, ProgramsResponse, SetCurrentProgramRequest,
        },
        Object,
    },
    model::{Program, Trainee, Workout},
    not_found_error,
};
use tracing::{debug, instrument};

use super::parse_id;
use crate::{
    cli::Cli,
    db::DatabaseConnection,
    extract::{Json, Query},
    TraineeState,
};

/// Path segment standing in for the trainee's current program
const CURRENT_PROGRAM: &str = "current";

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
    Arc<Cli>: FromRef<S>,
{
    Router::new()
        .route(
            Object::Program.path(),
            get(fetch_program)
                .post(create_program)
                .put(edit_program)
                .delete(delete_program),
        )
        .route(Object::ProgramAll.path(), get(all_programs))
        .route(Object::ProgramCurrent.path(), put(set_current_program))
        .route(Object::ProgramWorkouts.path(), get(program_workouts))
}

#[instrument(skip(conn))]
pub async fn create_program(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<NewProgramRequest>,
) -> Result<(StatusCode, Json<NewProgramResponse>), ServerError<Nothing>> {
    let program = Program::new(trainee.id, request.name.trim().to_string(), request.description);

    let program = conn
        .interact(move |conn| Program::create(conn, program))
        .await??;
    debug!(id = %program.id, "Created program");

    Ok((
        StatusCode::CREATED,
        Json(NewProgramResponse {
            message: format!("Successfully created program {}", program.name),
            program_id: program.id,
        }),
    ))
}

#[instrument(skip(conn))]
pub async fn fetch_program(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<IdQuery>,
) -> Result<Json<ProgramResponse>, ServerError<Nothing>> {
    let id = parse_id("Program", query.id.as_deref())?;

    let program = conn
        .interact(move |conn| {
            let program = Program::fetch(conn, &trainee.id, &id)?;
            let current = Trainee::fetch(conn, &trainee.id)?.current_program_id;
            Ok::<_, ServerError<_>>(program.view(current.as_ref()))
        })
        .await??;

    Ok(Json(ProgramResponse { program }))
}

#[instrument(skip(conn))]
pub async fn edit_program(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<EditProgramRequest>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Program", Some(&request.id))?;

    conn.interact(move |conn| {
        let mut program = Program::fetch(conn, &trainee.id, &id)?;
        program.name = request.name.trim().to_string();
        program.description = request.description;
        program.update(conn)
    })
    .await??;

    Ok(Json(MessageResponse::new("Successfully updated program details")))
}

/// The program's workouts go with it
#[instrument(skip(conn))]
pub async fn delete_program(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Program", query.id.as_deref())?;

    conn.interact(move |conn| {
        Program::fetch(conn, &trainee.id, &id)?.delete(conn)?;
        Ok::<_, ServerError<_>>(())
    })
    .await??;

    Ok(Json(MessageResponse::new("Program deleted successfully")))
}

#[instrument(skip(conn))]
pub async fn set_current_program(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Json(request): Json<SetCurrentProgramRequest>,
) -> Result<Json<MessageResponse>, ServerError<Nothing>> {
    let id = parse_id("Program", Some(&request.id))?;

    let name = conn
        .interact(move |conn| {
            let program = Program::fetch(conn, &trainee.id, &id)?;
            Trainee::set_current_program(conn, &trainee.id, Some(&program.id))?;
            Ok::<_, ServerError<_>>(program.name)
        })
        .await??;

    Ok(Json(MessageResponse::new(format!("{name} is now the current program"))))
}

#[instrument(skip(conn))]
pub async fn all_programs(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
) -> Result<Json<ProgramsResponse>, ServerError<Nothing>> {
    let programs = conn
        .interact(move |conn| {
            let current = Trainee::fetch(conn, &trainee.id)?.current_program_id;
            let programs = Program::fetch_all(conn, &trainee.id)?
                .iter()
                .map(|p| p.view(current.as_ref()))
                .collect();
            Ok::<_, ServerError<_>>(programs)
        })
        .await??;

    Ok(Json(ProgramsResponse { programs }))
}

/// A program and its workouts. `current` names the trainee's current program
#[instrument(skip(conn))]
pub async fn program_workouts(
    DatabaseConnection(conn): DatabaseConnection,
    trainee: TraineeState,
    Path(id): Path<String>,
) -> Result<Json<ProgramWorkoutsResponse>, ServerError<Nothing>> {
    let id = match id.as_str() {
        CURRENT_PROGRAM => None,
        id => Some(parse_id("Program", Some(id))?),
    };

    let response = conn
        .interact(move |conn| {
            let program = match id {
                Some(id) => Program::fetch(conn, &trainee.id, &id)?,
                None => Program::fetch_current(conn, &trainee.id)?
                    .ok_or_else(|| not_found_error!("Trainee has no current program"))?,
            };
            let current = Trainee::fetch(conn, &trainee.id)?.current_program_id;
            let workouts = Workout::fetch_for_program(conn, &trainee.id, &program.id)?;

            Ok::<_, ServerError<Nothing>>(ProgramWorkoutsResponse {
                program: program.view(current.as_ref()),
                workouts: Workout::views(conn, workouts)?,
            })
        })
        .await??;

    Ok(Json(response))
}
