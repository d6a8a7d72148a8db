use axum::{
    extract::FromRef,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{RowContext, ServerError},
        payloads::{
            validate_dates, MessageResponse, NewChallenge, NewProgram, UpdateChallenge,
            UpdateProgram,
        },
        Object,
    },
    model::{Challenge, Program, Sequence, ValidateModel, Workout},
    types::Uuid,
};
use tracing::instrument;

use crate::{db::DatabaseConnection, JsonBody, PathParams, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(Object::Programs.path(), get(list_programs).post(create_program))
        .route(
            Object::Program.path(),
            get(fetch_program).patch(update_program).delete(delete_program),
        )
        .route(
            Object::ProgramChallenges.path(),
            get(list_program_challenges).post(create_program_challenge),
        )
        .route(
            Object::ProgramChallenge.path(),
            get(fetch_program_challenge)
                .patch(update_program_challenge)
                .delete(delete_program_challenge),
        )
        .route(Object::ProgramSequences.path(), get(list_program_sequences))
        .route(Object::ProgramSequence.path(), get(fetch_program_sequence))
        .route(Object::ProgramWorkouts.path(), get(list_program_workouts))
}

#[instrument(skip(conn))]
pub async fn list_programs(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Vec<Program>>, ServerError> {
    let programs = conn.interact(|conn| Program::fetch_all(conn)).await??;
    Ok(Json(programs))
}

#[instrument(skip(conn))]
pub async fn create_program(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    JsonBody(new): JsonBody<NewProgram>,
) -> Result<(StatusCode, Json<Program>), ServerError> {
    new.validate()?;
    let program = conn.interact(move |conn| Program::create(conn, &new)).await??;
    Ok((StatusCode::CREATED, Json(program)))
}

#[instrument(skip(conn))]
pub async fn fetch_program(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Program>, ServerError> {
    let program = conn
        .interact(move |conn| Program::fetch_by_id(conn, &id).or_not_found("Program"))
        .await??;
    Ok(Json(program))
}

#[instrument(skip(conn))]
pub async fn update_program(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
    JsonBody(update): JsonBody<UpdateProgram>,
) -> Result<Json<Program>, ServerError> {
    update.validate()?;
    let program = conn
        .interact(move |conn| {
            let mut program = Program::fetch_by_id(conn, &id).or_not_found("Program")?;
            if let Some(name) = update.name_change() {
                program.name = name;
            }
            program.save(conn)?;
            Ok::<_, ServerError>(program)
        })
        .await??;
    Ok(Json(program))
}

/// Challenges of the program are kept, their `program_id` is cleared
#[instrument(skip(conn))]
pub async fn delete_program(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    conn.interact(move |conn| Program::delete_by_id(conn, &id).or_not_found("Program"))
        .await??;
    Ok(Json(MessageResponse::new("Program deleted")))
}

#[instrument(skip(conn))]
pub async fn list_program_challenges(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Vec<Challenge>>, ServerError> {
    let challenges = conn
        .interact(move |conn| {
            Program::fetch_by_id(conn, &id).or_not_found("Program")?;
            Ok::<_, ServerError>(Challenge::fetch_by_program(conn, &id)?)
        })
        .await??;
    Ok(Json(challenges))
}

/// The program in the path wins over any `program_id` in the body
#[instrument(skip(conn))]
pub async fn create_program_challenge(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
    JsonBody(mut new): JsonBody<NewChallenge>,
) -> Result<(StatusCode, Json<Challenge>), ServerError> {
    new.validate()?;
    new.program_id = Some(id);
    let challenge = conn
        .interact(move |conn| {
            Program::fetch_by_id(conn, &id).or_not_found("Program")?;
            Ok::<_, ServerError>(Challenge::create(conn, &new)?)
        })
        .await??;
    Ok((StatusCode::CREATED, Json(challenge)))
}

#[instrument(skip(conn))]
pub async fn fetch_program_challenge(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, challenge_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<Challenge>, ServerError> {
    let challenge = conn
        .interact(move |conn| {
            Challenge::fetch_in_program(conn, &id, &challenge_id).or_not_found("Challenge")
        })
        .await??;
    Ok(Json(challenge))
}

#[instrument(skip(conn))]
pub async fn update_program_challenge(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, challenge_id)): PathParams<(Uuid, Uuid)>,
    JsonBody(update): JsonBody<UpdateChallenge>,
) -> Result<Json<Challenge>, ServerError> {
    update.validate()?;
    let challenge = conn
        .interact(move |conn| {
            let mut challenge = Challenge::fetch_in_program(conn, &id, &challenge_id)
                .or_not_found("Challenge")?;
            if update.is_empty() {
                return Ok(challenge);
            }
            update.apply_to(&mut challenge);
            validate_dates(&challenge.start_date, &challenge.end_date)?;
            challenge.save(conn)?;
            Ok::<_, ServerError>(challenge)
        })
        .await??;
    Ok(Json(challenge))
}

#[instrument(skip(conn))]
pub async fn delete_program_challenge(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, challenge_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ServerError> {
    conn.interact(move |conn| {
        Challenge::delete_in_program(conn, &id, &challenge_id).or_not_found("Challenge")
    })
    .await??;
    Ok(Json(MessageResponse::new("Challenge deleted")))
}

/// Sequences of every challenge in the program
#[instrument(skip(conn))]
pub async fn list_program_sequences(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Vec<Sequence>>, ServerError> {
    let sequences = conn
        .interact(move |conn| {
            Program::fetch_by_id(conn, &id).or_not_found("Program")?;
            Ok::<_, ServerError>(Sequence::fetch_by_program(conn, &id)?)
        })
        .await??;
    Ok(Json(sequences))
}

#[instrument(skip(conn))]
pub async fn fetch_program_sequence(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<Sequence>, ServerError> {
    let sequence = conn
        .interact(move |conn| {
            Program::fetch_by_id(conn, &id).or_not_found("Program")?;
            Sequence::fetch_in_program(conn, &id, &sequence_id).or_not_found("Sequence")
        })
        .await??;
    Ok(Json(sequence))
}

/// Workouts of a sequence reached through the program. Writes go through the
/// challenge the sequence belongs to
#[instrument(skip(conn))]
pub async fn list_program_workouts(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<Vec<Workout>>, ServerError> {
    let workouts = conn
        .interact(move |conn| {
            Sequence::fetch_in_program(conn, &id, &sequence_id).or_not_found("Sequence")?;
            Ok::<_, ServerError>(Workout::fetch_by_sequence(conn, &sequence_id)?)
        })
        .await??;
    Ok(Json(workouts))
}
