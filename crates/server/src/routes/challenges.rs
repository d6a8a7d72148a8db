use axum::{
    extract::FromRef,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use deadpool_sqlite::Pool;
use rusqlite::Connection;
use shared::{
    api::{
        error::{RowContext, ServerError, ServerErrorContext},
        payloads::{
            validate_dates, ChallengeTree, MessageResponse, NewChallenge, NewChallengeTree,
            SequenceTree, UpdateChallenge,
        },
        Object,
    },
    model::{Challenge, Exercise, Sequence, ValidateModel, Workout},
    types::Uuid,
};
use tracing::{info, instrument};

use super::workouts::resolve_exercise;
use crate::{db::DatabaseConnection, JsonBody, PathParams, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(Object::Challenges.path(), get(list_challenges).post(create_challenge))
        .route(Object::ChallengesFull.path(), post(create_challenge_tree))
        .route(
            Object::Challenge.path(),
            get(fetch_challenge).patch(update_challenge).delete(delete_challenge),
        )
        .route(Object::ChallengeFull.path(), get(fetch_challenge_tree))
}

#[instrument(skip(conn))]
pub async fn list_challenges(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Vec<Challenge>>, ServerError> {
    let challenges = conn.interact(|conn| Challenge::fetch_all(conn)).await??;
    Ok(Json(challenges))
}

#[instrument(skip(conn))]
pub async fn create_challenge(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    JsonBody(new): JsonBody<NewChallenge>,
) -> Result<(StatusCode, Json<Challenge>), ServerError> {
    new.validate()?;
    let challenge = conn.interact(move |conn| Challenge::create(conn, &new)).await??;
    info!(challenge_id = %challenge.challenge_id, "Created challenge");
    Ok((StatusCode::CREATED, Json(challenge)))
}

#[instrument(skip(conn))]
pub async fn fetch_challenge(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Challenge>, ServerError> {
    let challenge = conn
        .interact(move |conn| Challenge::fetch_by_id(conn, &id).or_not_found("Challenge"))
        .await??;
    Ok(Json(challenge))
}

/// Partial update, fields missing from the body are left as they are
#[instrument(skip(conn))]
pub async fn update_challenge(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
    JsonBody(update): JsonBody<UpdateChallenge>,
) -> Result<Json<Challenge>, ServerError> {
    update.validate()?;
    let challenge = conn
        .interact(move |conn| {
            let mut challenge = Challenge::fetch_by_id(conn, &id).or_not_found("Challenge")?;
            if update.is_empty() {
                return Ok(challenge);
            }
            update.apply_to(&mut challenge);
            // Only one of the dates may have been supplied
            validate_dates(&challenge.start_date, &challenge.end_date)?;
            challenge.save(conn)?;
            Ok::<_, ServerError>(challenge)
        })
        .await??;
    Ok(Json(challenge))
}

/// Sequences, workouts, participants and submissions go with it
#[instrument(skip(conn))]
pub async fn delete_challenge(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    conn.interact(move |conn| Challenge::delete_by_id(conn, &id).or_not_found("Challenge"))
        .await??;
    info!(challenge_id = %id, "Deleted challenge");
    Ok(Json(MessageResponse::new("Challenge deleted")))
}

fn insert_tree(conn: &mut Connection, new: &NewChallengeTree) -> Result<ChallengeTree, ServerError> {
    let tx = conn.transaction()?;
    let catalog = Exercise::fetch_all(&tx)?;

    let challenge = Challenge::create(&tx, &new.challenge)?;
    let mut sequences = Vec::with_capacity(new.sequences.len());
    for (i, new_sequence) in new.sequences.iter().enumerate() {
        let sequence = Sequence::create(&tx, &challenge.challenge_id, &new_sequence.sequence)
            .context(format!("sequences[{i}]"))?;

        let mut workouts = Vec::with_capacity(new_sequence.workouts.len());
        for (j, new_workout) in new_sequence.workouts.iter().enumerate() {
            let exercise_id = resolve_exercise(&catalog, new_workout.exercise_ref())
                .context(format!("sequences[{i}].workouts[{j}]"))?;
            let workout =
                Workout::create(&tx, &sequence.sequence_id, &exercise_id, new_workout)?;
            workouts.push(workout);
        }
        sequences.push(SequenceTree { sequence, workouts });
    }

    tx.commit()?;
    Ok(ChallengeTree { challenge, sequences })
}

/// Create a challenge with all of its sequences and workouts. Either all of it
/// is stored or none of it is
#[instrument(skip(conn, new))]
pub async fn create_challenge_tree(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    JsonBody(new): JsonBody<NewChallengeTree>,
) -> Result<(StatusCode, Json<ChallengeTree>), ServerError> {
    new.validate()?;
    let tree = conn.interact(move |conn| insert_tree(conn, &new)).await??;
    info!(
        challenge_id = %tree.challenge.challenge_id,
        sequences = tree.sequences.len(),
        "Created challenge tree"
    );
    Ok((StatusCode::CREATED, Json(tree)))
}

#[instrument(skip(conn))]
pub async fn fetch_challenge_tree(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<ChallengeTree>, ServerError> {
    let tree = conn
        .interact(move |conn| {
            let challenge = Challenge::fetch_by_id(conn, &id).or_not_found("Challenge")?;
            let sequences = Sequence::fetch_by_challenge(conn, &id)?
                .into_iter()
                .map(|sequence| -> Result<SequenceTree, rusqlite::Error> {
                    let workouts = Workout::fetch_by_sequence(conn, &sequence.sequence_id)?;
                    Ok(SequenceTree { sequence, workouts })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, ServerError>(ChallengeTree { challenge, sequences })
        })
        .await??;
    Ok(Json(tree))
}
