use axum::{extract::FromRef, http::StatusCode, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use rusqlite::Connection;
use shared::{
    api::{
        error::{RowContext, ServerError},
        payloads::NewSubmission,
        Object,
    },
    model::{Participant, Sequence, Submission, ValidateModel, Workout},
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
        .route(Object::Submissions.path(), get(list_submissions).post(create_submission))
}

/// Walk the path down to the workout and check the caller takes part in the
/// challenge
fn check_participant(
    conn: &Connection,
    (challenge_id, sequence_id, workout_id): &(Uuid, Uuid, Uuid),
    user: &UserState,
) -> Result<(), ServerError> {
    Sequence::fetch_in_challenge(conn, challenge_id, sequence_id).or_not_found("Sequence")?;
    Workout::fetch_in_sequence(conn, sequence_id, workout_id).or_not_found("Workout")?;
    match Participant::fetch_for_user(conn, challenge_id, &user.id) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(ServerError::forbidden("Not a participant of this challenge"))
        },
        Err(e) => Err(e.into()),
    }
}

/// The caller's own submissions for a workout
#[instrument(skip(conn))]
pub async fn list_submissions(
    user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(ids): PathParams<(Uuid, Uuid, Uuid)>,
) -> Result<Json<Vec<Submission>>, ServerError> {
    let submissions = conn
        .interact(move |conn| {
            check_participant(conn, &ids, &user)?;
            Ok::<_, ServerError>(Submission::fetch_for_user(conn, &ids.2, &user.id)?)
        })
        .await??;
    Ok(Json(submissions))
}

#[instrument(skip(conn))]
pub async fn create_submission(
    user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(ids): PathParams<(Uuid, Uuid, Uuid)>,
    JsonBody(new): JsonBody<NewSubmission>,
) -> Result<(StatusCode, Json<Submission>), ServerError> {
    new.validate()?;
    let submission = conn
        .interact(move |conn| {
            check_participant(conn, &ids, &user)?;
            Ok::<_, ServerError>(Submission::create(conn, &ids.2, &user.id, &new)?)
        })
        .await??;
    Ok((StatusCode::CREATED, Json(submission)))
}
