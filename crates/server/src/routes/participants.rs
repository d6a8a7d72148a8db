use axum::{extract::FromRef, http::StatusCode, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{RowContext, ServerError},
        payloads::MessageResponse,
        Object,
    },
    model::{Challenge, Participant},
    types::Uuid,
};
use tracing::{info, instrument};

use crate::{db::DatabaseConnection, PathParams, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new().route(
        Object::ChallengeParticipants.path(),
        get(list_participants).post(join_challenge).delete(withdraw_from_challenge),
    )
}

#[instrument(skip(conn))]
pub async fn list_participants(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Vec<Participant>>, ServerError> {
    let participants = conn
        .interact(move |conn| {
            Challenge::fetch_by_id(conn, &id).or_not_found("Challenge")?;
            Ok::<_, ServerError>(Participant::fetch_by_challenge(conn, &id)?)
        })
        .await??;
    Ok(Json(participants))
}

/// Join the caller to the challenge. Joining twice is a conflict
#[instrument(skip(conn))]
pub async fn join_challenge(
    user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<(StatusCode, Json<Participant>), ServerError> {
    let participant = conn
        .interact(move |conn| {
            Challenge::fetch_by_id(conn, &id).or_not_found("Challenge")?;
            Ok::<_, ServerError>(Participant::join(conn, &id, &user.id)?)
        })
        .await??;
    info!(challenge_id = %id, user_id = %participant.user_id, "Joined challenge");
    Ok((StatusCode::CREATED, Json(participant)))
}

#[instrument(skip(conn))]
pub async fn withdraw_from_challenge(
    user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    conn.interact(move |conn| Participant::withdraw(conn, &id, &user.id).or_not_found("Participant"))
        .await??;
    Ok(Json(MessageResponse::new("Withdrawn from challenge")))
}
