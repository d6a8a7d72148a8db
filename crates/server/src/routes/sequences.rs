use axum::{extract::FromRef, http::StatusCode, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{RowContext, ServerError},
        payloads::{MessageResponse, NewSequence, UpdateSequence},
        Object,
    },
    model::{Challenge, Sequence, ValidateModel},
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
        .route(Object::Sequences.path(), get(list_sequences).post(create_sequences))
        .route(
            Object::Sequence.path(),
            get(fetch_sequence).put(update_sequence).delete(delete_sequence),
        )
}

#[instrument(skip(conn))]
pub async fn list_sequences(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Vec<Sequence>>, ServerError> {
    let sequences = conn
        .interact(move |conn| {
            Challenge::fetch_by_id(conn, &id).or_not_found("Challenge")?;
            Ok::<_, ServerError>(Sequence::fetch_by_challenge(conn, &id)?)
        })
        .await??;
    Ok(Json(sequences))
}

/// Bulk create, all or nothing
#[instrument(skip(conn, new))]
pub async fn create_sequences(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
    JsonBody(new): JsonBody<Vec<NewSequence>>,
) -> Result<(StatusCode, Json<Vec<Sequence>>), ServerError> {
    new.validate()?;
    let sequences = conn
        .interact(move |conn| {
            let tx = conn.transaction()?;
            Challenge::fetch_by_id(&tx, &id).or_not_found("Challenge")?;

            let sequences = new
                .iter()
                .map(|sequence| Sequence::create(&tx, &id, sequence))
                .collect::<Result<Vec<_>, _>>()?;

            tx.commit()?;
            Ok::<_, ServerError>(sequences)
        })
        .await??;
    Ok((StatusCode::CREATED, Json(sequences)))
}

#[instrument(skip(conn))]
pub async fn fetch_sequence(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<Sequence>, ServerError> {
    let sequence = conn
        .interact(move |conn| {
            Sequence::fetch_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")
        })
        .await??;
    Ok(Json(sequence))
}

#[instrument(skip(conn))]
pub async fn update_sequence(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
    JsonBody(update): JsonBody<UpdateSequence>,
) -> Result<Json<Sequence>, ServerError> {
    update.validate()?;
    let sequence = conn
        .interact(move |conn| {
            let mut sequence =
                Sequence::fetch_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")?;
            if update.is_empty() {
                return Ok(sequence);
            }
            update.apply_to(&mut sequence);
            sequence.save(conn)?;
            Ok::<_, ServerError>(sequence)
        })
        .await??;
    Ok(Json(sequence))
}

#[instrument(skip(conn))]
pub async fn delete_sequence(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ServerError> {
    conn.interact(move |conn| {
        Sequence::delete_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")
    })
    .await??;
    Ok(Json(MessageResponse::new("Sequence deleted")))
}
