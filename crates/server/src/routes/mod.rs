use axum::{extract::FromRef, Router};
use deadpool_sqlite::Pool;
use shared::api::error::ServerError;

pub mod auth;
pub mod challenges;
pub mod exercises;
pub mod participants;
pub mod ping;
pub mod programs;
pub mod sequences;
pub mod submissions;
pub mod user;
pub mod workouts;

/// Every api route. Session and http layers are added by the caller
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .merge(ping::router())
        .merge(auth::router())
        .merge(user::router())
        .merge(exercises::router())
        .merge(programs::router())
        .merge(challenges::router())
        .merge(sequences::router())
        .merge(workouts::router())
        .merge(participants::router())
        .merge(submissions::router())
        .fallback(not_found)
}

async fn not_found() -> ServerError {
    ServerError::not_found("Not found")
}
