use axum::{extract::FromRef, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{error::ServerError, Object},
    model::Exercise,
};
use tracing::instrument;

use crate::db::DatabaseConnection;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new().route(Object::Exercises.path(), get(list_exercises))
}

#[instrument(skip(conn))]
pub async fn list_exercises(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Vec<Exercise>>, ServerError> {
    let exercises = conn.interact(|conn| Exercise::fetch_all(conn)).await??;
    Ok(Json(exercises))
}
