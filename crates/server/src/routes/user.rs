use axum::{extract::FromRef, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{RowContext, ServerError},
        Object,
    },
    model::Profile,
};
use tracing::instrument;

use crate::{db::DatabaseConnection, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new().route(Object::User.path(), get(fetch_user))
}

/// Profile of the logged in user
#[instrument(skip(conn))]
pub async fn fetch_user(
    user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Profile>, ServerError> {
    let profile = conn
        .interact(move |conn| Profile::fetch_by_id(conn, &user.id).or_not_found("User"))
        .await??;
    Ok(Json(profile))
}
