use axum::{routing::get, Json, Router};
use shared::api::Object;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(Object::Ping.path(), get(ping))
}

pub async fn ping() -> Json<()> {
    Json(())
}
