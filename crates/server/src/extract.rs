//! Json and Path extractors that reject with the same `{ "error": .. }` body as
//! every other failure

use axum::extract::{FromRequest, FromRequestParts};
use shared::api::error::ServerError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct PathParams<T>(pub T);
