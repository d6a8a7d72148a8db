use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::FromRef, http::StatusCode, routing::post, Json, Router};
use deadpool_sqlite::Pool;
use exemplar::Model;
use shared::{
    api::{
        error::ServerError,
        payloads::{LoginRequest, MessageResponse, RegisterRequest},
        Auth,
    },
    model::{Credential, Profile, ValidateModel},
    other_error,
};
use tracing::{info, instrument};

use crate::{db::DatabaseConnection, JsonBody, SessionValue};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(Auth::Register.path(), post(register))
        .route(Auth::Login.path(), post(login))
        .route(Auth::Logout.path(), post(logout))
}

fn invalid_login() -> ServerError {
    ServerError::new(StatusCode::UNAUTHORIZED, "Invalid username or password")
}

/// Argon2 is deliberately slow so it runs off the async workers
async fn hash_password(password: String) -> Result<String, ServerError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| other_error!("Failed to hash password: {e}"))
    })
    .await
    .map_err(|e| other_error!("Password hashing task failed: {e}"))?
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, ServerError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash)
            .map_err(|e| other_error!("Stored password hash is invalid: {e}"))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    })
    .await
    .map_err(|e| other_error!("Password verification task failed: {e}"))?
}

/// Create a profile and log it in
#[instrument(skip(conn, session, request), fields(username = %request.username))]
pub async fn register(
    DatabaseConnection(conn): DatabaseConnection,
    mut session: SessionValue,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<Profile>), ServerError> {
    request.validate()?;

    let password_hash = hash_password(request.password).await?;
    let profile = Profile::new(&request.username, request.avatar_url);

    let profile = conn
        .interact(move |conn| {
            let tx = conn.transaction()?;

            match Profile::fetch_by_username(&tx, &profile.username) {
                Ok(_) => return Err(ServerError::conflict("Username is already taken")),
                Err(rusqlite::Error::QueryReturnedNoRows) => {},
                Err(e) => return Err(e.into()),
            }

            profile.insert(&tx)?;
            Credential { user_id: profile.user_id, password_hash }.insert(&tx)?;

            tx.commit()?;
            Ok(profile)
        })
        .await??;

    session.set_user_state(&profile).await?;
    info!(user_id = %profile.user_id, "Registered");

    Ok((StatusCode::CREATED, Json(profile)))
}

#[instrument(skip(conn, session, request), fields(username = %request.username))]
pub async fn login(
    DatabaseConnection(conn): DatabaseConnection,
    mut session: SessionValue,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Profile>, ServerError> {
    request.validate()?;

    let username = request.username.clone();
    let found = conn
        .interact(move |conn| {
            let profile = match Profile::fetch_by_username(conn, &username) {
                Ok(profile) => profile,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e),
            };
            let credential = Credential::fetch_by_user_id(conn, &profile.user_id)?;
            Ok(Some((profile, credential)))
        })
        .await??;

    let (profile, credential) = found.ok_or_else(invalid_login)?;
    if !verify_password(request.password, credential.password_hash).await? {
        return Err(invalid_login());
    }

    session.set_user_state(&profile).await?;
    info!(user_id = %profile.user_id, "Logged in");

    Ok(Json(profile))
}

#[instrument(skip(session))]
pub async fn logout(mut session: SessionValue) -> Result<Json<MessageResponse>, ServerError> {
    session.clear().await?;
    Ok(Json(MessageResponse::new("Logged out")))
}
