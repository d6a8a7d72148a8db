use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use shared::{api::error::ServerError, model::Profile, other_error, types::Uuid};
use tower_sessions::Session;

/// The authenticated user of a request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserState {
    pub id: Uuid,
    pub username: String,
}

impl From<&Profile> for UserState {
    fn from(profile: &Profile) -> Self {
        Self { id: profile.user_id, username: profile.username.clone() }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct SessionData {
    user_state: Option<UserState>,
}

#[derive(Debug, Clone)]
pub struct SessionValue {
    session: Session,
    data: SessionData,
}

impl SessionValue {
    const SESSION_DATA_KEY: &'static str = "session.data";

    pub fn user_state(&self) -> Option<&UserState> {
        self.data.user_state.as_ref()
    }

    /// Log the profile in. The session id is cycled so an id handed out
    /// before login can't be used to ride the new session
    pub async fn set_user_state(&mut self, profile: &Profile) -> Result<(), ServerError> {
        self.session
            .cycle_id()
            .await
            .map_err(|e| other_error!("Session::cycle_id: {e}"))?;
        self.data.user_state = Some(profile.into());
        Self::update_session(&self.session, &self.data).await
    }

    /// Remove everything from the session and delete it from the store
    pub async fn clear(&mut self) -> Result<(), ServerError> {
        self.data = SessionData::default();
        self.session.flush().await.map_err(|e| other_error!("Session::flush: {e}"))
    }

    async fn update_session(session: &Session, data: &SessionData) -> Result<(), ServerError> {
        session
            .insert(Self::SESSION_DATA_KEY, data.clone())
            .await
            .map_err(|e| other_error!("Session::insert: {e}"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionValue
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(req: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(req, state)
            .await
            .map_err(|(code, message)| ServerError::new(code, message))?;

        let data: SessionData = session
            .get(Self::SESSION_DATA_KEY)
            .await
            .map_err(|e| other_error!("Session::get: {e}"))?
            .unwrap_or_default();

        Ok(Self { session, data })
    }
}

/// Rejects the request with a 401 when nobody is logged in. Put it ahead of
/// body extractors so unauthenticated writes are refused before the body is
/// looked at
#[async_trait]
impl<S> FromRequestParts<S> for UserState
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(req: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionValue::from_request_parts(req, state).await?;
        session.user_state().cloned().ok_or_else(ServerError::unauthorized)
    }
}
