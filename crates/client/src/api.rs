use std::{any::type_name, fmt::Debug};

use http::header::{ACCEPT, CONTENT_TYPE};
use mime::{Mime, APPLICATION_JSON};
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    api::{
        error::ErrorBody,
        payloads::{
            ChallengeTree, LoginRequest, MessageResponse, NewChallenge, NewChallengeTree,
            NewChallengeWorkout, NewProgram, NewSequence, NewSubmission, NewWorkout,
            RegisterRequest, UpdateChallenge, UpdateSequence, UpdateWorkout,
        },
        Auth, Object,
    },
    model::{
        Challenge, Exercise, Participant, Profile, Program, Sequence, Submission, ValidateModel,
        Workout,
    },
    types::Uuid,
};
use tracing::{debug, warn};

use crate::{ClientError, UserSession};

/// Talks json to a yojuro server. Keeps the session cookie between calls so
/// everything after `login` or `register` is authenticated
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

fn content_type(response: &Response) -> Option<String> {
    response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|v| v.parse::<Mime>().ok())
        .map_or(false, |m| m.essence_str() == APPLICATION_JSON.essence_str())
}

impl ApiClient {
    /// `base_url` is the scheme and authority, e.g. `http://localhost:8080`
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn json_request<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ClientError>
    where
        B: Serialize + Debug + ValidateModel + ?Sized,
        R: DeserializeOwned,
    {
        debug!("json_request({method}, {path}, body type: {})", type_name::<B>());

        // Check the body is valid before bothering the server with it
        if let Some(body) = body {
            body.validate()?;
        }

        let url = format!("{}{path}", self.base_url);
        let mut builder =
            self.http.request(method.clone(), &url).header(ACCEPT, APPLICATION_JSON.essence_str());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!("json_request::request::send");
        let response = builder.send().await?;
        let status = response.status();

        // Check the content-type is what we're expecting
        let content_type = content_type(&response);
        if !is_json(content_type.as_deref()) {
            let body = response.text().await?;
            warn!(%status, ?content_type, "Non-json response from {method} {path}");
            if !status.is_success() {
                return Err(ClientError::Server { status, message: body });
            }
            return Err(ClientError::WrongContentType {
                expected: APPLICATION_JSON.to_string(),
                got: content_type,
                body,
            });
        }

        // Deserialize the error type
        if !status.is_success() {
            let ErrorBody { error } = response.json::<ErrorBody>().await?;
            debug!(%status, "json_request::return Err({error})");
            return Err(ClientError::Server { status, message: error });
        }

        let payload = response.json::<R>().await?;
        debug!("json_request::return Ok::<{}>", type_name::<R>());
        Ok(payload)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        self.json_request::<(), R>(Method::GET, path, None).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Debug + ValidateModel + ?Sized,
        R: DeserializeOwned,
    {
        self.json_request(Method::POST, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<MessageResponse, ClientError> {
        self.json_request::<(), _>(Method::DELETE, path, None).await
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        self.get(Object::Ping.path()).await
    }

    /// Create an account. The server logs it straight in
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserSession, ClientError> {
        let profile: Profile = self.post(Auth::Register.path(), request).await?;
        Ok(profile.into())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<UserSession, ClientError> {
        let profile: Profile = self.post(Auth::Login.path(), request).await?;
        Ok(profile.into())
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        self.json_request::<(), _>(Method::POST, Auth::Logout.path(), None).await
    }

    /// Re-read the user behind the current session cookie
    pub async fn fetch_session(&self) -> Result<UserSession, ClientError> {
        let profile: Profile = self.get(Object::User.path()).await?;
        Ok(profile.into())
    }

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>, ClientError> {
        self.get(Object::Exercises.path()).await
    }

    pub async fn list_programs(&self) -> Result<Vec<Program>, ClientError> {
        self.get(Object::Programs.path()).await
    }

    pub async fn create_program(&self, new: &NewProgram) -> Result<Program, ClientError> {
        self.post(Object::Programs.path(), new).await
    }

    pub async fn delete_program(&self, id: &Uuid) -> Result<MessageResponse, ClientError> {
        self.delete(&Object::Program.url(&[id])).await
    }

    pub async fn list_challenges(&self) -> Result<Vec<Challenge>, ClientError> {
        self.get(Object::Challenges.path()).await
    }

    pub async fn create_challenge(&self, new: &NewChallenge) -> Result<Challenge, ClientError> {
        self.post(Object::Challenges.path(), new).await
    }

    pub async fn fetch_challenge(&self, id: &Uuid) -> Result<Challenge, ClientError> {
        self.get(&Object::Challenge.url(&[id])).await
    }

    pub async fn update_challenge(
        &self,
        id: &Uuid,
        update: &UpdateChallenge,
    ) -> Result<Challenge, ClientError> {
        self.json_request(Method::PATCH, &Object::Challenge.url(&[id]), Some(update)).await
    }

    pub async fn delete_challenge(&self, id: &Uuid) -> Result<MessageResponse, ClientError> {
        self.delete(&Object::Challenge.url(&[id])).await
    }

    /// Create a challenge with its sequences and workouts in one transaction
    pub async fn create_challenge_tree(
        &self,
        tree: &NewChallengeTree,
    ) -> Result<ChallengeTree, ClientError> {
        self.post(Object::ChallengesFull.path(), tree).await
    }

    pub async fn fetch_challenge_tree(&self, id: &Uuid) -> Result<ChallengeTree, ClientError> {
        self.get(&Object::ChallengeFull.url(&[id])).await
    }

    pub async fn list_sequences(&self, challenge_id: &Uuid) -> Result<Vec<Sequence>, ClientError> {
        self.get(&Object::Sequences.url(&[challenge_id])).await
    }

    /// Bulk create, the server adds all of them or none
    pub async fn create_sequences(
        &self,
        challenge_id: &Uuid,
        new: &[NewSequence],
    ) -> Result<Vec<Sequence>, ClientError> {
        self.post(&Object::Sequences.url(&[challenge_id]), new).await
    }

    pub async fn update_sequence(
        &self,
        challenge_id: &Uuid,
        sequence_id: &Uuid,
        update: &UpdateSequence,
    ) -> Result<Sequence, ClientError> {
        let path = Object::Sequence.url(&[challenge_id, sequence_id]);
        self.json_request(Method::PUT, &path, Some(update)).await
    }

    pub async fn list_workouts(
        &self,
        challenge_id: &Uuid,
        sequence_id: &Uuid,
    ) -> Result<Vec<Workout>, ClientError> {
        self.get(&Object::Workouts.url(&[challenge_id, sequence_id])).await
    }

    pub async fn create_workouts(
        &self,
        challenge_id: &Uuid,
        sequence_id: &Uuid,
        new: &[NewWorkout],
    ) -> Result<Vec<Workout>, ClientError> {
        self.post(&Object::Workouts.url(&[challenge_id, sequence_id]), new).await
    }

    /// Add one workout to a sequence of the challenge, naming the exercise
    pub async fn create_challenge_workout(
        &self,
        challenge_id: &Uuid,
        new: &NewChallengeWorkout,
    ) -> Result<Workout, ClientError> {
        self.post(&Object::ChallengeWorkouts.url(&[challenge_id]), new).await
    }

    pub async fn update_workout(
        &self,
        challenge_id: &Uuid,
        sequence_id: &Uuid,
        workout_id: &Uuid,
        update: &UpdateWorkout,
    ) -> Result<Workout, ClientError> {
        let path = Object::Workout.url(&[challenge_id, sequence_id, workout_id]);
        self.json_request(Method::PUT, &path, Some(update)).await
    }

    pub async fn join_challenge(&self, challenge_id: &Uuid) -> Result<Participant, ClientError> {
        self.json_request::<(), _>(
            Method::POST,
            &Object::ChallengeParticipants.url(&[challenge_id]),
            None,
        )
        .await
    }

    pub async fn list_participants(
        &self,
        challenge_id: &Uuid,
    ) -> Result<Vec<Participant>, ClientError> {
        self.get(&Object::ChallengeParticipants.url(&[challenge_id])).await
    }

    pub async fn create_submission(
        &self,
        challenge_id: &Uuid,
        sequence_id: &Uuid,
        workout_id: &Uuid,
        new: &NewSubmission,
    ) -> Result<Submission, ClientError> {
        self.post(&Object::Submissions.url(&[challenge_id, sequence_id, workout_id]), new).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_json() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(!is_json(Some("text/plain; charset=utf-8")));
        assert!(!is_json(None));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected_before_sending() {
        // Nothing listens here, a sent request would be a transport error
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let request = RegisterRequest {
            username: "x".to_owned(),
            password: "short".to_owned(),
            avatar_url: None,
        };
        let err = client.register(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
    }
}
