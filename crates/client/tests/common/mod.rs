use chrono::NaiveDate;
use client::{ApiClient, ChallengeForm};
use server::{build_router, build_state, cli::Cli};
use shared::api::payloads::{NewChallenge, NewSequence, NewWorkout, RegisterRequest};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

/// A server on an ephemeral port over a fresh database. Stops when dropped
pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
    _dir: TempDir,
}

impl TestServer {
    pub async fn spawn() -> Self {
        shared::configure_tracing_once();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let (state, store) = build_state(Cli::with_database(path.to_str().unwrap())).await.unwrap();
        let router = build_router(state, store).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, handle, _dir: dir }
    }

    /// A client with its own cookie jar
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    /// A client that has registered and is logged in
    pub async fn logged_in(&self, username: &str) -> ApiClient {
        let client = self.client();
        client
            .register(&RegisterRequest {
                username: username.to_owned(),
                password: "correct horse".to_owned(),
                avatar_url: None,
            })
            .await
            .unwrap();
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn workout(name: &str, reps: u32) -> NewWorkout {
    NewWorkout { exercise_name: Some(name.to_owned()), reps, ..Default::default() }
}

/// Two sequences: push-ups then squats, and a plank then a lunge
pub fn two_sequence_form(name: &str) -> ChallengeForm {
    let day = |d| NaiveDate::from_ymd_opt(2024, 10, d).unwrap().and_hms_opt(6, 30, 0).unwrap();
    let mut form = ChallengeForm::new(NewChallenge {
        name: name.to_owned(),
        description: Some("Before breakfast".to_owned()),
        start_date: day(1),
        end_date: day(31),
        entry_fee: 10.0,
        status: None,
        program_id: None,
    });

    let first = form.add_sequence(NewSequence { duration: Some(600), ..Default::default() });
    form.add_workout(first, workout("Push-up", 20)).unwrap();
    form.add_workout(first, workout("Squat", 30)).unwrap();

    let second = form.add_sequence(NewSequence::default());
    form.add_workout(second, workout("Plank", 1)).unwrap();
    form.add_workout(second, workout("Lunge", 12)).unwrap();

    form
}
