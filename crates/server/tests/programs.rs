mod common;

use axum::http::StatusCode;
use common::{challenge_body, id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn program_crud() {
    let mut app = TestApp::new().await;
    app.register("coach").await;

    let (status, program) = app.post("/api/programs", json!({ "name": "Summer" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let url = format!("/api/programs/{}", id_of(&program, "program_id"));

    let (status, updated) = app.patch(&url, json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!(null));

    let (status, fetched) = app.get(&url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, _) = app.delete(&url).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Program not found");
}

#[tokio::test]
async fn program_challenges_and_sequences() {
    let mut app = TestApp::new().await;
    app.register("coach").await;
    let (_, program) = app.post("/api/programs", json!({ "name": "Summer" })).await;
    let program_id = id_of(&program, "program_id");

    let (status, challenge) = app
        .post(&format!("/api/programs/{program_id}/challenges"), challenge_body("June"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(challenge["program_id"], json!(program_id));
    let challenge_id = id_of(&challenge, "challenge_id");

    // A challenge outside the program isn't reachable through it
    let (_, loose) = app.post("/api/challenges", challenge_body("Loose")).await;
    let (status, _) = app
        .get(&format!("/api/programs/{program_id}/challenges/{}", id_of(&loose, "challenge_id")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post(
        &format!("/api/challenges/{challenge_id}/sequences"),
        json!([{ "duration": 30 }, { "duration": 60 }]),
    )
    .await;
    app.post(&format!("/api/challenges/{}/sequences", id_of(&loose, "challenge_id")), json!([{}]))
        .await;

    let (status, sequences) = app.get(&format!("/api/programs/{program_id}/sequences")).await;
    assert_eq!(status, StatusCode::OK);
    let sequences = sequences.as_array().unwrap();
    assert_eq!(sequences.len(), 2);
    assert!(sequences.iter().all(|s| s["challenge_id"] == json!(challenge_id)));

    let url = format!("/api/programs/{program_id}/challenges/{challenge_id}");
    let (status, updated) = app.patch(&url, json!({ "name": "June ladder" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "June ladder");

    let (_, listed) = app.get(&format!("/api/programs/{program_id}/challenges")).await;
    assert_eq!(listed, json!([updated]));
}

#[tokio::test]
async fn deleting_a_program_keeps_its_challenges() {
    let mut app = TestApp::new().await;
    app.register("coach").await;
    let (_, program) = app.post("/api/programs", json!({})).await;
    let program_id = id_of(&program, "program_id");
    let (_, challenge) = app
        .post(&format!("/api/programs/{program_id}/challenges"), challenge_body("June"))
        .await;

    app.delete(&format!("/api/programs/{program_id}")).await;

    let (status, challenge) =
        app.get(&format!("/api/challenges/{}", id_of(&challenge, "challenge_id"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(challenge["program_id"], json!(null));
}

#[tokio::test]
async fn missing_program_is_not_found() {
    let mut app = TestApp::new().await;
    app.register("coach").await;
    let missing = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    let (status, _) = app
        .post(&format!("/api/programs/{missing}/challenges"), challenge_body("June"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/programs/{missing}/sequences")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn program_sequence_and_workouts() {
    let mut app = TestApp::new().await;
    app.register("coach").await;
    let (_, program) = app.post("/api/programs", json!({ "name": "Summer" })).await;
    let program_id = id_of(&program, "program_id");
    let (_, challenge) = app
        .post(&format!("/api/programs/{program_id}/challenges"), challenge_body("June"))
        .await;
    let challenge_id = id_of(&challenge, "challenge_id");

    let (_, sequences) =
        app.post(&format!("/api/challenges/{challenge_id}/sequences"), json!([{}])).await;
    let sequence_id = id_of(&sequences[0], "sequence_id");
    let (status, _) = app
        .post(
            &format!("/api/challenges/{challenge_id}/sequences/{sequence_id}/workouts"),
            json!([{ "exercise_name": "Squat", "reps": 15 }, { "exercise_name": "Dip", "reps": 8 }]),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let url = format!("/api/programs/{program_id}/sequences/{sequence_id}");
    let (status, sequence) = app.get(&url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sequence, sequences[0]);

    let (status, workouts) = app.get(&format!("{url}/workouts")).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<_> =
        workouts.as_array().unwrap().iter().map(|w| w["workout_order"].clone()).collect();
    assert_eq!(orders, vec![json!(1), json!(2)]);

    // Not reachable through another program
    let (_, other) = app.post("/api/programs", json!({})).await;
    let (status, body) = app
        .get(&format!("/api/programs/{}/sequences/{sequence_id}", id_of(&other, "program_id")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sequence not found");
}
