mod common;

use axum::http::{Method, StatusCode};
use common::{challenge_body, id_of, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn unauthenticated_writes_are_rejected() {
    let mut app = TestApp::new().await;

    let (status, body) = app.post("/api/challenges", challenge_body("Plank month")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let (status, _) = app.post("/api/programs", json!({ "name": "Summer" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing was written
    let (status, challenges) = app.get("/api/challenges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(challenges, json!([]));
    let (_, programs) = app.get("/api/programs").await;
    assert_eq!(programs, json!([]));
}

#[tokio::test]
async fn unauthenticated_updates_leave_rows_alone() {
    let mut app = TestApp::new().await;
    app.register("owner").await;
    let (_, challenge) = app.post("/api/challenges", challenge_body("Plank month")).await;
    let url = format!("/api/challenges/{}", id_of(&challenge, "challenge_id"));

    let mut anonymous = app.anonymous();
    let (status, _) = anonymous.patch(&url, json!({ "name": "Hijacked" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = anonymous.delete(&url).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, fetched) = anonymous.get(&url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, challenge);
}

/// Everything a logged in user can see of a program holding one challenge
async fn snapshot(app: &mut TestApp, program_id: &str, challenge_id: &str) -> Vec<Value> {
    let mut rows = Vec::new();
    for url in [
        "/api/challenges".to_owned(),
        "/api/programs".to_owned(),
        format!("/api/programs/{program_id}/challenges"),
        format!("/api/challenges/{challenge_id}/full"),
        format!("/api/challenges/{challenge_id}/participants"),
    ] {
        let (status, body) = app.get(&url).await;
        assert_eq!(status, StatusCode::OK, "{url}");
        rows.push(body);
    }
    rows
}

#[tokio::test]
async fn every_write_needs_a_session() {
    let mut app = TestApp::new().await;
    app.register("owner").await;
    let (_, program) = app.post("/api/programs", json!({ "name": "Summer" })).await;
    let program_id = id_of(&program, "program_id");

    let mut body = challenge_body("Squat streak");
    body["program_id"] = json!(program_id);
    body["sequences"] = json!([{ "workouts": [{ "exercise_name": "Squat", "reps": 30 }] }]);
    let (status, tree) = app.post("/api/challenges/full", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{tree}");
    let challenge_id = id_of(&tree, "challenge_id");
    let sequence_id = id_of(&tree["sequences"][0], "sequence_id");
    let workout_id = id_of(&tree["sequences"][0]["workouts"][0], "workout_id");
    app.post(&format!("/api/challenges/{challenge_id}/participants"), json!(null)).await;

    let challenge_url = format!("/api/challenges/{challenge_id}");
    let sequences_url = format!("{challenge_url}/sequences");
    let sequence_url = format!("{sequences_url}/{sequence_id}");
    let workouts_url = format!("{sequence_url}/workouts");
    let workout_url = format!("{workouts_url}/{workout_id}");
    let program_url = format!("/api/programs/{program_id}");
    let program_challenges_url = format!("{program_url}/challenges");
    let program_challenge_url = format!("{program_challenges_url}/{challenge_id}");

    let writes = [
        (Method::POST, "/api/challenges/full".to_owned(), Some(body)),
        (Method::POST, sequences_url, Some(json!([{ "duration": 30 }]))),
        (Method::PUT, sequence_url.clone(), Some(json!({ "duration": 5 }))),
        (Method::DELETE, sequence_url, None),
        (Method::POST, workouts_url, Some(json!([{ "exercise_name": "Dip", "reps": 3 }]))),
        (Method::PUT, workout_url.clone(), Some(json!({ "reps": 99 }))),
        (Method::DELETE, workout_url, None),
        (
            Method::POST,
            format!("{challenge_url}/workouts"),
            Some(json!({ "sequence_id": sequence_id, "exercise_name": "Dip", "reps": 3 })),
        ),
        (Method::POST, format!("{challenge_url}/participants"), Some(json!(null))),
        (Method::DELETE, format!("{challenge_url}/participants"), None),
        (Method::PATCH, program_url.clone(), Some(json!({ "name": "Hijacked" }))),
        (Method::DELETE, program_url, None),
        (Method::POST, program_challenges_url, Some(challenge_body("Intruder"))),
        (Method::PATCH, program_challenge_url.clone(), Some(json!({ "name": "Hijacked" }))),
        (Method::DELETE, program_challenge_url, None),
    ];

    let before = snapshot(&mut app, &program_id, &challenge_id).await;
    let mut anonymous = app.anonymous();
    for (method, url, body) in writes {
        let (status, response) = anonymous.request(method.clone(), &url, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {url}");
        assert_eq!(response, json!({ "error": "Unauthorized" }), "{method} {url}");
    }
    assert_eq!(snapshot(&mut app, &program_id, &challenge_id).await, before);
}

#[tokio::test]
async fn patch_trims_the_name() {
    let mut app = TestApp::new().await;
    app.register("runner").await;
    let (_, created) = app.post("/api/challenges", challenge_body("  Plank month ")).await;
    assert_eq!(created["name"], "Plank month");
    let url = format!("/api/challenges/{}", id_of(&created, "challenge_id"));

    let (status, updated) = app.patch(&url, json!({ "name": "  Plank  " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Plank");

    // An empty body writes nothing
    let (status, unchanged) = app.patch(&url, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn created_challenge_can_be_fetched() {
    let mut app = TestApp::new().await;
    app.register("runner").await;

    let (status, created) = app.post("/api/challenges", challenge_body("Plank month")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Plank month");
    assert_eq!(created["status"], "draft");
    assert_eq!(created["program_id"], json!(null));

    let (status, fetched) =
        app.get(&format!("/api/challenges/{}", id_of(&created, "challenge_id"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn invalid_challenge_is_bad_request() {
    let mut app = TestApp::new().await;
    app.register("runner").await;

    let mut body = challenge_body("ab");
    body["entry_fee"] = json!(-3);
    let (status, err) = app.post("/api/challenges", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("entry_fee"));

    let (status, err) = app.post("/api/challenges", json!({ "name": "Missing dates" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn patch_only_changes_supplied_fields() {
    let mut app = TestApp::new().await;
    app.register("runner").await;
    let (_, created) = app.post("/api/challenges", challenge_body("Plank month")).await;
    let url = format!("/api/challenges/{}", id_of(&created, "challenge_id"));

    let (status, updated) =
        app.patch(&url, json!({ "entry_fee": 10.0, "status": "published" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["entry_fee"], 10.0);
    assert_eq!(updated["status"], "published");
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["description"], created["description"]);
    assert_eq!(updated["start_date"], created["start_date"]);

    // Explicit null clears the description
    let (_, updated) = app.patch(&url, json!({ "description": null })).await;
    assert_eq!(updated["description"], json!(null));
    assert_eq!(updated["entry_fee"], 10.0);

    // An end date moved before the stored start date is refused
    let (status, _) = app.patch(&url, json!({ "end_date": "2024-05-01T00:00:00" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_challenge_is_gone() {
    let mut app = TestApp::new().await;
    app.register("runner").await;
    let (_, created) = app.post("/api/challenges", challenge_body("Plank month")).await;
    let url = format!("/api/challenges/{}", id_of(&created, "challenge_id"));

    let (status, body) = app.delete(&url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Challenge deleted" }));

    let (status, body) = app.get(&url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Challenge not found" }));

    let (status, _) = app.delete(&url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_and_unknown_routes() {
    let mut app = TestApp::new().await;

    let (status, body) = app.get("/api/challenges/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.get("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = app.get("/api/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(null));
}

#[tokio::test]
async fn full_tree_is_created_in_one_go() {
    let mut app = TestApp::new().await;
    app.register("runner").await;

    let mut body = challenge_body("Push up ladder");
    body["sequences"] = json!([
        {
            "sequence_dates": ["2024-06-01", "2024-06-02"],
            "duration": 600,
            "workouts": [
                { "exercise_name": "Push-up", "reps": 10 },
                { "exercise_name": "Plank", "reps": 1, "duration": 60 }
            ]
        },
        { "workouts": [ { "exercise_name": "Squat", "reps": 20, "pause_duration": 30 } ] }
    ]);

    let (status, tree) = app.post("/api/challenges/full", body).await;
    assert_eq!(status, StatusCode::CREATED, "{tree}");
    let challenge_id = id_of(&tree, "challenge_id");

    let sequences = tree["sequences"].as_array().unwrap();
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[1]["duration"], json!(null));
    for sequence in sequences {
        assert_eq!(id_of(sequence, "challenge_id"), challenge_id);
        for (i, workout) in sequence["workouts"].as_array().unwrap().iter().enumerate() {
            assert_eq!(workout["sequence_id"], sequence["sequence_id"]);
            assert_eq!(workout["workout_order"], json!(i + 1));
        }
    }

    let (status, fetched) = app.get(&format!("/api/challenges/{challenge_id}/full")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, tree);
}

#[tokio::test]
async fn failed_full_tree_leaves_nothing_behind() {
    let mut app = TestApp::new().await;
    app.register("runner").await;

    let mut body = challenge_body("Push up ladder");
    body["sequences"] = json!([
        { "workouts": [ { "exercise_name": "Push-up", "reps": 10 } ] },
        { "workouts": [ { "exercise_name": "Handstand walk", "reps": 3 } ] }
    ]);

    let (status, err) = app.post("/api/challenges/full", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("Invalid exercise name"));

    let (_, challenges) = app.get("/api/challenges").await;
    assert_eq!(challenges, json!([]));
}
