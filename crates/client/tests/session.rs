use common::TestServer;
use http::StatusCode;
use shared::api::payloads::{LoginRequest, RegisterRequest};

mod common;

fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_owned(),
        password: "correct horse".to_owned(),
        avatar_url: Some("https://example.com/a.png".to_owned()),
    }
}

#[tokio::test]
async fn test_register_then_fetch_session() {
    let server = TestServer::spawn().await;
    let client = server.client();
    client.ping().await.unwrap();

    let registered = client.register(&register_request("sprinter")).await.unwrap();
    assert_eq!(registered.username, "sprinter");

    let fetched = client.fetch_session().await.unwrap();
    assert_eq!(fetched.user_id, registered.user_id);
    assert_eq!(fetched.avatar_url.as_deref(), Some("https://example.com/a.png"));
}

#[tokio::test]
async fn test_login_logout() {
    let server = TestServer::spawn().await;
    let registered = server.client().register(&register_request("sprinter")).await.unwrap();

    let client = server.client();
    let err = client.fetch_session().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let wrong = LoginRequest { username: "sprinter".to_owned(), password: "wrong horse".to_owned() };
    let err = client.login(&wrong).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.server_message(), Some("Invalid username or password"));

    let right =
        LoginRequest { username: "sprinter".to_owned(), password: "correct horse".to_owned() };
    let session = client.login(&right).await.unwrap();
    assert_eq!(session.user_id, registered.user_id);
    assert_eq!(client.fetch_session().await.unwrap().user_id, registered.user_id);

    client.logout().await.unwrap();
    let err = client.fetch_session().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn test_taken_username() {
    let server = TestServer::spawn().await;
    server.client().register(&register_request("sprinter")).await.unwrap();

    let err = server.client().register(&register_request("sprinter")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert_eq!(err.server_message(), Some("Username is already taken"));
}
