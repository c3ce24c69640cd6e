// tests/api_tests.rs

use std::sync::Arc;

use semiquiz::{
    config::Config,
    models::question::Question,
    routes,
    services::{bank::QuestionBank, explainer::DisabledExplainer},
    state::AppState,
};
use serde_json::{Value, json};

/// Three topic-1 questions and one topic-2 question, all answered by choice 1.
fn test_bank() -> QuestionBank {
    let question = |topic: u32, text: &str| Question {
        topic,
        text: text.to_string(),
        choices: vec!["Vrai".to_string(), "Faux".to_string(), "Je ne sais pas".to_string()],
        correct_index: 1,
    };
    QuestionBank::new(vec![
        question(1, "Question A"),
        question(1, "Question B"),
        question(1, "Question C"),
        question(2, "Question D"),
    ])
    .expect("test bank is valid")
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Create test configuration and state (explanations disabled)
    let config = Config {
        rust_log: "error".to_string(),
        ..Config::default()
    };
    let state = AppState::new(test_bank(), Arc::new(DisabledExplainer), config);

    // 2. Create the router with the app state
    let app = routes::create_router(state);

    // 3. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn start_session(client: &reqwest::Client, address: &str, topic: Value) -> Value {
    let response = client
        .post(format!("{}/api/sessions", address))
        .json(&json!({ "topic": topic }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Failed to parse session json")
}

async fn answer(client: &reqwest::Client, address: &str, id: &str, choice: usize) -> reqwest::Response {
    client
        .post(format!("{}/api/sessions/{}/answer", address, id))
        .json(&json!({ "choice": choice }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn topics_are_listed() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/topics", address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 4);
    assert_eq!(
        body["topics"],
        json!([
            { "topic": 1, "question_count": 3 },
            { "topic": 2, "question_count": 1 }
        ])
    );
}

#[tokio::test]
async fn full_quiz_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // 1. Start a run over topic 1
    let session = start_session(&client, &address, json!(1)).await;
    let id = session["session_id"].as_str().expect("session id").to_string();
    assert_eq!(session["phase"], "answering");
    assert_eq!(session["total"], 3);
    assert_eq!(session["position"], 0);
    assert_eq!(session["score"], 0);
    assert_eq!(session["current_question"]["number"], 1);
    assert_eq!(session["current_question"]["topic"], 1);
    assert!(session["current_question"].get("correct_index").is_none());

    // 2. Score is not available mid-run
    let early = client
        .get(format!("{}/api/sessions/{}/score", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(early.status().as_u16(), 409);

    // 3. Right, wrong, right
    let mut seen = Vec::new();
    for choice in [1, 2, 1] {
        let resp = answer(&client, &address, &id, choice).await;
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["outcome"]["is_correct"], choice == 1);
        assert_eq!(body["outcome"]["explanation"]["status"], "disabled");
        assert!(!body["outcome"]["explanation"]["text"].as_str().unwrap().is_empty());
        if choice != 1 {
            assert_eq!(body["outcome"]["correct_index"], 1);
            assert_eq!(body["outcome"]["correct_choice"], "Vrai");
        }
        seen.push(body["outcome"]["question_number"].as_u64().unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3]);

    // 4. Completed run reports the final score
    let state: Value = client
        .get(format!("{}/api/sessions/{}", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["phase"], "completed");
    assert_eq!(state["score"], 2);
    assert!(state["current_question"].is_null());

    let score: Value = client
        .get(format!("{}/api/sessions/{}/score", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(score["score"], 2);
    assert_eq!(score["total"], 3);
    let percentage = score["percentage"].as_f64().unwrap();
    assert!((percentage - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(score["verdict"], "needs_review");

    // 5. No more answers once completed
    let late = answer(&client, &address, &id, 1).await;
    assert_eq!(late.status().as_u16(), 409);
}

#[tokio::test]
async fn session_starts_without_a_body() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/sessions", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let session: Value = response.json().await.unwrap();
    assert_eq!(session["phase"], "answering");
    assert_eq!(session["topic"], "all");
    assert_eq!(session["total"], 4);
}

#[tokio::test]
async fn single_question_topic_scores_100() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let session = start_session(&client, &address, json!("2")).await;
    let id = session["session_id"].as_str().unwrap().to_string();
    assert_eq!(session["total"], 1);

    let body: Value = answer(&client, &address, &id, 1).await.json().await.unwrap();
    assert_eq!(body["session"]["score"], 1);
    assert_eq!(body["session"]["position"], 1);
    assert_eq!(body["session"]["phase"], "completed");
    assert_eq!(body["session"]["final_score"]["percentage"], 100.0);
    assert_eq!(body["session"]["final_score"]["verdict"], "perfect");
}

#[tokio::test]
async fn empty_topic_never_starts() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let session = start_session(&client, &address, json!(7)).await;
    let id = session["session_id"].as_str().unwrap().to_string();
    assert_eq!(session["phase"], "no_questions");
    assert_eq!(session["total"], 0);
    assert!(session["current_question"].is_null());
    assert!(session["final_score"].is_null());

    let resp = answer(&client, &address, &id, 1).await;
    assert_eq!(resp.status().as_u16(), 409);

    let score = client
        .get(format!("{}/api/sessions/{}/score", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(score.status().as_u16(), 409);
}

#[tokio::test]
async fn invalid_choice_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let session = start_session(&client, &address, json!("all")).await;
    let id = session["session_id"].as_str().unwrap().to_string();

    for bad in [0, 4] {
        let resp = answer(&client, &address, &id, bad).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("out of range"));
    }

    let state: Value = client
        .get(format!("{}/api/sessions/{}", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["position"], 0);
    assert!(state["last_outcome"].is_null());
}

#[tokio::test]
async fn reset_switches_topic_and_clears_progress() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let session = start_session(&client, &address, json!("all")).await;
    let id = session["session_id"].as_str().unwrap().to_string();
    assert_eq!(session["total"], 4);

    answer(&client, &address, &id, 1).await;

    let reset: Value = client
        .post(format!("{}/api/sessions/{}/reset", address, id))
        .json(&json!({ "topic": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["topic"], 1);
    assert_eq!(reset["total"], 3);
    assert_eq!(reset["position"], 0);
    assert_eq!(reset["score"], 0);
    assert!(reset["last_outcome"].is_null());
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let session = start_session(&client, &address, json!("all")).await;
    let id = session["session_id"].as_str().unwrap().to_string();

    let deleted = client
        .delete(format!("{}/api/sessions/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let missing = client
        .get(format!("{}/api/sessions/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}
