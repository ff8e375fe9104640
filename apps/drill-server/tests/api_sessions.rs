//! Session lifecycle API tests.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures;
use common::{wait_for_advance, TestContext};

async fn start_session(server: &axum_test::TestServer, body: &Value) -> (String, Value) {
    let response = server.post("/api/sessions").json(body).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();
    (id, body["state"].clone())
}

#[tokio::test]
async fn test_create_session() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let (id, state) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(state["phase"], "active");
    assert_eq!(state["word_index"], 0);
    assert_eq!(state["word_count"], 3);
    assert_eq!(state["score"], 0);
    assert_eq!(state["lives"], 3);
    assert_eq!(state["hints_remaining"], 3);
    assert_eq!(state["history"], json!([]));
    assert_eq!(ctx.state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_create_session_without_words_is_completed() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let (_, state) = start_session(&server, &fixtures::create_session_request(vec![])).await;

    assert_eq!(state["phase"], "completed");
    assert!(state.get("completed_at").is_some());
}

#[tokio::test]
async fn test_create_session_rejects_zero_lives() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/sessions")
        .json(&fixtures::create_session_with_overrides(
            fixtures::english_words(),
            json!({ "initial_lives": 0 }),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_config");
    assert!(ctx.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_create_session_rejects_blank_word() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/sessions")
        .json(&fixtures::create_session_request(vec![
            fixtures::word("w1", "bird", "en"),
            fixtures::word("w2", "  ", "en"),
        ]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");
    assert_eq!(
        body["message"],
        "Bad request: words[1] needs a non-blank id and text"
    );
    assert!(ctx.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_hint_restarts_on_next_word() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    server.post(&format!("/api/sessions/{}/hint", id)).await;
    server.post(&format!("/api/sessions/{}/hint", id)).await;
    server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("bird"))
        .await;
    wait_for_advance().await;

    let body: Value = server
        .post(&format!("/api/sessions/{}/hint", id))
        .await
        .json();
    assert_eq!(body["hint"], "t");
    assert_eq!(body["state"]["hints_used"], 3);
}

#[tokio::test]
async fn test_correct_answer_scores_then_advances() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    let response = server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("Bird"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["state"]["phase"], "checking");
    assert_eq!(body["state"]["score"], 10);
    assert_eq!(body["state"]["lives"], 3);
    assert_eq!(body["state"]["last_result"]["matched_via"], "direct");
    assert_eq!(body["state"]["history"][0]["accepted"], true);

    wait_for_advance().await;

    let body: Value = server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(body["state"]["phase"], "active");
    assert_eq!(body["state"]["word_index"], 1);
    assert!(body["state"].get("last_result").is_none());
}

#[tokio::test]
async fn test_submit_while_checking_is_ignored() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("bird"))
        .await
        .assert_status_ok();
    let body: Value = server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("bird"))
        .await
        .json();

    assert_eq!(body["state"]["score"], 10);
    assert_eq!(body["state"]["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concept_prompt_accepts_other_language() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let words = vec![fixtures::concept_word("w1", "বিড়াল", "bn", "animal")];
    let (id, _) = start_session(&server, &fixtures::create_session_request(words)).await;

    let body: Value = server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("gato"))
        .await
        .json();

    assert_eq!(body["state"]["score"], 10);
    assert_eq!(body["state"]["last_result"]["matched_via"], "concept");
    assert_eq!(body["state"]["last_result"]["matched_language"], "es");
}

#[tokio::test]
async fn test_wrong_answer_on_last_life_completes() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_with_overrides(
            fixtures::english_words(),
            json!({ "initial_lives": 1 }),
        ),
    )
    .await;

    let body: Value = server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("fish"))
        .await
        .json();

    assert_eq!(body["state"]["phase"], "completed");
    assert_eq!(body["state"]["lives"], 0);

    wait_for_advance().await;
    let body: Value = server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(body["state"]["phase"], "completed");
    assert_eq!(body["state"]["word_index"], 0);
}

#[tokio::test]
async fn test_skip_costs_a_life() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    let response = server.post(&format!("/api/sessions/{}/skip", id)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["state"]["lives"], 2);
    assert_eq!(body["state"]["history"][0]["accepted"], false);
    assert_eq!(body["state"]["history"][0]["response"]["kind"], "skipped");
}

#[tokio::test]
async fn test_hint_reveals_prefix_up_to_cap() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_with_overrides(
            fixtures::english_words(),
            json!({ "max_hints": 2 }),
        ),
    )
    .await;

    let first: Value = server
        .post(&format!("/api/sessions/{}/hint", id))
        .await
        .json();
    assert_eq!(first["hint"], "b");
    assert_eq!(first["state"]["hints_remaining"], 1);

    server.post(&format!("/api/sessions/{}/hint", id)).await;
    let capped: Value = server
        .post(&format!("/api/sessions/{}/hint", id))
        .await
        .json();
    assert_eq!(capped["hint"], "bi");
    assert_eq!(capped["state"]["hints_used"], 2);
    assert_eq!(capped["state"]["hints_remaining"], 0);
}

#[tokio::test]
async fn test_restart_resets_progress() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("bird"))
        .await;
    let body: Value = server
        .post(&format!("/api/sessions/{}/restart", id))
        .await
        .json();

    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["state"]["phase"], "active");
    assert_eq!(body["state"]["score"], 0);
    assert_eq!(body["state"]["lives"], 3);
    assert_eq!(body["state"]["history"], json!([]));

    wait_for_advance().await;
    let body: Value = server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(body["state"]["word_index"], 0);
}

#[tokio::test]
async fn test_delete_session() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (id, _) = start_session(
        &server,
        &fixtures::create_session_request(fixtures::english_words()),
    )
    .await;

    server
        .delete(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_returns_not_found() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let id = uuid::Uuid::new_v4();

    let response = server
        .post(&format!("/api/sessions/{}/submit", id))
        .json(&fixtures::submit_request("bird"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], format!("Not found: Session {}", id));
}
