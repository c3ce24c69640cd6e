// src/handlers/topics.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::services::bank::QuestionBank;

/// Lists the courses available for a quiz run.
pub async fn list_topics(State(bank): State<Arc<QuestionBank>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "total": bank.len(),
        "topics": bank.topics(),
    }))
}
