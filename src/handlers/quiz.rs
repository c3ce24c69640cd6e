// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::session::{AnswerRequest, AnswerResponse, StartQuizRequest},
    services::{
        controller::QuizController,
        sessions::{SessionStore, SharedSession},
    },
    state::AppState,
};

async fn find_session(sessions: &SessionStore, id: Uuid) -> Result<SharedSession, AppError> {
    sessions
        .get(id)
        .await
        .ok_or(AppError::NotFound("Quiz session not found".to_string()))
}

/// A request without a JSON body starts over every course.
fn start_request(
    payload: Result<Json<StartQuizRequest>, JsonRejection>,
) -> Result<StartQuizRequest, AppError> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(StartQuizRequest::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Starts a new quiz session.
///
/// The body is optional; without one every course is included.
/// Draws the questions matching the topic filter and shuffles them.
/// A filter with no questions still creates the session, in the
/// `no_questions` phase.
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<StartQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = start_request(payload)?;

    let controller = QuizController::new(state.bank.clone(), state.explainer.clone(), req.topic);
    let (id, session) = state.sessions.create(controller).await;
    let view = session.lock().await.controller.view(id);

    tracing::info!(session_id = %id, topic = %req.topic, total = view.total, "Quiz session started");

    Ok((StatusCode::CREATED, Json(view)))
}

/// Returns the current state of a session.
pub async fn get_session(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = find_session(&sessions, id).await?;
    let mut session = session.lock().await;
    session.touch();

    Ok(Json(session.controller.view(id)))
}

/// Restarts a session with a (possibly different) topic filter.
pub async fn reset_session(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<StartQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = start_request(payload)?;

    let session = find_session(&sessions, id).await?;
    let mut session = session.lock().await;
    session.touch();
    let phase = session.controller.reset(req.topic);

    tracing::info!(session_id = %id, topic = %req.topic, phase = ?phase, "Quiz session reset");

    Ok(Json(session.controller.view(id)))
}

/// Submits the answer to the current question.
///
/// * Scores the answer and attaches the AI explanation.
/// * Moves to the next question, completing the run after the last one.
/// * The session stays locked until the explanation is in, so concurrent
///   submissions for the same session are serialized.
pub async fn submit_answer(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let session = find_session(&sessions, id).await?;
    let mut session = session.lock().await;
    session.touch();

    let outcome = session.controller.submit_answer(req.choice).await?;

    tracing::info!(
        session_id = %id,
        question = outcome.question_number,
        correct = outcome.is_correct,
        "Answer submitted"
    );
    if let Ok(score) = session.controller.final_score() {
        tracing::info!(
            session_id = %id,
            score = score.score,
            total = score.total,
            "Quiz completed ({:.1} %)",
            score.percentage
        );
    }

    Ok(Json(AnswerResponse {
        outcome,
        session: session.controller.view(id),
    }))
}

/// Returns the final score of a completed run.
pub async fn get_score(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = find_session(&sessions, id).await?;
    let mut session = session.lock().await;
    session.touch();

    Ok(Json(session.controller.final_score()?))
}

/// Discards a session.
pub async fn delete_session(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !sessions.remove(id).await {
        return Err(AppError::NotFound("Quiz session not found".to_string()));
    }
    tracing::info!(session_id = %id, "Quiz session deleted");

    Ok(StatusCode::NO_CONTENT)
}
