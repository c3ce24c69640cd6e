// src/services/controller.rs

use std::sync::Arc;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::{
    models::{
        question::{PublicQuestion, Question, TopicFilter},
        session::{AnswerOutcome, FinalScore, Phase, SessionState, SessionView},
    },
    services::{
        bank::QuestionBank,
        error::QuizError,
        explainer::{ExplainRequest, Explainer},
    },
};

/// Drives one quiz run: selection, answering, completion.
pub struct QuizController {
    bank: Arc<QuestionBank>,
    explainer: Arc<dyn Explainer>,
    topic_filter: TopicFilter,
    state: SessionState,
}

impl QuizController {
    /// Creates a controller and starts a first run for `filter`.
    pub fn new(bank: Arc<QuestionBank>, explainer: Arc<dyn Explainer>, filter: TopicFilter) -> Self {
        let mut controller = Self {
            bank,
            explainer,
            topic_filter: filter,
            state: SessionState::default(),
        };
        controller.reset(filter);
        controller
    }

    /// Draws and shuffles a fresh selection, discarding all progress.
    pub fn reset(&mut self, filter: TopicFilter) -> Phase {
        let mut questions = self.bank.filter_by_topic(filter);
        questions.shuffle(&mut rand::rng());

        self.topic_filter = filter;
        self.state = SessionState::new(questions);

        let phase = self.phase();
        if phase == Phase::NoQuestions {
            tracing::warn!(topic = %filter, "No questions available for topic filter");
        } else {
            tracing::debug!(topic = %filter, total = self.state.total(), "Quiz reset");
        }
        phase
    }

    pub fn phase(&self) -> Phase {
        if self.state.total() == 0 {
            Phase::NoQuestions
        } else if self.is_complete() {
            Phase::Completed
        } else {
            Phase::Answering
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.completed || self.state.position >= self.state.total()
    }

    pub fn current_question(&self) -> Result<&Question, QuizError> {
        match self.phase() {
            Phase::NoQuestions => Err(QuizError::NoQuestions),
            Phase::Completed => Err(QuizError::Completed),
            Phase::Answering => self
                .state
                .active_questions
                .get(self.state.position)
                .ok_or(QuizError::Completed),
        }
    }

    /// Records an answer for the current question and moves on.
    ///
    /// `chosen_index` is 1-based. An out-of-range index is rejected before
    /// any state changes. The explanation is attached before the position
    /// advances, and explainer problems never surface as errors here.
    pub async fn submit_answer(&mut self, chosen_index: usize) -> Result<AnswerOutcome, QuizError> {
        let question = self.current_question()?.clone();
        if !question.is_valid_choice(chosen_index) {
            return Err(QuizError::InvalidChoice {
                chosen: chosen_index,
                max: question.choices.len(),
            });
        }

        let is_correct = chosen_index == question.correct_index;
        if is_correct {
            self.state.score += 1;
        }

        let explanation = self
            .explainer
            .explain(ExplainRequest {
                question_text: &question.text,
                choices: &question.choices,
                chosen_index,
                correct_index: question.correct_index,
            })
            .await;

        let outcome = AnswerOutcome {
            question_number: self.state.position + 1,
            chosen_index,
            is_correct,
            correct_index: (!is_correct).then_some(question.correct_index),
            correct_choice: (!is_correct).then(|| question.correct_choice().to_string()),
            feedback: if is_correct {
                "Bonne réponse !".to_string()
            } else {
                "Mauvaise réponse.".to_string()
            },
            explanation,
        };

        self.state.last_outcome = Some(outcome.clone());
        self.state.position += 1;
        if self.state.position == self.state.total() {
            self.state.completed = true;
        }

        tracing::debug!(
            position = self.state.position,
            total = self.state.total(),
            correct = is_correct,
            "Answer recorded"
        );

        Ok(outcome)
    }

    pub fn final_score(&self) -> Result<FinalScore, QuizError> {
        match self.phase() {
            Phase::NoQuestions => Err(QuizError::NoQuestions),
            Phase::Answering => Err(QuizError::NotComplete),
            Phase::Completed => {
                FinalScore::compute(self.state.score, self.state.total()).ok_or(QuizError::NoQuestions)
            }
        }
    }

    pub fn topic_filter(&self) -> TopicFilter {
        self.topic_filter
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn score(&self) -> usize {
        self.state.score
    }

    pub fn total(&self) -> usize {
        self.state.total()
    }

    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.state.last_outcome.as_ref()
    }

    pub fn active_questions(&self) -> &[Question] {
        &self.state.active_questions
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self, session_id: Uuid) -> SessionView {
        SessionView {
            session_id,
            topic: self.topic_filter,
            phase: self.phase(),
            position: self.state.position,
            total: self.state.total(),
            score: self.state.score,
            current_question: self
                .current_question()
                .ok()
                .map(|q| PublicQuestion::new(self.state.position + 1, q)),
            last_outcome: self.state.last_outcome.clone(),
            final_score: self.final_score().ok(),
        }
    }
}
