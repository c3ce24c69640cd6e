// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::{PublicQuestion, Question, TopicFilter};

/// Mutable progress of one quiz run.
///
/// Created by `QuizController::reset`, mutated only by
/// `QuizController::submit_answer`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Filtered and shuffled questions. Order is fixed for the run.
    pub active_questions: Vec<Question>,
    /// Cursor into `active_questions`. Equal to its length once done.
    pub position: usize,
    /// Correct answers so far, never above `position`.
    pub score: usize,
    pub last_outcome: Option<AnswerOutcome>,
    pub completed: bool,
}

impl SessionState {
    pub fn new(active_questions: Vec<Question>) -> Self {
        Self {
            active_questions,
            ..Default::default()
        }
    }

    pub fn total(&self) -> usize {
        self.active_questions.len()
    }
}

/// Where a run stands. Derived from `SessionState`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The topic filter matched nothing; the run cannot start.
    NoQuestions,
    Answering,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationStatus {
    /// Text produced by the language model.
    Generated,
    /// No credential configured.
    Disabled,
    /// The service failed or timed out.
    Unavailable,
}

/// Rationale attached to an answered question. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub status: ExplanationStatus,
    pub text: String,
}

impl Explanation {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            status: ExplanationStatus::Generated,
            text: text.into(),
        }
    }

    pub fn disabled(text: impl Into<String>) -> Self {
        Self {
            status: ExplanationStatus::Disabled,
            text: text.into(),
        }
    }

    pub fn unavailable(text: impl Into<String>) -> Self {
        Self {
            status: ExplanationStatus::Unavailable,
            text: text.into(),
        }
    }
}

/// Result of the most recently answered question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    /// 1-based position of the answered question in the run.
    pub question_number: usize,
    pub chosen_index: usize,
    pub is_correct: bool,
    /// Only set when the answer was wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_choice: Option<String>,
    pub feedback: String,
    pub explanation: Explanation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Perfect,
    Good,
    NeedsReview,
}

impl Verdict {
    /// Percentage at or above which a run counts as `Good`.
    pub const GOOD_THRESHOLD: f64 = 70.0;

    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Verdict::Perfect
        } else if percentage >= Self::GOOD_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::NeedsReview
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Perfect => "Parfait, tu maîtrises ce(s) cours !",
            Verdict::Good => "Pas mal du tout, encore un peu de révisions et ce sera parfait.",
            Verdict::NeedsReview => {
                "Ça vaut le coup de refaire un tour sur le cours et de rejouer le quiz."
            }
        }
    }
}

/// Score of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalScore {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub verdict: Verdict,
    pub message: String,
}

impl FinalScore {
    /// Returns `None` for an empty run, where no percentage exists.
    pub fn compute(score: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let percentage = 100.0 * score as f64 / total as f64;
        let verdict = Verdict::from_percentage(percentage);
        Some(Self {
            score,
            total,
            percentage,
            verdict,
            message: verdict.message().to_string(),
        })
    }

    pub fn as_tuple(&self) -> (usize, usize, f64) {
        (self.score, self.total, self.percentage)
    }
}

/// Snapshot of a session handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub topic: TopicFilter,
    pub phase: Phase,
    pub position: usize,
    pub total: usize,
    pub score: usize,
    pub current_question: Option<PublicQuestion>,
    pub last_outcome: Option<AnswerOutcome>,
    pub final_score: Option<FinalScore>,
}

/// DTO for starting or restarting a run. A missing topic means every course.
#[derive(Debug, Default, Deserialize)]
pub struct StartQuizRequest {
    #[serde(default)]
    pub topic: TopicFilter,
}

/// DTO for answering the current question.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// 1-based index of the selected choice.
    pub choice: usize,
}

/// Response to an answer: the outcome plus the session it moved forward.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub outcome: AnswerOutcome,
    pub session: SessionView,
}
