// src/services/bank.rs

use std::collections::BTreeMap;

use validator::Validate;

use crate::{
    models::question::{Question, TopicFilter, TopicSummary},
    services::error::BankError,
};

/// Question data compiled into the binary.
const EMBEDDED_QUESTIONS: &str = include_str!("../../data/questions.json");

/// Read-only catalog of quiz questions, fixed at start-up.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank, rejecting any malformed record.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        for (i, question) in questions.iter().enumerate() {
            check_question(i + 1, question)?;
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The semiconductor course bank shipped with the application.
    pub fn embedded() -> Result<Self, BankError> {
        Self::from_json(EMBEDDED_QUESTIONS)
    }

    /// Questions matching `filter`, in authored order.
    ///
    /// Always returns a fresh copy; an unmatched filter yields an empty list.
    pub fn filter_by_topic(&self, filter: TopicFilter) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    /// Question count per topic, ordered by topic.
    pub fn topics(&self) -> Vec<TopicSummary> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for q in &self.questions {
            *counts.entry(q.topic).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(topic, question_count)| TopicSummary {
                topic,
                question_count,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn check_question(index: usize, question: &Question) -> Result<(), BankError> {
    question
        .validate()
        .map_err(|e| BankError::InvalidQuestion {
            index,
            reason: e.to_string(),
        })?;

    if question.correct_index > question.choices.len() {
        return Err(BankError::InvalidQuestion {
            index,
            reason: format!(
                "correct_index {} exceeds {} choices",
                question.correct_index,
                question.choices.len()
            ),
        });
    }
    Ok(())
}
