// src/models/question.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One multiple-choice record of the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Course (lesson) the question belongs to.
    pub topic: u32,

    /// The prompt shown to the student.
    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    /// Options in display order. Never shuffled.
    #[validate(length(min = 2), custom(function = validate_choices))]
    pub choices: Vec<String>,

    /// 1-based index into `choices`.
    #[validate(range(min = 1))]
    pub correct_index: usize,
}

impl Question {
    /// Text of the choice at a 1-based index.
    pub fn choice(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }

    pub fn correct_choice(&self) -> &str {
        self.choice(self.correct_index).unwrap_or_default()
    }

    pub fn is_valid_choice(&self, index: usize) -> bool {
        (1..=self.choices.len()).contains(&index)
    }
}

fn validate_choices(choices: &[String]) -> Result<(), validator::ValidationError> {
    for choice in choices {
        if choice.trim().is_empty() {
            return Err(validator::ValidationError::new("choice_cannot_be_empty"));
        }
        if choice.len() > 500 {
            return Err(validator::ValidationError::new("choice_too_long"));
        }
    }
    Ok(())
}

/// DTO for sending a question to the client (excludes the answer key).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    /// 1-based position of the question in the current run.
    pub number: usize,
    pub topic: u32,
    pub text: String,
    pub choices: Vec<String>,
}

impl PublicQuestion {
    pub fn new(number: usize, question: &Question) -> Self {
        Self {
            number,
            topic: question.topic,
            text: question.text.clone(),
            choices: question.choices.clone(),
        }
    }
}

/// Which questions enter a run: every course, or a single one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TopicFilterRepr", into = "TopicFilterRepr")]
pub enum TopicFilter {
    #[default]
    All,
    Topic(u32),
}

impl TopicFilter {
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Topic(topic) => question.topic == *topic,
        }
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicFilter::All => f.write_str("all"),
            TopicFilter::Topic(topic) => write!(f, "{}", topic),
        }
    }
}

impl FromStr for TopicFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "tous" is the label the course picker has always used.
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("tous") {
            return Ok(TopicFilter::All);
        }
        s.parse::<u32>()
            .map(TopicFilter::Topic)
            .map_err(|_| format!("Invalid topic filter '{}': expected \"all\" or a topic number", s))
    }
}

/// Wire form of `TopicFilter`: either a bare number or a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TopicFilterRepr {
    Id(u32),
    Name(String),
}

impl TryFrom<TopicFilterRepr> for TopicFilter {
    type Error = String;

    fn try_from(repr: TopicFilterRepr) -> Result<Self, Self::Error> {
        match repr {
            TopicFilterRepr::Id(topic) => Ok(TopicFilter::Topic(topic)),
            TopicFilterRepr::Name(name) => name.parse(),
        }
    }
}

impl From<TopicFilter> for TopicFilterRepr {
    fn from(filter: TopicFilter) -> Self {
        match filter {
            TopicFilter::All => TopicFilterRepr::Name("all".to_string()),
            TopicFilter::Topic(topic) => TopicFilterRepr::Id(topic),
        }
    }
}

/// Number of questions available for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSummary {
    pub topic: u32,
    pub question_count: usize,
}
