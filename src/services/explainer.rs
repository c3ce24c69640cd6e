// src/services/explainer.rs

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    models::session::Explanation,
    services::error::ExplainError,
};

/// Shown when no API key is configured.
pub const DISABLED_MESSAGE: &str = "L'IA d'explication n'est pas configurée (clé GROQ_API_KEY manquante).\n\
Tu peux l'ajouter dans le fichier de secrets (secrets.env) ou dans l'environnement pour activer cette fonction.";

/// Shown when the service call fails for any reason.
pub const UNAVAILABLE_MESSAGE: &str =
    "L'explication par l'IA est momentanément indisponible. Ta réponse a bien été prise en compte.";

const SYSTEM_INSTRUCTION: &str = "Réponds en français, de manière pédagogique mais concise.";

/// Everything the explanation prompt needs about one answered question.
/// Indices are 1-based.
#[derive(Debug, Clone, Copy)]
pub struct ExplainRequest<'a> {
    pub question_text: &'a str,
    pub choices: &'a [String],
    pub chosen_index: usize,
    pub correct_index: usize,
}

impl ExplainRequest<'_> {
    fn choice(&self, index: usize) -> &str {
        index
            .checked_sub(1)
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Builds the user prompt sent to the language model.
    pub fn prompt(&self) -> String {
        let choices = self
            .choices
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Tu es un professeur qui explique simplement l'électronique et les semi-conducteurs à un élève.\n\
             \n\
             Question :\n\
             {question}\n\
             \n\
             Choix possibles :\n\
             {choices}\n\
             \n\
             Réponse de l'élève : {chosen}. {chosen_text}\n\
             Bonne réponse : {correct}. {correct_text}\n\
             \n\
             1. Explique en quelques phrases pourquoi la bonne réponse est correcte.\n\
             2. Si la réponse de l'élève est fausse, explique en quoi sa réponse est trompeuse.\n\
             3. Reste concis, niveau école d'ingénieurs, en français.\n",
            question = self.question_text,
            choices = choices,
            chosen = self.chosen_index,
            chosen_text = self.choice(self.chosen_index),
            correct = self.correct_index,
            correct_text = self.choice(self.correct_index),
        )
    }
}

/// Produces a natural-language rationale for an answered question.
///
/// Implementations never fail: problems are reported through
/// `Explanation::status` with a fallback text.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, request: ExplainRequest<'_>) -> Explanation;
}

/// Used when no credential is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledExplainer;

#[async_trait]
impl Explainer for DisabledExplainer {
    async fn explain(&self, _request: ExplainRequest<'_>) -> Explanation {
        Explanation::disabled(DISABLED_MESSAGE)
    }
}

/// Connection settings for an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct ExplainerConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Explainer backed by Groq (or any OpenAI-compatible service).
#[derive(Clone)]
pub struct GroqExplainer {
    client: Client,
    config: ExplainerConfig,
}

impl GroqExplainer {
    pub fn new(config: ExplainerConfig) -> Result<Self, ExplainError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Single attempt, no retry.
    async fn complete(&self, prompt: String) -> Result<String, ExplainError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplainError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ExplainError::EmptyResponse)?;

        Ok(content)
    }
}

#[async_trait]
impl Explainer for GroqExplainer {
    async fn explain(&self, request: ExplainRequest<'_>) -> Explanation {
        match self.complete(request.prompt()).await {
            // Plain text: escaping is up to whoever renders it.
            Ok(text) => Explanation::generated(text),
            Err(e) => {
                tracing::warn!(model = %self.config.model, "Explanation request failed: {}", e);
                Explanation::unavailable(UNAVAILABLE_MESSAGE)
            }
        }
    }
}

/// Picks the explainer matching the configuration.
///
/// A missing key yields `DisabledExplainer`; so does a client that cannot be
/// built, since explanations must never block the quiz.
pub fn from_config(config: &Config) -> Arc<dyn Explainer> {
    let Some(api_key) = config.groq_api_key.clone() else {
        tracing::info!("GROQ_API_KEY not set, AI explanations disabled");
        return Arc::new(DisabledExplainer);
    };

    let explainer_config = ExplainerConfig {
        base_url: config.explain_base_url.to_string(),
        api_key,
        model: config.explain_model.clone(),
        timeout: config.explain_timeout,
    };

    match GroqExplainer::new(explainer_config) {
        Ok(explainer) => {
            tracing::info!(model = %config.explain_model, "AI explanations enabled");
            Arc::new(explainer)
        }
        Err(e) => {
            tracing::error!("Failed to build explanation client: {}", e);
            Arc::new(DisabledExplainer)
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
