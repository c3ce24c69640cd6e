use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    services::{bank::QuestionBank, explainer::Explainer, sessions::SessionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    pub sessions: Arc<SessionStore>,
    pub explainer: Arc<dyn Explainer>,
    pub config: Config,
}

impl AppState {
    pub fn new(bank: QuestionBank, explainer: Arc<dyn Explainer>, config: Config) -> Self {
        Self {
            bank: Arc::new(bank),
            sessions: Arc::new(SessionStore::new(config.session_idle)),
            explainer,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuestionBank> {
    fn from_ref(state: &AppState) -> Self {
        state.bank.clone()
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
