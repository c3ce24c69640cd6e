// src/services/sessions.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::services::controller::QuizController;

/// A quiz controller plus its bookkeeping.
pub struct QuizSession {
    pub controller: QuizController,
    pub last_active: DateTime<Utc>,
}

impl QuizSession {
    fn new(controller: QuizController) -> Self {
        Self {
            controller,
            last_active: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

pub type SharedSession = Arc<Mutex<QuizSession>>;

/// In-memory sessions keyed by id.
///
/// Each session sits behind its own mutex so a slow answer submission only
/// blocks that session.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
    max_idle: Duration,
}

impl SessionStore {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_idle,
        }
    }

    /// Registers a controller under a fresh id, pruning idle sessions first.
    pub async fn create(&self, controller: QuizController) -> (Uuid, SharedSession) {
        self.prune_idle(Utc::now()).await;

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(QuizSession::new(controller)));
        self.sessions.write().await.insert(id, session.clone());
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle since before `now - max_idle`.
    ///
    /// Sessions whose lock is held are in use and always kept.
    /// Returns how many were removed.
    pub async fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.max_idle;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => s.last_active >= cutoff,
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Pruned idle quiz sessions");
        }
        removed
    }
}
