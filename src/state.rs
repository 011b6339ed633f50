use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::content::GeneratedContent;

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub content: GeneratedContent,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    pub busy: bool,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

/// Current generation state shared across requests.
/// At most one generation runs at a time; see [`AppState::try_begin`].
pub struct AppState {
    inner: Mutex<Session>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            inner: Mutex::new(Session::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the state busy. Returns `None` if a generation is already running.
    pub fn try_begin(&self) -> Option<BusyGuard<'_>> {
        let mut session = self.lock();
        if session.busy {
            return None;
        }
        session.busy = true;
        Some(BusyGuard { state: self })
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Forget the current result and error. The busy flag is left alone.
    pub fn clear(&self) {
        let mut session = self.lock();
        session.result = None;
        session.error = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one generation. Dropping it releases the busy flag.
pub struct BusyGuard<'a> {
    state: &'a AppState,
}

impl BusyGuard<'_> {
    /// Replace the previous result/error with the outcome and release the flag.
    /// Returns the stored result on success.
    pub fn finish(self, outcome: Result<GeneratedContent, String>) -> Option<GenerationResult> {
        let mut session = self.state.lock();
        match outcome {
            Ok(content) => {
                session.result = Some(GenerationResult {
                    content,
                    generated_at: Utc::now(),
                });
                session.error = None;
            }
            Err(message) => {
                session.result = None;
                session.error = Some(message);
            }
        }
        session.busy = false;
        let stored = session.result.clone();
        // Release the lock before `self` drops and takes it again.
        drop(session);
        stored
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().busy = false;
    }
}
