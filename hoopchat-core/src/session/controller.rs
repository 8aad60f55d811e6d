//! Async round trip between the session store and an answer backend

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

use super::model::SessionId;
use super::store::{PendingRequest, SessionStore, SubmitError};
use crate::answer::AnswerClient;

/// What happened to a submitted question, tagged with the session it was
/// asked from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend replied and the answer was appended
    Answered(SessionId),
    /// The request failed and the fallback message was appended
    Failed(SessionId),
    /// The originating session was deleted before the reply arrived
    Dropped(SessionId),
}

impl SubmitOutcome {
    pub fn session_id(&self) -> SessionId {
        match self {
            SubmitOutcome::Answered(id) | SubmitOutcome::Failed(id) | SubmitOutcome::Dropped(id) => {
                *id
            }
        }
    }
}

/// Drives questions from a shared [`SessionStore`] to an [`AnswerClient`]
///
/// The store lock is only taken for the synchronous halves of a submit;
/// it is never held across the backend call, so the presentation layer can
/// keep switching, pinning and deleting sessions while a reply is pending.
#[derive(Clone)]
pub struct ChatController {
    store: Arc<Mutex<SessionStore>>,
    client: Arc<dyn AnswerClient>,
}

impl ChatController {
    pub fn new(store: Arc<Mutex<SessionStore>>, client: Arc<dyn AnswerClient>) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> Arc<Mutex<SessionStore>> {
        Arc::clone(&self.store)
    }

    /// Submit `text` from the active session and apply the reply to that
    /// same session
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, SubmitError> {
        let request = self.start(text)?;
        Ok(self.answer(request).await)
    }

    /// Record the question in the active session without waiting for the
    /// backend
    pub fn start(&self, text: &str) -> Result<PendingRequest, SubmitError> {
        self.store.lock().submit_user_message(text)
    }

    /// Ask the backend for a started request and apply the outcome
    pub async fn answer(&self, request: PendingRequest) -> SubmitOutcome {
        let session_id = request.session_id();
        debug!("Asking backend: {}", request.question());

        let outcome = self.client.ask_question(request.question()).await;
        let failed = outcome.is_err();
        if let Err(e) = &outcome {
            warn!("Answer request failed: {}", e);
        }

        let applied = self.store.lock().complete_request(request, outcome);
        match (applied, failed) {
            (false, _) => SubmitOutcome::Dropped(session_id),
            (true, true) => SubmitOutcome::Failed(session_id),
            (true, false) => SubmitOutcome::Answered(session_id),
        }
    }
}
