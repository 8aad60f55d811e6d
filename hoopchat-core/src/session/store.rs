//! In-memory store of chat sessions
//!
//! All mutation goes through [`SessionStore`]. It is driven from one
//! logical thread: presentation code calls the synchronous operations, and
//! the only asynchronous work (asking the backend) is split into
//! [`SessionStore::submit_user_message`] and
//! [`SessionStore::complete_request`] so that nothing is held across the
//! await.
//!
//! Index arguments are preconditions. An out-of-range index is a bug in
//! the caller and panics, the same way slice indexing does.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::model::{Message, Session, SessionId};
use crate::answer::{AnswerResult, RequestFailure, REQUEST_FAILED_TEXT};
use crate::utils::truncate_with_ellipsis;

/// Auto-derived titles keep this many characters of the first message
pub const TITLE_MAX_CHARS: usize = 30;

/// Reasons a message cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply for this session is still pending")]
    RequestInFlight,
}

/// Ticket for a question that has been recorded but not yet answered
///
/// Holds the originating session's id, so the reply lands in that session
/// even if the user has switched to another one meanwhile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    session_id: SessionId,
    question: String,
}

impl PendingRequest {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

#[derive(Debug, Clone)]
struct TitleEdit {
    session_id: SessionId,
    snapshot: String,
}

/// Ordered collection of sessions with one active session
#[derive(Debug)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active: usize,
    editing: Option<TitleEdit>,
    input: String,
    next_ordinal: u64,
}

impl SessionStore {
    /// Create a store holding a single empty `Chat 1`
    pub fn new() -> Self {
        Self {
            sessions: vec![Session::new("Chat 1", 0)],
            active: 0,
            editing: None,
            input: String::new(),
            next_ordinal: 1,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Always false: the store keeps at least one session
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    pub fn session_by_id(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_session(&self) -> &Session {
        &self.sessions[self.active]
    }

    /// Whether the active session is waiting on a reply
    pub fn is_pending(&self) -> bool {
        self.active_session().is_pending()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Take the draft, leaving the buffer empty
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Append a new `Chat {n}` session and make it active
    pub fn create_session(&mut self) -> usize {
        let title = format!("Chat {}", self.sessions.len() + 1);
        let ordinal = self.bump_ordinal();
        self.sessions.push(Session::new(title, ordinal));
        self.active = self.sessions.len() - 1;
        self.input.clear();
        debug!("Created session {} at index {}", self.active_session().id(), self.active);
        self.active
    }

    pub fn set_active(&mut self, index: usize) {
        self.check_index("set_active", index);
        self.active = index;
    }

    /// Record a user question in the active session
    ///
    /// On success the session is marked pending and the returned ticket
    /// must be handed to [`complete_request`](Self::complete_request) once
    /// the backend replies or fails.
    pub fn submit_user_message(&mut self, text: &str) -> Result<PendingRequest, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyMessage);
        }

        let session = &mut self.sessions[self.active];
        if session.pending {
            return Err(SubmitError::RequestInFlight);
        }

        if session.messages.is_empty() && !session.renamed {
            session.title = truncate_with_ellipsis(text, TITLE_MAX_CHARS);
        }
        session.messages.push(Message::user(text));
        session.pending = true;
        let session_id = session.id();
        self.input.clear();

        debug!("Submitted question for session {}", session_id);
        Ok(PendingRequest {
            session_id,
            question: text.to_string(),
        })
    }

    /// Apply the backend outcome for `request`
    ///
    /// Returns false when the originating session has been deleted in the
    /// meantime; the reply is then dropped.
    pub fn complete_request(
        &mut self,
        request: PendingRequest,
        outcome: Result<AnswerResult, RequestFailure>,
    ) -> bool {
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|s| s.id() == request.session_id)
        else {
            debug!(
                "Dropping reply for deleted session {}",
                request.session_id
            );
            return false;
        };

        let reply = match outcome {
            Ok(result) => Message::bot(result.answer, result.evidence),
            Err(e) => {
                warn!("Question for session {} failed: {}", session.id(), e);
                Message::bot(REQUEST_FAILED_TEXT, Vec::new())
            }
        };
        session.messages.push(reply);
        session.pending = false;
        true
    }

    /// Start renaming the session at `index`
    ///
    /// An edit already open on another session is committed first.
    pub fn begin_edit_title(&mut self, index: usize) {
        self.check_index("begin_edit_title", index);
        if self.editing.is_some() {
            self.commit_edit_title();
        }
        let session = &self.sessions[index];
        self.editing = Some(TitleEdit {
            session_id: session.id(),
            snapshot: session.title.clone(),
        });
    }

    /// Live title update while an edit is open
    pub fn set_title(&mut self, index: usize, title: impl Into<String>) {
        self.check_index("set_title", index);
        self.sessions[index].title = title.into();
    }

    /// Index of the session whose title is being edited
    pub fn editing_index(&self) -> Option<usize> {
        let edit = self.editing.as_ref()?;
        self.position(edit.session_id)
    }

    /// Close the open edit, keeping the current title
    pub fn commit_edit_title(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };
        if let Some(session) = self
            .sessions
            .iter_mut()
            .find(|s| s.id() == edit.session_id)
        {
            if session.title != edit.snapshot {
                session.renamed = true;
            }
        }
    }

    /// Close the open edit, restoring the title it started from
    pub fn cancel_edit_title(&mut self, index: usize) {
        self.check_index("cancel_edit_title", index);
        let Some(edit) = self.editing.take() else {
            return;
        };
        let session = &mut self.sessions[index];
        if session.id() == edit.session_id {
            session.title = edit.snapshot;
        } else {
            warn!(
                "cancel_edit_title({}) does not match the open edit; title left unchanged",
                index
            );
        }
    }

    /// Flip the pin on a session and re-sort, keeping the same session active
    pub fn toggle_pin(&mut self, index: usize) {
        self.check_index("toggle_pin", index);
        let active_id = self.active_session().id();

        let session = &mut self.sessions[index];
        session.pinned = !session.pinned;
        self.sessions
            .sort_by_key(|s| (!s.pinned, s.ordinal));

        self.active = self.position(active_id).unwrap_or(0);
    }

    /// Delete a session; the last one left is reset instead
    pub fn delete_session(&mut self, index: usize) {
        self.check_index("delete_session", index);
        let removed_id = self.sessions[index].id();

        if self.sessions.len() == 1 {
            let ordinal = self.bump_ordinal();
            self.sessions[0] = Session::new("Chat 1", ordinal);
            self.active = 0;
        } else {
            self.sessions.remove(index);
            if self.active > index {
                self.active -= 1;
            }
            if self.active >= self.sessions.len() {
                self.active = self.sessions.len() - 1;
            }
        }

        if self
            .editing
            .as_ref()
            .is_some_and(|edit| edit.session_id == removed_id)
        {
            self.editing = None;
        }
        info!("Deleted session {}", removed_id);
    }

    /// Flip the pin on one evidence item of the active session and re-sort
    /// that message's evidence
    pub fn toggle_evidence_pin(&mut self, message_index: usize, evidence_index: usize) {
        let message = self.active_message_mut("toggle_evidence_pin", message_index);
        let count = message.evidence.len();
        let item = message.evidence.get_mut(evidence_index).unwrap_or_else(|| {
            panic!(
                "toggle_evidence_pin: evidence index {} out of range (len {})",
                evidence_index, count
            )
        });
        let pinned = item.is_pinned();
        item.set_pinned(!pinned);
        message.sort_evidence();
    }

    /// Remove one evidence item from a message of the active session
    pub fn delete_evidence(&mut self, message_index: usize, evidence_index: usize) {
        let message = self.active_message_mut("delete_evidence", message_index);
        assert!(
            evidence_index < message.evidence.len(),
            "delete_evidence: evidence index {} out of range (len {})",
            evidence_index,
            message.evidence.len()
        );
        message.evidence.remove(evidence_index);
    }

    /// Show or hide the evidence list of a message in the active session
    pub fn toggle_evidence_expanded(&mut self, message_index: usize) {
        let message = self.active_message_mut("toggle_evidence_expanded", message_index);
        message.expanded = !message.expanded;
    }

    fn active_message_mut(&mut self, op: &str, message_index: usize) -> &mut Message {
        let messages = &mut self.sessions[self.active].messages;
        let count = messages.len();
        messages.get_mut(message_index).unwrap_or_else(|| {
            panic!(
                "{}: message index {} out of range (len {})",
                op, message_index, count
            )
        })
    }

    fn check_index(&self, op: &str, index: usize) {
        assert!(
            index < self.sessions.len(),
            "{}: session index {} out of range (len {})",
            op,
            index,
            self.sessions.len()
        );
    }

    fn position(&self, id: SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id() == id)
    }

    fn bump_ordinal(&mut self) -> u64 {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        ordinal
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
