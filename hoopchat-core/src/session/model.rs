//! Session data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::evidence::Evidence;

/// Stable identity of a session
///
/// Indices shift when sessions are pinned or deleted; the id does not, so
/// it is what an in-flight request holds on to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    text: String,
    /// Citations, bot replies only
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    /// Whether the evidence list is shown
    #[serde(default)]
    pub expanded: bool,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            evidence: Vec::new(),
            expanded: false,
        }
    }

    /// Create a bot reply. Pins are cleared and arrival order recorded so
    /// the evidence list can be re-sorted stably later.
    pub fn bot(text: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        let evidence = evidence
            .into_iter()
            .enumerate()
            .map(|(ordinal, mut item)| {
                item.set_pinned(false);
                item.set_ordinal(ordinal);
                item
            })
            .collect();
        Self {
            sender: Sender::Bot,
            text: text.into(),
            evidence,
            expanded: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Re-sort evidence: pinned first, otherwise arrival order
    pub(crate) fn sort_evidence(&mut self) {
        self.evidence
            .sort_by_key(|item| (!item.is_pinned(), item.ordinal()));
    }
}

/// A conversation session
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    /// Display title. Presentation code edits this directly while a title
    /// edit is open.
    pub title: String,
    pub messages: Vec<Message>,
    pub pinned: bool,
    /// Creation order, the tie-breaker for pin sorting
    pub(crate) ordinal: u64,
    /// Set once the user renames the session; suppresses auto-titling
    pub(crate) renamed: bool,
    pub(crate) pending: bool,
}

impl Session {
    pub(crate) fn new(title: impl Into<String>, ordinal: u64) -> Self {
        Self {
            id: SessionId::new(),
            title: title.into(),
            messages: Vec::new(),
            pinned: false,
            ordinal,
            renamed: false,
            pending: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Whether a question from this session is awaiting its reply
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_renamed(&self) -> bool {
        self.renamed
    }
}
