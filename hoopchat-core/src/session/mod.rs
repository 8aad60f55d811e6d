//! Chat sessions and their mutation operations
//!
//! A session is one conversation: a title, its messages and a pin flag.
//! [`SessionStore`] owns every session and tracks which one is active;
//! [`ChatController`] connects it to an [`AnswerClient`](crate::answer::AnswerClient).

pub mod controller;
pub mod evidence;
pub mod model;
pub mod store;

pub use controller::{ChatController, SubmitOutcome};
pub use evidence::{Evidence, GameEvidence, PlayerEvidence, RecordId};
pub use model::{Message, Sender, Session, SessionId};
pub use store::{PendingRequest, SessionStore, SubmitError, TITLE_MAX_CHARS};
