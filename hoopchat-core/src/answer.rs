//! Contract for the question-answering backend

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Evidence;

/// Reply text used when the backend answers without a usable `answer` field
pub const NO_ANSWER_TEXT: &str = "No Answer.";

/// Bot text shown in place of a reply when the request fails
pub const REQUEST_FAILED_TEXT: &str = "Error contacting server.";

/// A successful backend reply
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub answer: String,
    pub evidence: Vec<Evidence>,
}

impl AnswerResult {
    pub fn new(answer: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self {
            answer: answer.into(),
            evidence,
        }
    }
}

/// Why a question could not be answered
///
/// All variants end up as the same fallback bot message; the distinction
/// only matters for logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestFailure {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Trait for question-answering backends
#[async_trait]
pub trait AnswerClient: Send + Sync {
    /// Ask one question and wait for the reply
    async fn ask_question(&self, question: &str) -> Result<AnswerResult, RequestFailure>;
}
