//! HTTP answer backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use hoopchat_core::answer::{AnswerClient, AnswerResult, RequestFailure, NO_ANSWER_TEXT};
use hoopchat_core::config::ApiConfig;
use hoopchat_core::session::Evidence;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// `POST {base_url}/chat` request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

/// `POST {base_url}/chat` response body
///
/// Both fields are kept loose so a wrong-typed `answer` or `evidence`
/// degrades to the defaults instead of failing the whole reply.
#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    answer: Option<Value>,
    #[serde(default)]
    evidence: Option<Value>,
}

/// Answer client backed by the chat HTTP API
pub struct HttpAnswerClient {
    client: Client,
    base_url: String,
}

impl HttpAnswerClient {
    /// Create a new client
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Self {
        let base_url = base_url
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the `api` config section
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            Some(config.base_url.clone()),
            Some(Duration::from_secs(config.timeout_secs)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    fn parse_reply(reply: ChatReply) -> AnswerResult {
        let answer = match reply.answer {
            Some(Value::String(text)) => text,
            other => {
                if other.is_some() {
                    warn!("Reply has a non-string answer; using fallback text");
                }
                NO_ANSWER_TEXT.to_string()
            }
        };

        let evidence = match reply.evidence {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => decode_evidence(items),
            Some(other) => {
                warn!("Reply evidence is not a list: {}", other);
                Vec::new()
            }
        };

        AnswerResult { answer, evidence }
    }
}

impl Default for HttpAnswerClient {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Decode evidence rows, skipping any with an unknown table or bad shape
fn decode_evidence(items: Vec<Value>) -> Vec<Evidence> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Evidence>(item.clone()) {
            Ok(evidence) => Some(evidence),
            Err(e) => {
                warn!("Skipping evidence {}: {}", item, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask_question(&self, question: &str) -> Result<AnswerResult, RequestFailure> {
        let url = self.endpoint();
        debug!("Sending question to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { question })
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Chat endpoint returned {}", status);
            return Err(RequestFailure::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| RequestFailure::Decode(e.to_string()))?;

        let result = Self::parse_reply(reply);
        debug!(
            "Received answer ({} chars, {} evidence)",
            result.answer.len(),
            result.evidence.len()
        );
        Ok(result)
    }
}
