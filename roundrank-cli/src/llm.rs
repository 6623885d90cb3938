/// OpenAI-compatible judgment client for pairwise comparisons.
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use roundrank_core::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::JudgeError;
use crate::parse::classify_verdict;
use crate::retry::RetryPolicy;

/// Judgments are made at temperature 0 to keep verdicts as stable as possible.
const JUDGMENT_TEMPERATURE: f64 = 0.0;

/// Whole-request timeout. A stalled call fails as a transport error and is retried.
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

impl ChatCompletionRequest {
    /// A single user message carrying the substituted instruction.
    pub fn new(model: &str, instruction: &str) -> Self {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: instruction.to_string(),
            }],
            temperature: JUDGMENT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: MessageContent,
}

#[derive(Debug, Default, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// One request/response exchange with the oracle. Returns the raw body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<String, JudgeError>;
}

/// HTTP transport over a pooled reqwest client.
pub struct HttpTransport {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(client: Client, endpoint: &str, api_key: Option<String>) -> Self {
        HttpTransport {
            client,
            url: format!("{}/v1/chat/completions", endpoint.trim_end_matches('/')),
            api_key,
        }
    }

    /// Build a pooled client whose requests give up after `timeout`.
    pub fn with_timeout(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, JudgeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport::new(client, endpoint, api_key))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<String, JudgeError> {
        let mut req_builder = self
            .client
            .post(&self.url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(request);
        if let Some(ref key) = self.api_key {
            req_builder = req_builder.bearer_auth(key);
        }

        let resp = req_builder.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            return Err(JudgeError::Status { status, body });
        }

        Ok(resp.text().await?)
    }
}

/// Result of judging one pair.
#[derive(Debug, Clone)]
pub struct Judgment {
    pub outcome: Outcome,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    /// Transport retries spent on this pair.
    pub retries: usize,
}

impl Judgment {
    fn unresolved(retries: usize) -> Self {
        Judgment {
            outcome: Outcome::Unresolved,
            prompt_tokens: 0,
            completion_tokens: 0,
            retries,
        }
    }
}

/// Anything that can judge a pair. The tournament runner only sees this.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, symbol1: &str, symbol2: &str, instruction: &str) -> Judgment;
}

pub struct JudgmentClient<T> {
    transport: T,
    model: String,
    retry: RetryPolicy,
}

impl<T: Transport> JudgmentClient<T> {
    pub fn new(transport: T, model: impl Into<String>, retry: RetryPolicy) -> Self {
        JudgmentClient {
            transport,
            model: model.into(),
            retry,
        }
    }

    /// Send one request and extract the first choice's text plus token usage.
    ///
    /// A structurally valid response with no choices yields empty text.
    async fn request_verdict(&self, request: &ChatCompletionRequest) -> Result<(String, Usage), JudgeError> {
        let body = self.transport.send(request).await?;
        let data: ChatCompletionResponse = serde_json::from_str(&body)?;

        let text = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok((text, data.usage.unwrap_or_default()))
    }
}

#[async_trait]
impl<T: Transport> Judge for JudgmentClient<T> {
    /// Judge one pair, retrying transient failures with geometric backoff.
    ///
    /// Malformed and unexpected failures are not retried; they, and an
    /// exhausted retry ceiling, resolve to `Outcome::Unresolved` with zero usage.
    async fn judge(&self, symbol1: &str, symbol2: &str, instruction: &str) -> Judgment {
        let request = ChatCompletionRequest::new(&self.model, instruction);
        let mut retries = 0;

        loop {
            match self.request_verdict(&request).await {
                Ok((text, usage)) => {
                    let outcome = classify_verdict(&text, symbol1, symbol2);
                    debug!(symbol1, symbol2, verdict = %text, ?outcome, "oracle verdict");
                    return Judgment {
                        outcome,
                        prompt_tokens: usage.prompt_tokens,
                        completion_tokens: usage.completion_tokens,
                        retries,
                    };
                }
                Err(e) if e.is_transient() => {
                    if !self.retry.allows_retry(retries) {
                        error!(symbol1, symbol2, retries, error = %e, "giving up on pair after exhausting retries");
                        return Judgment::unresolved(retries);
                    }
                    let wait = self.retry.wait_for(retries);
                    warn!(
                        symbol1,
                        symbol2,
                        attempt = retries + 1,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "oracle call failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    retries += 1;
                }
                Err(e @ JudgeError::MalformedResponse(_)) => {
                    error!(symbol1, symbol2, error = %e, "malformed oracle response, scoring pair as a draw");
                    return Judgment::unresolved(retries);
                }
                Err(e) => {
                    error!(symbol1, symbol2, error = %e, "unexpected error, scoring pair as a draw");
                    return Judgment::unresolved(retries);
                }
            }
        }
    }
}
