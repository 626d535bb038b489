use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use super::types::{ChatRequest, ChatResponse};
use crate::error::AiError;
use crate::util::truncate_to_char_boundary;

/// Error bodies beyond this many bytes are cut before surfacing.
const MAX_ERROR_BODY: usize = 2000;

/// Base backoff between attempts. Actual delay is base * 3^attempt.
const RETRY_BASE: Duration = Duration::from_millis(500);

pub(crate) struct ChatClient<'a> {
    http: &'a reqwest::Client,
    api_key: &'a str,
    base_url: &'a str,
    max_attempts: u32,
}

impl<'a> ChatClient<'a> {
    pub fn new(
        http: &'a reqwest::Client,
        api_key: &'a str,
        base_url: &'a str,
        max_attempts: u32,
    ) -> Self {
        Self {
            http,
            api_key,
            base_url,
            max_attempts: max_attempts.max(1),
        }
    }

    fn headers(&self) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| AiError::Config(format!("invalid API key header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// POST a chat completion, retrying rate limits, 5xx and connection failures.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let mut attempt = 0;
        loop {
            match self.chat_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt + 1 < self.max_attempts => {
                    let backoff = RETRY_BASE * 3u32.pow(attempt);
                    warn!(
                        model = %request.model,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Transient chat failure, retrying after backoff"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn chat_once(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        debug!(model = %request.model, "Chat completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body: truncate_to_char_boundary(&body, MAX_ERROR_BODY).to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        if let Some(ref usage) = parsed.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }
        Ok(parsed)
    }
}
