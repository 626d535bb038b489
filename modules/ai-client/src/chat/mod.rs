mod client;
pub(crate) mod types;

use serde_json::Value;
use tracing::debug;

use crate::error::AiError;
use crate::schema::StructuredOutput;
use crate::util::strip_code_fences;

use client::ChatClient;
use types::{ChatRequest, WireMessage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const MAX_TOKENS: u32 = 8192;

// =============================================================================
// ChatModel
// =============================================================================

/// A configured model on an OpenAI-compatible endpoint.
///
/// Cheap to clone; the underlying HTTP connection pool is shared.
#[derive(Clone)]
pub struct ChatModel {
    api_key: String,
    model: String,
    base_url: String,
    web_search: bool,
    max_attempts: u32,
    http: reqwest::Client,
}

impl ChatModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            web_search: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Enable the provider's hosted web search. Only search-preview models accept this.
    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn searches_web(&self) -> bool {
        self.web_search
    }

    fn client(&self) -> ChatClient<'_> {
        ChatClient::new(&self.http, &self.api_key, &self.base_url, self.max_attempts)
    }

    fn request(&self, system: String, user: String) -> ChatRequest {
        let request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(user))
            .max_tokens(MAX_TOKENS);

        // Search-preview models reject sampling parameters.
        if self.web_search {
            request.web_search()
        } else {
            request.temperature(0.7)
        }
    }

    /// Free-text completion.
    pub async fn complete(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String, AiError> {
        let request = self.request(system.into(), user.into());
        self.client()
            .chat(&request)
            .await?
            .into_text()
            .ok_or_else(|| AiError::EmptyResponse(self.model.clone()))
    }

    /// Structured completion against a raw strict JSON schema.
    pub async fn extract_value(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
        schema: Value,
    ) -> Result<Value, AiError> {
        let request = self
            .request(system.into(), user.into())
            .json_schema("structured_response", schema);

        let text = self
            .client()
            .chat(&request)
            .await?
            .into_text()
            .ok_or_else(|| AiError::EmptyResponse(self.model.clone()))?;

        serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| AiError::Parse(format!("structured response is not JSON: {e}")))
    }

    /// Type-safe structured extraction.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<T, AiError> {
        debug!(type_name = %T::output_name(), model = %self.model, "Structured extraction");
        let value = self.extract_value(system, user, T::strict_schema()).await?;
        serde_json::from_value(value)
            .map_err(|e| AiError::Parse(format!("failed to deserialize {}: {e}", T::output_name())))
    }
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("web_search", &self.web_search)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_openai() {
        let model = ChatModel::new("sk-test", "gpt-4o-mini");
        assert_eq!(model.model(), "gpt-4o-mini");
        assert_eq!(model.base_url(), DEFAULT_BASE_URL);
        assert!(!model.searches_web());
    }

    #[test]
    fn search_models_drop_temperature() {
        let model = ChatModel::new("sk-test", "gpt-4o-mini-search-preview").with_web_search();
        let json = serde_json::to_value(model.request("sys".into(), "user".into())).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("web_search_options").is_some());
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", ChatModel::new("sk-secret", "gpt-4o-mini"));
        assert!(!rendered.contains("sk-secret"));
    }
}
