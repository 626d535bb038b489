use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use ai_client::{ChatModel, Provider};
use draftsmith_common::{Config, DraftsmithError, ModelChoice, SearchProvider};

use crate::traits::{ContentBackend, RoleConfig};

/// `ContentBackend` over OpenAI-compatible chat endpoints.
///
/// Roles flagged `use_search` go to the search model when the configured
/// provider has one; otherwise everything runs on the analysis model.
pub struct AiBackend {
    analysis: ChatModel,
    search: Option<ChatModel>,
}

impl AiBackend {
    pub fn new(analysis: ChatModel, search: Option<ChatModel>) -> Self {
        Self { analysis, search }
    }

    pub fn from_config(config: &Config) -> Result<Self, DraftsmithError> {
        let provider = match config.model {
            ModelChoice::Gemini => Provider::Gemini,
            ModelChoice::Gpt4oMini => Provider::OpenAi,
        };
        let analysis = provider
            .model(config.model_api_key()?, config.model.model_name())
            .with_base_url(config.model_base_url());

        let search = match (config.search_provider, config.search_provider.search_model_name()) {
            (SearchProvider::OpenAi, Some(model)) => {
                let key = config.openai_api_key.as_deref().ok_or_else(|| {
                    DraftsmithError::Config("OPENAI_API_KEY is required for OpenAI web search".into())
                })?;
                Some(
                    Provider::OpenAi
                        .model(key, model)
                        .with_base_url(&config.openai_base_url)
                        .with_web_search(),
                )
            }
            _ => None,
        };

        info!(
            %provider,
            model = analysis.model(),
            search_model = search.as_ref().map(|m| m.model()),
            "Backend ready"
        );
        Ok(Self::new(analysis, search))
    }

    fn model_for(&self, role: &RoleConfig) -> &ChatModel {
        match (&self.search, role.use_search) {
            (Some(search), true) => search,
            _ => &self.analysis,
        }
    }
}

#[async_trait]
impl ContentBackend for AiBackend {
    async fn complete(&self, role: &RoleConfig, input: &str) -> Result<String> {
        let model = self.model_for(role);
        debug!(role = %role.name, model = model.model(), "Text completion");
        Ok(model.complete(role.instructions.as_str(), input).await?)
    }

    async fn complete_structured(&self, role: &RoleConfig, input: &str, schema: Value) -> Result<Value> {
        let model = self.model_for(role);
        debug!(role = %role.name, model = model.model(), "Structured completion");
        Ok(model.extract_value(role.instructions.as_str(), input, schema).await?)
    }
}
