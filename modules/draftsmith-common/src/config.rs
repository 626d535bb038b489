use std::env;
use std::str::FromStr;

use tracing::info;

use crate::error::DraftsmithError;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used for every role except research-with-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    Gemini,
    Gpt4oMini,
}

impl ModelChoice {
    pub fn model_name(&self) -> &'static str {
        match self {
            ModelChoice::Gemini => "gemini-2.5-flash",
            ModelChoice::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(ModelChoice::Gemini),
            "gpt-4o-mini" => Ok(ModelChoice::Gpt4oMini),
            other => Err(format!("unsupported model '{other}' (use 'gemini' or 'gpt-4o-mini')")),
        }
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelChoice::Gemini => write!(f, "gemini"),
            ModelChoice::Gpt4oMini => write!(f, "gpt-4o-mini"),
        }
    }
}

/// Where research queries are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchProvider {
    /// Research through the analysis model itself, no hosted tool.
    #[default]
    Gemini,
    /// OpenAI search-preview model with hosted web search.
    OpenAi,
}

impl SearchProvider {
    pub fn search_model_name(&self) -> Option<&'static str> {
        match self {
            SearchProvider::Gemini => None,
            SearchProvider::OpenAi => Some("gpt-4o-mini-search-preview"),
        }
    }
}

impl FromStr for SearchProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(SearchProvider::Gemini),
            "openai" => Ok(SearchProvider::OpenAi),
            other => Err(format!("unsupported search provider '{other}' (use 'gemini' or 'openai')")),
        }
    }
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProvider::Gemini => write!(f, "gemini"),
            SearchProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Backend configuration. Built once at process start, read-only afterwards.
#[derive(Clone)]
pub struct Config {
    pub model: ModelChoice,
    pub search_provider: SearchProvider,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub gemini_base_url: String,
    pub openai_base_url: String,
}

impl Config {
    /// Load credentials from the environment for the chosen model and search provider.
    /// Fails if a credential the selection needs is absent.
    pub fn from_env(
        model: ModelChoice,
        search_provider: SearchProvider,
    ) -> Result<Self, DraftsmithError> {
        let config = Self {
            model,
            search_provider,
            google_api_key: optional_env("GOOGLE_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every credential the selection needs is present.
    pub fn validate(&self) -> Result<(), DraftsmithError> {
        if self.model == ModelChoice::Gemini && self.google_api_key.is_none() {
            return Err(DraftsmithError::Config(
                "GOOGLE_API_KEY environment variable is required for Gemini models".into(),
            ));
        }
        if self.model == ModelChoice::Gpt4oMini && self.openai_api_key.is_none() {
            return Err(DraftsmithError::Config(
                "OPENAI_API_KEY environment variable is required for gpt-4o-mini".into(),
            ));
        }
        if self.search_provider == SearchProvider::OpenAi && self.openai_api_key.is_none() {
            return Err(DraftsmithError::Config(
                "OPENAI_API_KEY is required for OpenAI web search; use the 'gemini' search provider instead"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Credential for the analysis model.
    pub fn model_api_key(&self) -> Result<&str, DraftsmithError> {
        let key = match self.model {
            ModelChoice::Gemini => self.google_api_key.as_deref(),
            ModelChoice::Gpt4oMini => self.openai_api_key.as_deref(),
        };
        key.ok_or_else(|| DraftsmithError::Config(format!("no API key for model {}", self.model)))
    }

    pub fn model_base_url(&self) -> &str {
        match self.model {
            ModelChoice::Gemini => &self.gemini_base_url,
            ModelChoice::Gpt4oMini => &self.openai_base_url,
        }
    }

    pub fn log_redacted(&self) {
        info!(
            model = %self.model,
            search_provider = %self.search_provider,
            google_api_key = redact(self.google_api_key.as_deref()),
            openai_api_key = redact(self.openai_api_key.as_deref()),
            gemini_base_url = self.gemini_base_url.as_str(),
            openai_base_url = self.openai_base_url.as_str(),
            "Configuration loaded"
        );
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("search_provider", &self.search_provider)
            .field("google_api_key", &redact(self.google_api_key.as_deref()))
            .field("openai_api_key", &redact(self.openai_api_key.as_deref()))
            .finish_non_exhaustive()
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "[set]",
        None => "[unset]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: ModelChoice, search: SearchProvider) -> Config {
        Config {
            model,
            search_provider: search,
            google_api_key: None,
            openai_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
        }
    }

    #[test]
    fn gemini_without_google_key_is_config_error() {
        let err = config(ModelChoice::Gemini, SearchProvider::Gemini)
            .validate()
            .unwrap_err();
        assert!(matches!(err, DraftsmithError::Config(msg) if msg.contains("GOOGLE_API_KEY")));
    }

    #[test]
    fn openai_search_needs_openai_key_even_with_gemini_model() {
        let mut c = config(ModelChoice::Gemini, SearchProvider::OpenAi);
        c.google_api_key = Some("g".into());
        assert!(matches!(c.validate(), Err(DraftsmithError::Config(msg)) if msg.contains("OPENAI_API_KEY")));
        c.openai_api_key = Some("o".into());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn model_key_and_url_follow_model_choice() {
        let mut c = config(ModelChoice::Gpt4oMini, SearchProvider::Gemini);
        c.openai_api_key = Some("sk".into());
        assert_eq!(c.model_api_key().unwrap(), "sk");
        assert_eq!(c.model_base_url(), DEFAULT_OPENAI_BASE_URL);
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("gemini".parse::<ModelChoice>().unwrap(), ModelChoice::Gemini);
        assert_eq!("GPT-4o-mini".parse::<ModelChoice>().unwrap(), ModelChoice::Gpt4oMini);
        assert_eq!("openai".parse::<SearchProvider>().unwrap(), SearchProvider::OpenAi);
        assert!("claude".parse::<ModelChoice>().is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let mut c = config(ModelChoice::Gemini, SearchProvider::Gemini);
        c.google_api_key = Some("AIza-secret".into());
        assert!(!format!("{c:?}").contains("AIza-secret"));
    }
}
