use crate::chat::ChatModel;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
/// Google's OpenAI-compatible surface for Gemini models.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Backend family. Both speak the OpenAI chat-completions dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => GEMINI_API_URL,
            Provider::OpenAi => OPENAI_API_URL,
        }
    }

    /// Build a model handle pointed at this provider's default endpoint.
    pub fn model(&self, api_key: impl Into<String>, model: impl Into<String>) -> ChatModel {
        ChatModel::new(api_key, model).with_base_url(self.default_base_url())
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_model_uses_compat_endpoint() {
        let model = Provider::Gemini.model("key", "gemini-2.5-flash");
        assert_eq!(model.base_url(), GEMINI_API_URL);
        assert_eq!(model.model(), "gemini-2.5-flash");
    }
}
