// Backend seam for the pipeline.
//
// ContentBackend is the single capability the orchestrator consumes: run a
// role's instructions against an input, as free text or as a JSON object
// matching a schema. AiBackend (backend.rs) talks to real models; MockBackend
// (testing.rs) scripts responses so the pipeline runs without a network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use ai_client::StructuredOutput;

/// A producer persona: the instructions a backend runs an input against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub name: String,
    pub instructions: String,
    /// Route through the search-capable model when one is configured.
    pub use_search: bool,
}

impl RoleConfig {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            use_search: false,
        }
    }

    pub fn with_search(mut self) -> Self {
        self.use_search = true;
        self
    }
}

#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Free-text completion for `role`.
    async fn complete(&self, role: &RoleConfig, input: &str) -> Result<String>;

    /// Structured completion; the result must conform to `schema`.
    async fn complete_structured(&self, role: &RoleConfig, input: &str, schema: Value) -> Result<Value>;
}

/// Run `role` and deserialize its structured output as `T`.
pub async fn invoke_structured<T: StructuredOutput>(
    backend: &dyn ContentBackend,
    role: &RoleConfig,
    input: &str,
) -> Result<T> {
    let value = backend
        .complete_structured(role, input, T::strict_schema())
        .await?;
    serde_json::from_value(value)
        .with_context(|| format!("{} returned malformed {}", role.name, T::output_name()))
}
