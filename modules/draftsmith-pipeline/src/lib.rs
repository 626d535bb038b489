pub mod backend;
pub mod fanout;
pub mod pipeline;
pub mod prompts;
pub mod roles;
pub mod selection;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use backend::AiBackend;
pub use pipeline::{Phase, Pipeline, PipelineOutput, PipelineRequest, PipelineStats};
pub use traits::{ContentBackend, RoleConfig};
