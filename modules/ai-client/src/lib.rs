pub mod chat;
pub mod error;
pub mod provider;
pub mod schema;
pub mod util;

pub use chat::ChatModel;
pub use error::AiError;
pub use provider::Provider;
pub use schema::StructuredOutput;
pub use util::{strip_code_fences, truncate_to_char_boundary};
