//! Generation provider abstraction over task-suggestion backends, plus the
//! OpenAI-compatible chat-completion adapter.

pub mod openai;
pub mod provider;

pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use provider::{
    build_prompts, GeneratedTask, GeneratedTaskBatch, ProviderError, TaskGenerator,
};
