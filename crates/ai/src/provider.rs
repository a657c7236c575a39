//! The task-generation capability interface and its transient output types.
//!
//! A [`TaskGenerator`] turns a [`GenerationContext`] into a
//! [`GeneratedTaskBatch`]. The shared prompt-building step lives in
//! [`build_prompts`], a free function every adapter calls before its own
//! backend request, so adapters compose instead of inheriting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskly_core::error::CoreError;
use taskly_core::generation::GenerationContext;
use taskly_core::prompts::{PromptTemplates, TASK_GENERATION};
use taskly_db::models::task::{TaskPriority, TaskStatus};

/// Batch title used when the backend produced no parseable output.
pub const FALLBACK_BATCH_TITLE: &str = "Generated Tasks";

/// One suggested task, as produced by a generation backend.
///
/// Never persisted in this shape; the orchestrator turns it into draft
/// items immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Expected to be TODO for freshly generated suggestions.
    pub status: TaskStatus,
}

/// A batch of suggested tasks with a short summarizing title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTaskBatch {
    pub batch_title: String,
    pub tasks: Vec<GeneratedTask>,
}

impl GeneratedTaskBatch {
    /// The designed non-fatal fallback for "the backend answered, but with
    /// nothing parseable": a valid batch with zero suggestions.
    pub fn empty() -> Self {
        Self {
            batch_title: FALLBACK_BATCH_TITLE.to_string(),
            tasks: Vec::new(),
        }
    }
}

/// Errors from a generation backend.
///
/// Every variant is fatal and propagates to the orchestrator; the only
/// non-error degraded outcome is [`GeneratedTaskBatch::empty`], which is a
/// value, not an error, so callers cannot conflate the two.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code (auth failure, rate
    /// limit, server error).
    #[error("Generation backend error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Prompt rendering failed. Indicates a defect (unknown template name).
    #[error(transparent)]
    Template(#[from] CoreError),
}

/// Capability interface over a concrete generation backend.
#[async_trait]
pub trait TaskGenerator: Send + Sync {
    /// Produce a batch of task suggestions for the given context.
    async fn generate_tasks(
        &self,
        context: &GenerationContext,
    ) -> Result<GeneratedTaskBatch, ProviderError>;
}

/// Render the system and user prompts for the task-generation template.
///
/// Shared by all adapters so each one only implements the literal backend
/// call.
pub fn build_prompts(
    templates: &PromptTemplates,
    context: &GenerationContext,
) -> Result<(String, String), CoreError> {
    let system = templates.system_prompt(TASK_GENERATION)?.to_string();
    let user = templates.user_prompt(TASK_GENERATION, &context.template_vars())?;
    Ok((system, user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> GenerationContext {
        GenerationContext {
            prompt: "add login flow".to_string(),
            number_of_tasks: Some(3),
            workspace_name: "Acme".to_string(),
            workspace_context: Some("B2B SaaS".to_string()),
            project_name: "Website".to_string(),
            project_description: None,
            project_context: None,
        }
    }

    #[test]
    fn build_prompts_renders_both_parts() {
        let templates = PromptTemplates::new();
        let (system, user) = build_prompts(&templates, &context()).unwrap();
        assert!(system.contains("Acceptance Criteria"));
        assert!(user.contains("Workspace: Acme"));
        assert!(user.contains("B2B SaaS"));
        assert!(user.contains("Produce exactly 3 tasks."));
        assert!(!user.contains("Project description"));
    }

    #[test]
    fn empty_batch_has_fallback_title_and_no_tasks() {
        let batch = GeneratedTaskBatch::empty();
        assert_eq!(batch.batch_title, FALLBACK_BATCH_TITLE);
        assert!(batch.tasks.is_empty());
    }
}
