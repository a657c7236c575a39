//! Generation-request context and validation.
//!
//! [`GenerationContext`] is the transient input to prompt rendering; it has
//! no persisted form. The validation functions enforce the business limits
//! on the user-supplied parts of a generate/regenerate request.

use crate::error::CoreError;
use crate::prompts::TemplateVars;

/// Maximum length of a generation prompt in characters.
pub const MAX_PROMPT_LENGTH: usize = 1_000;

/// Inclusive bounds for an explicit task-count override.
pub const MIN_TASK_COUNT: u8 = 1;
pub const MAX_TASK_COUNT: u8 = 20;

/// Everything the prompt templates need to describe one generation request.
///
/// Composed by the orchestrator from the resolved workspace and project plus
/// the raw request; consumed by [`TemplateVars`] rendering and discarded.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// The user's free-text request.
    pub prompt: String,
    /// Explicit task-count override (1..=20), if the user asked for one.
    pub number_of_tasks: Option<u8>,
    pub workspace_name: String,
    /// Optional free-text context configured on the workspace.
    pub workspace_context: Option<String>,
    pub project_name: String,
    pub project_description: Option<String>,
    /// Optional free-text context configured on the project.
    pub project_context: Option<String>,
}

impl GenerationContext {
    /// Flatten the context into the variable bag the templates expect.
    pub fn template_vars(&self) -> TemplateVars {
        TemplateVars::new()
            .set("prompt", self.prompt.as_str())
            .set_opt("number_of_tasks", self.number_of_tasks.map(|n| n.to_string()))
            .set("workspace_name", self.workspace_name.as_str())
            .set_opt("workspace_context", self.workspace_context.clone())
            .set("project_name", self.project_name.as_str())
            .set_opt("project_description", self.project_description.clone())
            .set_opt("project_context", self.project_context.clone())
    }
}

/// Validate a generation prompt: non-empty and within the length limit.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".to_string()));
    }
    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters (got {})",
            prompt.chars().count()
        )));
    }
    Ok(())
}

/// Validate an explicit task-count override, if one was supplied.
pub fn validate_task_count(count: Option<u8>) -> Result<(), CoreError> {
    if let Some(count) = count {
        if !(MIN_TASK_COUNT..=MAX_TASK_COUNT).contains(&count) {
            return Err(CoreError::Validation(format!(
                "Task count must be between {MIN_TASK_COUNT} and {MAX_TASK_COUNT} (got {count})"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> GenerationContext {
        GenerationContext {
            prompt: "add login flow".to_string(),
            number_of_tasks: None,
            workspace_name: "Acme".to_string(),
            workspace_context: None,
            project_name: "Website".to_string(),
            project_description: Some("Marketing site".to_string()),
            project_context: None,
        }
    }

    // -- validate_prompt --

    #[test]
    fn valid_prompt_passes() {
        assert!(validate_prompt("add login flow").is_ok());
    }

    #[test]
    fn empty_prompt_rejected() {
        let err = validate_prompt("   ").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn too_long_prompt_rejected() {
        let long = "x".repeat(MAX_PROMPT_LENGTH + 1);
        let err = validate_prompt(&long).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum length"));
    }

    #[test]
    fn boundary_prompt_length_passes() {
        let exact = "x".repeat(MAX_PROMPT_LENGTH);
        assert!(validate_prompt(&exact).is_ok());
    }

    // -- validate_task_count --

    #[test]
    fn absent_count_passes() {
        assert!(validate_task_count(None).is_ok());
    }

    #[test]
    fn in_range_counts_pass() {
        assert!(validate_task_count(Some(1)).is_ok());
        assert!(validate_task_count(Some(20)).is_ok());
    }

    #[test]
    fn out_of_range_counts_rejected() {
        assert!(validate_task_count(Some(0)).is_err());
        assert!(validate_task_count(Some(21)).is_err());
    }

    // -- template_vars --

    #[test]
    fn template_vars_carry_present_fields_only() {
        let vars = context().template_vars();
        let templates = crate::prompts::PromptTemplates::new();
        let user = templates
            .user_prompt(crate::prompts::TASK_GENERATION, &vars)
            .unwrap();
        assert!(user.contains("Workspace: Acme"));
        assert!(user.contains("Marketing site"));
        assert!(!user.contains("Workspace context"));
    }
}
