//! Prompt template engine.
//!
//! Turns a named template plus a variable bag into two plain-text strings
//! (system prompt, user prompt) with no external templating dependency.
//!
//! Supported syntax:
//! - `{{name}}` — substitution (absent variables render as empty text)
//! - `{{#if name}}...{{/if}}` — conditional inclusion
//! - `{{#if name}}...{{else}}...{{/if}}` — conditional with alternative
//!
//! A variable is truthy when it is present and not the empty string; the
//! string `"0"` is truthy (only absence/emptiness is falsy).
//!
//! Rendering order is load-bearing: conditional blocks are resolved first
//! (the if/else form before the plain form, so the `{{else}}` marker is
//! consumed as block syntax), then `{{name}}` substitutions, then runs of
//! three or more newlines collapse to two, then the result is trimmed.
//!
//! Known limitation: `{{#if}}` blocks do not nest. The block scanner pairs
//! an opener with the first `{{/if}}` that follows it, so a nested block
//! mis-parses. None of the shipped templates nest.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Template name for the task-generation flow.
pub const TASK_GENERATION: &str = "task-generation";

/// Matches a `{{name}}` substitution. `{{#if ...}}` and `{{/if}}` contain
/// characters outside `[A-Za-z0-9_]` and never match; `{{else}}` does
/// match, so conditionals must be fully resolved before substitution runs
/// (see `render`).
static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").expect("valid regex"));

/// Matches runs of three or more newlines for blank-line collapsing.
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Variable bag
// ---------------------------------------------------------------------------

/// Named values available to a template during rendering.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: HashMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable. An empty string is stored and substitutes as empty
    /// text, but counts as falsy for `{{#if}}` purposes.
    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Set a variable only if the value is present; `None` leaves the
    /// variable absent (falsy, substitutes as empty text).
    pub fn set_opt(mut self, name: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.values.insert(name.to_string(), value.into());
        }
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Truthy means present and non-empty. `"0"` is truthy.
    fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Template registry
// ---------------------------------------------------------------------------

/// A named pair of system and user templates.
struct Template {
    system: &'static str,
    user: &'static str,
}

/// Immutable registry of prompt templates, constructed once at process
/// start and passed explicitly to whoever renders prompts.
pub struct PromptTemplates {
    templates: HashMap<&'static str, Template>,
}

impl PromptTemplates {
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            TASK_GENERATION,
            Template {
                system: TASK_GENERATION_SYSTEM,
                user: TASK_GENERATION_USER,
            },
        );
        Self { templates }
    }

    /// Return the static system prompt for a template name.
    pub fn system_prompt(&self, name: &str) -> Result<&'static str, CoreError> {
        self.templates
            .get(name)
            .map(|t| t.system)
            .ok_or_else(|| CoreError::UnknownTemplate(name.to_string()))
    }

    /// Render the user prompt for a template name with the given variables.
    ///
    /// For a fixed name and variable bag the result is always the identical
    /// string.
    pub fn user_prompt(&self, name: &str, vars: &TemplateVars) -> Result<String, CoreError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| CoreError::UnknownTemplate(name.to_string()))?;
        Ok(render(template.user, vars))
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a template against a variable bag.
fn render(template: &str, vars: &TemplateVars) -> String {
    let resolved = resolve_conditionals(template, vars);
    let substituted = VAR_RE.replace_all(&resolved, |caps: &regex::Captures<'_>| {
        vars.get(&caps[1]).unwrap_or("").to_string()
    });
    let collapsed = BLANK_RUN_RE.replace_all(&substituted, "\n\n");
    collapsed.trim().to_string()
}

const IF_OPEN: &str = "{{#if ";
const IF_OPEN_END: &str = "}}";
const ELSE_MARK: &str = "{{else}}";
const IF_CLOSE: &str = "{{/if}}";

/// Resolve all `{{#if}}` blocks left to right.
///
/// Each block body is checked for an `{{else}}` marker before being treated
/// as a plain conditional, so the marker is always consumed as block syntax
/// and never survives into variable substitution. Malformed blocks (opener
/// without a matching `{{/if}}`) are emitted literally.
fn resolve_conditionals(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(IF_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + IF_OPEN.len()..];

        let Some(name_end) = after_open.find(IF_OPEN_END) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after_open[..name_end].trim();
        let body_rest = &after_open[name_end + IF_OPEN_END.len()..];

        let Some(close) = body_rest.find(IF_CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &body_rest[..close];

        match body.find(ELSE_MARK) {
            Some(split) => {
                if vars.is_truthy(name) {
                    out.push_str(&body[..split]);
                } else {
                    out.push_str(&body[split + ELSE_MARK.len()..]);
                }
            }
            None => {
                if vars.is_truthy(name) {
                    out.push_str(body);
                }
            }
        }

        rest = &body_rest[close + IF_CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Shipped templates
// ---------------------------------------------------------------------------

/// Policy document instructing the generation backend how to shape tasks.
/// The structural constraints here (description layout, priority values,
/// default status) must stay compatible with the provider's output schema.
const TASK_GENERATION_SYSTEM: &str = "\
You are a senior software project planner. You turn a free-text request into \
a batch of concrete, implementation-level tasks for a project board.

Rules:
- Each task must be atomic and completable in 0.5 to 2 days of work.
- Task titles are imperative and specific. Avoid vague verbs such as \
\"handle\", \"improve\", \"support\", or \"investigate\".
- Every task description uses exactly this Markdown structure:

  ## Context
  One or two sentences situating the task in the request.

  ## What to do
  Concrete steps or changes, as a bulleted list.

  ## Out of scope
  What this task deliberately does not cover.

  ## Acceptance Criteria
  - [ ] Checklist of verifiable outcomes.

- Assign each task exactly one priority: LOW, MEDIUM, or HIGH.
- Every freshly generated task has status TODO.
- Give the batch a short title of at most 60 characters summarizing the \
request.";

/// User prompt template for the task-generation flow.
const TASK_GENERATION_USER: &str = "\
Generate a batch of tasks for the following request.

Workspace: {{workspace_name}}
{{#if workspace_context}}
Workspace context:
{{workspace_context}}
{{/if}}

Project: {{project_name}}
{{#if project_description}}
Project description:
{{project_description}}
{{/if}}
{{#if project_context}}
Project context:
{{project_context}}
{{/if}}

Request:
{{prompt}}

{{#if number_of_tasks}}
Produce exactly {{number_of_tasks}} tasks.
{{else}}
Produce as many tasks as the request warrants, up to 20.
{{/if}}";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
