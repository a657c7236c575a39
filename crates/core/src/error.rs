use crate::types::DbId;

/// Domain-level error taxonomy, independent of any transport.
///
/// The HTTP layer maps each variant to a status code and a stable error
/// code string; nothing in this crate knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist, is soft-deleted, or is out of
    /// scope for the caller. Deliberately indistinguishable from "never
    /// existed" so callers cannot probe for hidden rows.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The caller is authenticated but lacks rights over the referenced
    /// workspace or project.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The request is well-formed but violates a business rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The write conflicts with a concurrent edit (stale `updated_at`).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested transition is illegal for the entity's current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An unrecognized prompt template name was requested. This indicates a
    /// defect, not a user-triggerable condition.
    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),
}
