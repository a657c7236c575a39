//! Pure domain logic for Taskly: error taxonomy, shared type aliases,
//! the prompt template engine, and generation-request validation.
//!
//! This crate performs no I/O and has no async code; everything here is
//! safe to call from any number of concurrent callers.

pub mod error;
pub mod generation;
pub mod prompts;
pub mod types;
