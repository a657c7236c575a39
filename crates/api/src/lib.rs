//! HTTP layer: configuration, shared state, error mapping, authentication,
//! authorization guards, handlers, and the router.

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
