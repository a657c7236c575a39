//! Authentication: JWT claims and validation.

pub mod jwt;
