//! Shared limits and input validation helpers.

pub mod validation;
