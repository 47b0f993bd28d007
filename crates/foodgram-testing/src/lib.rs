//! Test utilities for Foodgram services.
//!
//! Import in `#[cfg(test)]` blocks and `tests/` only.

pub mod auth;
