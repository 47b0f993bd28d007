//! Shared service plumbing for Foodgram HTTP services.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod tracing;
