//! Domain types shared across Foodgram crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers as well as in handlers that
//! shape responses.

pub mod pagination;
pub mod user;
