//! Auth types shared across Foodgram services.
//!
//! Token issuance lives in the gateway; services only read the identity
//! headers it injects, through the extractors in [`identity`].

pub mod identity;
