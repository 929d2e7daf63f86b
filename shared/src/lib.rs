//! Shared foundation for the klinik workspace
//!
//! Holds the pieces that both the server and any future client tooling need:
//! the unified error system ([`error`]) and the domain models ([`models`]).

pub mod error;
pub mod models;
