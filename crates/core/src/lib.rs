//! Shared domain vocabulary for the COMETA platform.
//!
//! This crate holds everything the database and API layers agree on but that
//! belongs to neither: ID and timestamp aliases, the domain error type, role
//! and language constants, construction stage definitions, pagination
//! helpers, and the derived-figure arithmetic (progress, budget, readiness).
//!
//! It has zero internal dependencies so it can be used from any other crate
//! in the workspace, including future CLI or worker tooling.

pub mod error;
pub mod pagination;
pub mod progress;
pub mod roles;
pub mod stages;
pub mod types;

pub use error::CoreError;
