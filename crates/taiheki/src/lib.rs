//! Taiheki body-constitution diagnosis.
//!
//! The [`diagnosis`] module holds the scoring engine and its question catalogue contract;
//! [`config`], [`telemetry`] and [`error`] carry the service plumbing shared with the API binary.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod telemetry;
