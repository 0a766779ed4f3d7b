//! Core domain types for Sidelight.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer: checker plumbing, the overlay
//! engine, and host integrations.

mod config;
mod diagnostic;
mod edit;
mod position;
mod severity;

pub use config::{CheckerConfig, CheckerConfigError};
pub use diagnostic::Diagnostic;
pub use edit::TextEdit;
pub use position::{Position, Span};
pub use severity::Severity;
