//! Per-view overlay engine for Sidelight.
//!
//! This crate contains the state machine a host editor embeds once per
//! view: it decides when a buffer is checkable, runs the external checker
//! through `sidelight-checker`, keeps the resulting findings anchored to
//! live buffer positions across edits, and answers the two renderer
//! questions (gutter paint and tooltip markup). The host side of the seam
//! is the [`HostView`] trait; everything toolkit-shaped stays on the
//! host's side of it.

// Re-export from crates for public API
pub use sidelight_checker::discover_project_root;
pub use sidelight_types::{
    CheckerConfig, CheckerConfigError, Diagnostic, Position, Severity, Span, TextEdit,
};

mod anchor;
mod config;
pub mod markup;
mod overlay;
mod session;
mod subscriptions;

pub use config::{ConfigError, load_config, parse_config};
pub use overlay::{GutterPaint, OverlayIndex};
pub use session::ViewSession;
pub use subscriptions::{HostView, SignalKind, SubscriptionId, SubscriptionSet};
