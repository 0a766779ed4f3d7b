//! External type-checker plumbing: where to run it, how to run it, and how
//! to read what it prints.
//!
//! A check is one checker invocation for one saved file. The engine starts
//! one through [`RunningCheck::start`], keeps polling the handle from the
//! host's event loop, and feeds the captured output through
//! [`parse::parse_output`] when the run completes. Dropping the handle
//! cancels the run.

pub mod parse;

mod command;
mod root;
mod runner;

pub use root::discover_project_root;
pub use runner::{CheckEvent, RunningCheck};
