//! Trace index, query engine and view transforms for tracelane.
//!
//! A [`model::TraceFile`] indexes a line-oriented event log by timestamp,
//! [`model::LoadedTrace`] groups its events into lanes, and a
//! [`view::TraceView`] turns lanes plus user input into
//! [`tracelane_protocol::RenderCommand`]s.

pub mod config;
pub mod format;
pub mod model;
pub mod progress;
pub mod svg;
pub mod view;
pub mod views;

pub use config::{ConfigError, ViewConfig};
pub use progress::Progress;
