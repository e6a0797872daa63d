//! Run summary renderers.
//!
//! - [`terminal`] — colored summary box; `--verbose` adds a table of every
//!   exported provider, `--quiet` prints a single line.
//! - [`json`] — the [`ConversionSummary`](crate::models::ConversionSummary)
//!   as pretty JSON, for scripting.

pub mod json;
pub mod terminal;
