//! Query and inspection for Trellis layouts.
//!
//! This crate provides:
//! - [`select`] / [`Selection`]: dot-path selectors into a layout
//! - [`find`]: pattern search over a table or reference sequence
//! - [`Printer`] / [`inspect`]: indented text rendering of selections
//!
//! Selectors address the graph the way it is organized: a type, an
//! entity, or a field, with paths continuing through singular
//! references. Search patterns are regular expressions anchored at the
//! start of the matched text.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod find;
pub mod render;
pub mod select;

pub use find::find;
pub use render::{Printer, inspect};
pub use select::{Selection, select};
