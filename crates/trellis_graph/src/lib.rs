//! Entity graph runtime for Trellis.
//!
//! This crate provides:
//! - [`Layout`]: the root container, one id-keyed table per schema type
//! - [`Entity`]: a typed record whose slots follow the schema's field order
//! - [`Slot`]: scalar, singular-reference, or reference-list storage
//!
//! All mutation goes through [`Layout`]. Reference fields are paired by
//! the schema, and the layout keeps both halves of every edge in step:
//! a successful [`Layout::set_ref`] or [`Layout::add_ref`] updates the
//! source and the target together, and a failed one changes nothing.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod layout;
mod relation;

pub use entity::{Entity, Slot};
pub use layout::Layout;
