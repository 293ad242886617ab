//! Flatten/unflatten codec for Trellis.
//!
//! This crate provides:
//! - [`FlatDocument`]: the sorted `[Type.id]` table form of a graph
//! - [`flatten`] / [`unflatten`]: lossless conversion to and from a layout
//! - [`save_to_file`] / [`load_from_file`]: the same conversion against disk
//! - [`ContentDigest`]: SHA-256 over the rendered document
//!
//! Flattening records both halves of every reference edge and sorts
//! every level, so rendering is byte-stable. Unflattening rebuilds each
//! half exactly as stored and then checks the whole graph, making
//! `unflatten(flatten(layout))` reproduce `layout`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod flat;

pub use codec::{flatten, load_from_file, save_to_file, unflatten};
pub use flat::{ContentDigest, EntityTable, FlatDocument};
