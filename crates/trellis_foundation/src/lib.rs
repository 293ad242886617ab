//! Core types for the Trellis system.
//!
//! This crate provides:
//! - [`Value`] - Scalar field values (bool, int, float, string)
//! - [`ScalarType`] - Runtime type tags for scalar values
//! - [`EntityKey`] - Cheap `(type, id)` handle naming an entity
//! - [`Error`] / [`Result`] - Error handling for all layers
//! - [`ident`] - Identifier well-formedness rules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ident;
pub mod key;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, ErrorKind};
pub use key::EntityKey;
pub use value::{ScalarType, Value};

/// Convenient result type for Trellis operations.
pub type Result<T> = std::result::Result<T, Error>;
