//! Schema documents and validation for Trellis.
//!
//! This crate provides:
//! - [`SchemaDoc`] / [`EntityDesc`] / [`FieldDesc`] - Raw, unvalidated
//!   schema documents, built programmatically or parsed from TOML
//! - [`Schema`] / [`EntityDef`] / [`FieldDef`] - The validated form with
//!   sorted, indexed lookup
//! - [`SchemaError`] - Validation failure carrying every violation found
//!
//! A schema names entity types and their fields. A field is either a typed
//! scalar or a reference (`Ref` singular, `Refs` plural) to another entity
//! type; every reference names the paired field on its target that points
//! back at it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod desc;
pub mod error;
pub mod schema;
mod validate;

// Re-export main types for convenience
pub use desc::{EntityDesc, FieldDesc, FieldType, SchemaDoc};
pub use error::SchemaError;
pub use schema::{EntityDef, FieldDef, FieldKind, RelationDef, Schema};
