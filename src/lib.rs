//! Trellis - Schema-driven entity graph
//!
//! This crate re-exports all layers of the Trellis system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: trellis_query      — Selectors, pattern search, rendering
//!          trellis_codec      — Flatten/unflatten, TOML files, digests
//! Layer 2: trellis_graph      — Layout, entities, paired references
//! Layer 1: trellis_schema     — Schema documents and validation
//! Layer 0: trellis_foundation — Core types (Value, EntityKey, Error)
//! ```

pub use trellis_codec as codec;
pub use trellis_foundation as foundation;
pub use trellis_graph as graph;
pub use trellis_query as query;
pub use trellis_schema as schema;
