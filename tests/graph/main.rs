//! Integration tests for Layer 2: Graph
//!
//! Tests for the layout container, entity lifecycle, and paired
//! references.

mod lifecycle;
mod references;
