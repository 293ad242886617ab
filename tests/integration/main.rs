//! Integration tests across all layers
//!
//! Tests that drive the full stack: schema parsing, graph mutation,
//! the TOML codec, and query resolution against reloaded layouts.

mod consistency;
