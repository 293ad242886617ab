//! The flattened document: nested sorted maps mirroring the on-disk
//! TOML shape, `[Type.id]` tables holding `field = value` entries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use trellis_foundation::{Error, Result};

/// Field entries for one flattened entity, sorted by field name.
pub type EntityTable = BTreeMap<String, toml::Value>;

/// A flattened entity graph.
///
/// Three levels of sorted maps: entity type, entity id, field name.
/// Rendering the same content always yields the same bytes, so document
/// equality and digest comparison are meaningful.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatDocument {
    tables: BTreeMap<String, BTreeMap<String, EntityTable>>,
}

impl FlatDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from TOML text.
    ///
    /// Only `[Type.id]` tables are accepted. Top-level keys, bare
    /// `[Type]` values, and deeper nesting fail here; element names are
    /// checked against the schema later, during unflattening.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::serialization(err.to_string()))
    }

    /// Renders the document as TOML, sorted at every level.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| Error::serialization(err.to_string()))
    }

    /// SHA-256 over the rendered document.
    pub fn digest(&self) -> Result<ContentDigest> {
        let rendered = self.to_toml_string()?;
        Ok(ContentDigest(Sha256::digest(rendered.as_bytes()).into()))
    }

    /// Returns the field table for `Type.id`, creating it if absent.
    pub fn entry(&mut self, ty: impl Into<String>, id: impl Into<String>) -> &mut EntityTable {
        self.tables
            .entry(ty.into())
            .or_default()
            .entry(id.into())
            .or_default()
    }

    /// Looks up the field table for `Type.id`.
    #[must_use]
    pub fn get(&self, ty: &str, id: &str) -> Option<&EntityTable> {
        self.tables.get(ty)?.get(id)
    }

    /// Iterates types and their id-keyed entity tables, sorted by type.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, EntityTable>)> {
        self.tables.iter().map(|(ty, table)| (ty.as_str(), table))
    }

    /// Number of entities across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Whether the document holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SHA-256 of a rendered document.
///
/// Prints as lowercase hex. Equal content gives equal digests, however
/// the document was assembled.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({self})")
    }
}
