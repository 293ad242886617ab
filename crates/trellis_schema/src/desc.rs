//! Raw schema documents.
//!
//! A [`SchemaDoc`] is the unvalidated description of a schema: entity
//! types, each a list of named field descriptors. Documents come from two
//! places, the builder methods here or TOML text, and both feed
//! [`SchemaDoc::validate`](crate::SchemaDoc::validate) to produce a
//! [`Schema`](crate::Schema).
//!
//! The TOML form is one table per entity type, one entry per field:
//!
//! ```toml
//! [Site]
//! name = { type = "string" }
//! hosts = { type = "Refs", refentity = "Host", reffield = "site" }
//!
//! [Host]
//! site = { type = "Ref", refentity = "Site", reffield = "hosts" }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use trellis_foundation::ScalarType;

use crate::error::SchemaError;
use crate::schema::Schema;

/// Field type tag as written in schema documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum FieldType {
    /// Boolean scalar.
    #[serde(rename = "bool")]
    Bool,
    /// Integer scalar.
    #[serde(rename = "int")]
    Int,
    /// Float scalar.
    #[serde(rename = "float")]
    Float,
    /// String scalar.
    #[serde(rename = "string")]
    String,
    /// Singular reference to another entity.
    #[serde(rename = "Ref")]
    Ref,
    /// Ordered list of references to other entities.
    #[serde(rename = "Refs")]
    Refs,
}

impl FieldType {
    /// The scalar type this tag names, if it is a scalar tag.
    #[must_use]
    pub const fn as_scalar(self) -> Option<ScalarType> {
        match self {
            Self::Bool => Some(ScalarType::Bool),
            Self::Int => Some(ScalarType::Int),
            Self::Float => Some(ScalarType::Float),
            Self::String => Some(ScalarType::String),
            Self::Ref | Self::Refs => None,
        }
    }

    /// True for `Ref` and `Refs`.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::Ref | Self::Refs)
    }
}

impl From<ScalarType> for FieldType {
    fn from(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Bool => Self::Bool,
            ScalarType::Int => Self::Int,
            ScalarType::Float => Self::Float,
            ScalarType::String => Self::String,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Ref => write!(f, "Ref"),
            Self::Refs => write!(f, "Refs"),
        }
    }
}

/// Raw descriptor for one field.
///
/// Scalar descriptors carry only the type tag. Reference descriptors name
/// the target entity type (`refentity`) and the field on that target that
/// points back (`reffield`). Descriptors with keys beyond these three are
/// rejected at parse time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDesc {
    /// Field type tag.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Target entity type, for reference fields.
    #[serde(default)]
    pub refentity: Option<String>,
    /// Paired field on the target, for reference fields.
    #[serde(default)]
    pub reffield: Option<String>,
}

impl FieldDesc {
    /// Creates a scalar descriptor.
    #[must_use]
    pub fn scalar(ty: ScalarType) -> Self {
        Self {
            ty: ty.into(),
            refentity: None,
            reffield: None,
        }
    }

    /// Creates a singular reference descriptor.
    #[must_use]
    pub fn reference(refentity: impl Into<String>, reffield: impl Into<String>) -> Self {
        Self {
            ty: FieldType::Ref,
            refentity: Some(refentity.into()),
            reffield: Some(reffield.into()),
        }
    }

    /// Creates a plural reference descriptor.
    #[must_use]
    pub fn references(refentity: impl Into<String>, reffield: impl Into<String>) -> Self {
        Self {
            ty: FieldType::Refs,
            refentity: Some(refentity.into()),
            reffield: Some(reffield.into()),
        }
    }
}

/// Raw description of one entity type: a name and its fields in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDesc {
    /// Entity type name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<(String, FieldDesc)>,
}

impl EntityDesc {
    /// Creates an entity description with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a scalar field.
    #[must_use]
    pub fn with_scalar(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.fields.push((name.into(), FieldDesc::scalar(ty)));
        self
    }

    /// Adds a singular reference field.
    #[must_use]
    pub fn with_ref(
        mut self,
        name: impl Into<String>,
        refentity: impl Into<String>,
        reffield: impl Into<String>,
    ) -> Self {
        self.fields
            .push((name.into(), FieldDesc::reference(refentity, reffield)));
        self
    }

    /// Adds a plural reference field.
    #[must_use]
    pub fn with_refs(
        mut self,
        name: impl Into<String>,
        refentity: impl Into<String>,
        reffield: impl Into<String>,
    ) -> Self {
        self.fields
            .push((name.into(), FieldDesc::references(refentity, reffield)));
        self
    }

    /// Adds an already-built descriptor.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, desc: FieldDesc) -> Self {
        self.fields.push((name.into(), desc));
        self
    }
}

/// Raw, unvalidated schema document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaDoc {
    /// Entity types in declaration order.
    pub entities: Vec<EntityDesc>,
}

impl SchemaDoc {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity type description.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityDesc) -> Self {
        self.entities.push(entity);
        self
    }

    /// Parses a document from TOML text.
    ///
    /// Syntax errors, unknown descriptor keys, and malformed type tags are
    /// reported as a single-violation [`SchemaError`]. Entity types and
    /// fields arrive in sorted order, so later violation reports are
    /// deterministic.
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        let raw: BTreeMap<String, BTreeMap<String, FieldDesc>> =
            toml::from_str(text).map_err(|e| SchemaError::single(e.to_string()))?;
        let entities = raw
            .into_iter()
            .map(|(name, fields)| EntityDesc {
                name,
                fields: fields.into_iter().collect(),
            })
            .collect();
        Ok(Self { entities })
    }

    /// Validates the document, producing the indexed [`Schema`].
    ///
    /// Every violation in the document is collected into the returned
    /// [`SchemaError`]; see the crate docs for the full rule list.
    pub fn validate(self) -> Result<Schema, SchemaError> {
        crate::validate::validate(self)
    }
}
