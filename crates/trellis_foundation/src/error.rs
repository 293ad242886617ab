//! Error types for the Trellis system.
//!
//! Uses `thiserror` for ergonomic error definition.

use thiserror::Error;

use crate::key::EntityKey;
use crate::value::ScalarType;

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a duplicate entity id error.
    #[must_use]
    pub fn duplicate_id(key: EntityKey) -> Self {
        Self::new(ErrorKind::DuplicateId(key))
    }

    /// Creates an unknown entity type error.
    #[must_use]
    pub fn unknown_entity_type(ty: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownEntityType(ty.into()))
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(ty: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField {
            ty: ty.into(),
            field: field.into(),
        })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(key: EntityKey) -> Self {
        Self::new(ErrorKind::EntityNotFound(key))
    }

    /// Creates a wrong field kind error.
    #[must_use]
    pub fn wrong_field_kind(
        ty: impl Into<String>,
        field: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::new(ErrorKind::WrongFieldKind {
            ty: ty.into(),
            field: field.into(),
            expected,
            found,
        })
    }

    /// Creates a scalar type mismatch error.
    #[must_use]
    pub fn type_mismatch(
        ty: impl Into<String>,
        field: impl Into<String>,
        expected: ScalarType,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            ty: ty.into(),
            field: field.into(),
            expected,
            found: found.into(),
        })
    }

    /// Creates a reference already set error.
    #[must_use]
    pub fn reference_already_set(
        key: EntityKey,
        field: impl Into<String>,
        existing: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ReferenceAlreadySet {
            key,
            field: field.into(),
            existing: existing.into(),
        })
    }

    /// Creates a duplicate reference error.
    #[must_use]
    pub fn duplicate_reference(
        key: EntityKey,
        field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DuplicateReference {
            key,
            field: field.into(),
            target: target.into(),
        })
    }

    /// Creates a dangling reference error.
    #[must_use]
    pub fn dangling_reference(key: EntityKey, field: impl Into<String>, target: EntityKey) -> Self {
        Self::new(ErrorKind::DanglingReference {
            key,
            field: field.into(),
            target,
        })
    }

    /// Creates an inconsistent reference error.
    #[must_use]
    pub fn inconsistent_reference(
        key: EntityKey,
        field: impl Into<String>,
        target: EntityKey,
        back_field: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InconsistentReference {
            key,
            field: field.into(),
            target,
            back_field: back_field.into(),
        })
    }

    /// Creates a wrong reference target type error.
    #[must_use]
    pub fn wrong_target_type(
        key: EntityKey,
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::WrongTargetType {
            key,
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates a schema error from a rendered violation report.
    #[must_use]
    pub fn schema(report: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema(report.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization(message.into()))
    }

    /// Creates a selector error.
    #[must_use]
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Selector {
            selector: selector.into(),
            message: message.into(),
        })
    }

    /// Creates an invalid match pattern error.
    #[must_use]
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Pattern(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An entity with this id already exists in the type's table.
    #[error("duplicate entity id: {0}")]
    DuplicateId(EntityKey),

    /// Entity type is not declared in the schema.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Field is not declared on the entity type.
    #[error("unknown field: {field} on {ty}")]
    UnknownField {
        /// The entity type that was queried.
        ty: String,
        /// The field name that was not found.
        field: String,
    },

    /// Entity was not found in the layout.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityKey),

    /// Operation does not match the field's kind (scalar vs Ref vs Refs).
    #[error("wrong field kind: {ty}.{field} is {found}, expected {expected}")]
    WrongFieldKind {
        /// The entity type.
        ty: String,
        /// The field name.
        field: String,
        /// The kind the operation requires.
        expected: &'static str,
        /// The kind the schema declares.
        found: &'static str,
    },

    /// Scalar value does not match the field's declared type.
    #[error("type mismatch: {ty}.{field} expects {expected}, got {found}")]
    TypeMismatch {
        /// The entity type.
        ty: String,
        /// The field name.
        field: String,
        /// The declared scalar type.
        expected: ScalarType,
        /// Description of the value that was offered.
        found: String,
    },

    /// A singular reference slot is already occupied.
    #[error("reference already set: {key}.{field} already points at '{existing}'")]
    ReferenceAlreadySet {
        /// The entity whose slot is occupied.
        key: EntityKey,
        /// The reference field.
        field: String,
        /// Identifier currently stored in the slot.
        existing: String,
    },

    /// A reference list already contains the target.
    #[error("duplicate reference: {key}.{field} already contains '{target}'")]
    DuplicateReference {
        /// The entity whose list was offered the duplicate.
        key: EntityKey,
        /// The reference field.
        field: String,
        /// The duplicated target identifier.
        target: String,
    },

    /// A stored identifier names an entity that does not exist.
    #[error("dangling reference: {key}.{field} points at missing {target}")]
    DanglingReference {
        /// The entity holding the reference.
        key: EntityKey,
        /// The reference field.
        field: String,
        /// The missing target.
        target: EntityKey,
    },

    /// The two sides of a reference edge disagree.
    #[error(
        "inconsistent reference: {key}.{field} points at {target} but {target}.{back_field} does not point back"
    )]
    InconsistentReference {
        /// The entity holding the forward half.
        key: EntityKey,
        /// The forward reference field.
        field: String,
        /// The target entity.
        target: EntityKey,
        /// The paired field that fails to point back.
        back_field: String,
    },

    /// Reference links a different entity type than the schema declares.
    #[error("wrong target type: {key}.{field} links {expected}, got {found}")]
    WrongTargetType {
        /// The entity holding the reference field.
        key: EntityKey,
        /// The reference field.
        field: String,
        /// The entity type the schema declares as target.
        expected: String,
        /// The entity type that was offered.
        found: String,
    },

    /// Schema validation failed; the payload is the joined violation report.
    #[error("invalid schema: {0}")]
    Schema(String),

    /// IO failure while reading or writing a document.
    #[error("io error: {0}")]
    Io(String),

    /// Document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Selector expression could not be resolved.
    #[error("invalid selector '{selector}': {message}")]
    Selector {
        /// The selector expression as given.
        selector: String,
        /// What went wrong.
        message: String,
    },

    /// Match pattern is not a valid regular expression.
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
