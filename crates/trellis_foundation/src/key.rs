//! Entity handles.

use std::fmt;
use std::sync::Arc;

/// Handle naming one entity: its type and its identifier within that
/// type's table.
///
/// Keys are cheap to clone and do not guarantee the entity still exists;
/// operations taking a key re-resolve it against the layout and fail with
/// `EntityNotFound` when it is stale.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    ty: Arc<str>,
    id: Arc<str>,
}

impl EntityKey {
    /// Creates a key from an entity type name and identifier.
    #[must_use]
    pub fn new(ty: impl Into<Arc<str>>, id: impl Into<Arc<str>>) -> Self {
        Self {
            ty: ty.into(),
            id: id.into(),
        }
    }

    /// The entity type name.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The entity identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The shared type name allocation.
    #[must_use]
    pub fn ty_arc(&self) -> &Arc<str> {
        &self.ty
    }

    /// The shared identifier allocation.
    #[must_use]
    pub fn id_arc(&self) -> &Arc<str> {
        &self.id
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ty, self.id)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ty, self.id)
    }
}
