//! Pattern search over a collection of entities.

use regex::Regex;

use trellis_foundation::{Error, Result};
use trellis_graph::{Entity, Layout};
use trellis_schema::FieldKind;

use crate::select::{Selection, select};

/// Finds entities in `scope` whose `field` matches `pattern`.
///
/// `scope` is a selector and must resolve to a collection: a type table
/// (candidates in sorted identifier order) or a `Refs` sequence
/// (candidates in stored order). Results preserve the candidate order.
///
/// The pattern matches from the start of the field's text form, like
/// `\A(?:pattern)`: `ber` matches `berlin` but not `chamber`. Scalars
/// match their display form, a `Ref` matches its target identifier, and
/// a `Refs` list matches `[id1, id2]`. Entities whose type lacks the
/// field and entities whose field is unset or empty are skipped, so a
/// pattern that matches nothing returns an empty vec.
pub fn find<'a>(
    layout: &'a Layout,
    scope: &str,
    field: &str,
    pattern: &str,
) -> Result<Vec<&'a Entity>> {
    let regex =
        Regex::new(&format!(r"\A(?:{pattern})")).map_err(|err| Error::pattern(err.to_string()))?;

    let candidates = match select(layout, scope)? {
        Selection::Table(entities) | Selection::Entities(entities) => entities,
        Selection::Entity(_) => {
            return Err(Error::selector(
                scope,
                "selects a single entity, not a collection",
            ));
        }
        Selection::Scalar(_) => {
            return Err(Error::selector(scope, "selects a scalar, not a collection"));
        }
    };

    let mut matches = Vec::new();
    for entity in candidates {
        let Some(text) = match_text(layout, entity, field)? else {
            continue;
        };
        if regex.is_match(&text) {
            matches.push(entity);
        }
    }
    Ok(matches)
}

/// The text form of a field for matching, `None` when the entity's type
/// lacks the field or the field holds nothing.
fn match_text(layout: &Layout, entity: &Entity, field: &str) -> Result<Option<String>> {
    let Some(field_def) = layout
        .schema()
        .entity(entity.ty())
        .and_then(|def| def.field(field))
    else {
        return Ok(None);
    };
    match field_def.kind() {
        FieldKind::Scalar(_) => Ok(layout.get(entity.key(), field)?.map(ToString::to_string)),
        FieldKind::Ref(_) => Ok(layout
            .target(entity.key(), field)?
            .map(|target| target.id().to_string())),
        FieldKind::Refs(_) => {
            let ids: Vec<&str> = layout
                .targets(entity.key(), field)?
                .into_iter()
                .map(Entity::id)
                .collect();
            if ids.is_empty() {
                Ok(None)
            } else {
                Ok(Some(format!("[{}]", ids.join(", "))))
            }
        }
    }
}
