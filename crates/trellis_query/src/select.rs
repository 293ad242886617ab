//! Dot-path selectors into a layout.
//!
//! A selector names a point in the graph: `Type`, `Type.id`, or
//! `Type.id.field`, continuing through singular reference fields for as
//! long as the path holds (`Host.web.site.name`). Segments are bare
//! (`[A-Za-z0-9_-]+`) or single-quoted for identifiers containing other
//! characters (`Host.'eu:1'.site`).

use trellis_foundation::{Error, Result, Value};
use trellis_graph::{Entity, Layout};
use trellis_schema::FieldKind;

/// What a selector resolved to.
#[derive(Clone, Debug)]
pub enum Selection<'a> {
    /// A whole type table, sorted by identifier.
    Table(Vec<&'a Entity>),
    /// An ordered entity sequence from a `Refs` field.
    Entities(Vec<&'a Entity>),
    /// A single entity.
    Entity(&'a Entity),
    /// A scalar field value.
    Scalar(&'a Value),
}

/// Resolves a selector against the layout.
///
/// Failures name the problem in `Error::Selector`: unknown types,
/// identifiers that resolve to nothing, paths descending through a
/// scalar or a reference list, and unset fields along the way.
pub fn select<'a>(layout: &'a Layout, selector: &str) -> Result<Selection<'a>> {
    let segments = parse(selector)?;
    let schema = layout.schema();

    let ty = segments[0].as_str();
    if schema.entity(ty).is_none() {
        return Err(Error::selector(
            selector,
            format!("unknown entity type '{ty}'"),
        ));
    }
    if segments.len() == 1 {
        return Ok(Selection::Table(layout.table(ty)?.collect()));
    }

    let id = segments[1].as_str();
    let Some(mut entity) = layout.lookup(ty, id) else {
        return Err(Error::selector(
            selector,
            format!("'{id}' does not name a {ty} entity"),
        ));
    };

    for (index, segment) in segments.iter().enumerate().skip(2) {
        let last = index == segments.len() - 1;
        let Some(field_def) = schema
            .entity(entity.ty())
            .and_then(|def| def.field(segment))
        else {
            return Err(Error::selector(
                selector,
                format!("'{segment}' is not a field of {}", entity.ty()),
            ));
        };
        match field_def.kind() {
            FieldKind::Scalar(_) => {
                if !last {
                    return Err(Error::selector(
                        selector,
                        format!("cannot descend into scalar field '{segment}'"),
                    ));
                }
                let Some(value) = layout.get(entity.key(), segment)? else {
                    return Err(Error::selector(
                        selector,
                        format!("field '{segment}' of {} is unset", entity.key()),
                    ));
                };
                return Ok(Selection::Scalar(value));
            }
            FieldKind::Ref(_) => {
                let Some(target) = layout.target(entity.key(), segment)? else {
                    return Err(Error::selector(
                        selector,
                        format!("field '{segment}' of {} is unset", entity.key()),
                    ));
                };
                entity = target;
            }
            FieldKind::Refs(_) => {
                if !last {
                    return Err(Error::selector(
                        selector,
                        format!("cannot descend into reference list '{segment}'"),
                    ));
                }
                return Ok(Selection::Entities(layout.targets(entity.key(), segment)?));
            }
        }
    }
    Ok(Selection::Entity(entity))
}

fn parse(selector: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    let mut chars = selector.chars().peekable();
    loop {
        let segment = if chars.peek() == Some(&'\'') {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some(c) => text.push(c),
                    None => {
                        return Err(Error::selector(selector, "unterminated quoted segment"));
                    }
                }
            }
            if text.is_empty() {
                return Err(Error::selector(selector, "empty quoted segment"));
            }
            text
        } else {
            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    text.push(c);
                    chars.next();
                } else {
                    return Err(Error::selector(
                        selector,
                        format!("unexpected character '{c}'"),
                    ));
                }
            }
            if text.is_empty() {
                return Err(Error::selector(selector, "empty path segment"));
            }
            text
        };
        segments.push(segment);
        match chars.next() {
            None => break,
            Some('.') => {}
            Some(c) => {
                return Err(Error::selector(
                    selector,
                    format!("unexpected character '{c}' after segment"),
                ));
            }
        }
    }
    Ok(segments)
}
