//! Indented text rendering of selections.

use trellis_foundation::Result;
use trellis_graph::{Entity, Layout, Slot};

use crate::select::{Selection, select};

/// Renders selections as indented text, four spaces per level unless
/// configured otherwise.
///
/// An entity renders as one `id = <identifier>` line followed by each
/// populated field in sorted field order; a `Ref` prints its target
/// identifier and a `Refs` list prints one identifier per line inside
/// `field = [` and `]`, in stored order. Unset fields are omitted. A
/// table renders between `{` and `}` with each identifier on its own
/// `id:` line; a sequence renders between `[` and `]`.
pub struct Printer<'a> {
    layout: &'a Layout,
    indent_width: usize,
}

impl<'a> Printer<'a> {
    /// Creates a printer over the layout with the default indent.
    #[must_use]
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            indent_width: 4,
        }
    }

    /// Sets the number of spaces per indent level.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Renders the selection to a string without a trailing newline.
    #[must_use]
    pub fn render(&self, selection: &Selection<'_>) -> String {
        let mut lines = Vec::new();
        match selection {
            Selection::Table(entities) => self.table(&mut lines, 0, entities),
            Selection::Entities(entities) => self.sequence(&mut lines, 0, entities),
            Selection::Entity(entity) => self.entity(&mut lines, 0, entity),
            Selection::Scalar(value) => self.line(&mut lines, 0, value.to_string()),
        }
        lines.join("\n")
    }

    /// Writes the rendered selection to standard output, followed by a
    /// newline.
    pub fn print(&self, selection: &Selection<'_>) {
        println!("{}", self.render(selection));
    }

    fn table(&self, lines: &mut Vec<String>, level: usize, entities: &[&Entity]) {
        self.line(lines, level, "{");
        for entity in entities {
            self.line(lines, level, format!("{}:", entity.id()));
            self.entity(lines, level + 1, entity);
        }
        self.line(lines, level, "}");
    }

    fn sequence(&self, lines: &mut Vec<String>, level: usize, entities: &[&Entity]) {
        self.line(lines, level, "[");
        for entity in entities {
            self.entity(lines, level + 1, entity);
        }
        self.line(lines, level, "]");
    }

    fn entity(&self, lines: &mut Vec<String>, level: usize, entity: &Entity) {
        self.line(lines, level, format!("id = {}", entity.id()));
        let Some(def) = self.layout.schema().entity(entity.ty()) else {
            return;
        };
        for (field_def, slot) in def.fields().iter().zip(entity.slots()) {
            match slot {
                Slot::Scalar(Some(value)) => {
                    self.line(lines, level, format!("{} = {value}", field_def.name()));
                }
                Slot::Ref(Some(id)) => {
                    self.line(lines, level, format!("{} = {id}", field_def.name()));
                }
                Slot::Refs(ids) if !ids.is_empty() => {
                    self.line(lines, level, format!("{} = [", field_def.name()));
                    for id in ids {
                        self.line(lines, level + 1, id.as_ref());
                    }
                    self.line(lines, level, "]");
                }
                Slot::Scalar(None) | Slot::Ref(None) | Slot::Refs(_) => {}
            }
        }
    }

    fn line(&self, lines: &mut Vec<String>, level: usize, text: impl AsRef<str>) {
        let mut line = " ".repeat(self.indent_width * level);
        line.push_str(text.as_ref());
        lines.push(line);
    }
}

/// Resolves a selector and renders the result in one step.
pub fn inspect(layout: &Layout, selector: &str) -> Result<String> {
    let selection = select(layout, selector)?;
    Ok(Printer::new(layout).render(&selection))
}
