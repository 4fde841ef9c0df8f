use std::io::{self, Write};

use comfy_table::{Cell, Color as CellColor, ContentArrangement, Table, presets::UTF8_FULL};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    container::{EntryKind, StackingContainer},
    core::{Core, id::ViewId, node::ViewKind},
    error::{Error, Result},
};

/// Map a buffer write failure into a crate error.
fn write_err(e: io::Error) -> Error {
    Error::Internal(e.to_string())
}

/// Traverses a tree of views and returns an ANSI-colored string showing the
/// kind, frame and state of each view. This is a debug function.
pub fn dump(core: &Core, root: impl Into<ViewId>) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, core, root.into(), 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without color codes.
pub fn dump_plain(core: &Core, root: impl Into<ViewId>) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, core, root.into(), 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write a colored label.
fn write_colored(buffer: &mut Buffer, color: Color, bold: bool, text: &str) -> Result<()> {
    buffer
        .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))
        .map_err(write_err)?;
    write!(buffer, "{text}").map_err(write_err)?;
    buffer.reset().map_err(write_err)
}

/// Walk a view subtree and emit one line per view.
fn dump_node(buffer: &mut Buffer, core: &Core, id: ViewId, level: usize) -> Result<()> {
    let node = core.node(id).ok_or(Error::NodeNotFound(id))?;
    let indent = "    ".repeat(level);
    write!(buffer, "{indent}").map_err(write_err)?;
    write_colored(buffer, Color::Cyan, true, node.name())?;
    write!(buffer, " [{}]", node.kind().label()).map_err(write_err)?;

    let f = node.frame();
    write!(
        buffer,
        " ({}, {}) {} × {}",
        f.left(),
        f.top(),
        f.width(),
        f.height()
    )
    .map_err(write_err)?;

    match node.kind() {
        ViewKind::Surface(s) => {
            let c = s.content_size();
            write!(buffer, " content {} × {}", c.w, c.h).map_err(write_err)?;
            if !s.is_user_scroll_enabled() {
                write!(buffer, " ").map_err(write_err)?;
                write_colored(buffer, Color::Yellow, false, "scroll-off")?;
            }
            if core.observers().observing(id).is_some() {
                write!(buffer, " ").map_err(write_err)?;
                write_colored(buffer, Color::Magenta, false, "observed")?;
            }
        }
        ViewKind::Wrapper(w) => {
            if let Some(h) = w.cached_height() {
                write!(buffer, " cached {h}").map_err(write_err)?;
            }
            if !w.is_observing() {
                write!(buffer, " ").map_err(write_err)?;
                write_colored(buffer, Color::Red, false, "inert")?;
            }
        }
        _ => {}
    }
    if node.needs_layout() {
        write!(buffer, " ").map_err(write_err)?;
        write_colored(buffer, Color::Green, false, "dirty")?;
    }
    writeln!(buffer).map_err(write_err)?;

    for child in node.children() {
        dump_node(buffer, core, *child, level + 1)?;
    }
    Ok(())
}

/// Render a container's managed entries as a table: index, kind, view,
/// top anchor and frame.
pub fn layout_table(core: &Core, container: &StackingContainer) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "kind", "view", "top", "frame"]);
    for (i, entry) in container.entries().iter().enumerate() {
        let kind = match entry.kind() {
            EntryKind::Plain(_) => "plain",
            EntryKind::ScrollWrapped { .. } => "scrollable",
        };
        let name = core.node(entry.view()).map_or("?", |n| n.name());
        let frame = core
            .frame(entry.root())
            .map(|f| format!("({}, {}) {} × {}", f.left(), f.top(), f.width(), f.height()))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i).fg(CellColor::Green),
            Cell::new(kind),
            Cell::new(name),
            Cell::new(format!("{:?}", entry.top_anchor())),
            Cell::new(frame),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapter::ScrollableContent, container::HorizontalInset, testing::TestBed};

    #[test]
    fn dump_lists_wrapped_views() -> Result<()> {
        let mut bed = TestBed::new(320.0, 480.0);
        let label = bed.plain("label", 20.0);
        let web = bed.web("page", 200.0);
        bed.container
            .add_simple_view(&mut bed.core, label, HorizontalInset::default())?;
        bed.container.add_scrollable_view(
            &mut bed.core,
            ScrollableContent::from_web_content(web),
            HorizontalInset::default(),
        )?;
        bed.layout()?;

        let out = dump_plain(&bed.core, bed.container.root())?;
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("stacking-container [surface]"));
        assert!(out.contains("        label [plain] (0, 0) 320 × 20"));
        assert!(out.contains("wrapper [wrapper] (0, 20) 320 × 200 cached 200"));
        assert!(out.contains("page.surface [surface]"));
        assert!(out.contains("scroll-off observed"));

        let table = layout_table(&bed.core, &bed.container);
        assert!(table.contains("scrollable"));
        assert!(table.contains("ContainerTop"));
        Ok(())
    }
}
