//! Markup serialization for the in-memory document

use uirs_core::{NodeId, Result};

use crate::memory::{Arena, NodeKind};

pub(crate) fn to_html(arena: &Arena, node: NodeId) -> Result<String> {
    let mut out = String::new();
    write_node(arena, node, &mut out)?;
    Ok(out)
}

fn write_node(arena: &Arena, node: NodeId, out: &mut String) -> Result<()> {
    let data = arena.get(node)?;
    match &data.kind {
        NodeKind::Text(text) => escape_text(text, out),
        NodeKind::Element {
            tag_name,
            attributes,
            ..
        } => {
            out.push('<');
            out.push_str(tag_name);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');
            for child in &data.children {
                write_node(arena, *child, out)?;
            }
            out.push_str("</");
            out.push_str(tag_name);
            out.push('>');
        }
        NodeKind::Document | NodeKind::Fragment => {
            for child in &data.children {
                write_node(arena, *child, out)?;
            }
        }
    }
    Ok(())
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
