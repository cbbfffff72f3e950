use crate::document::memory::{MemoryDocument, NodeId};
use phf::phf_set;
use std::fmt::Write;

static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
};

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_start_tag(document: &MemoryDocument, id: NodeId, tag: &str, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in document.attributes(id) {
        let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
    }
    out.push('>');
}

fn write_outer(document: &MemoryDocument, id: NodeId, out: &mut String) {
    if let Some(text) = document.text(id) {
        out.push_str(&escape_text(text));
        return;
    }
    let Some(tag) = document.tag_name(id) else {
        return;
    };
    write_start_tag(document, id, tag, out);
    if VOID_ELEMENTS.contains(tag) {
        return;
    }
    for child in document.children(id) {
        write_outer(document, *child, out);
    }
    let _ = write!(out, "</{}>", tag);
}

/// Serialization of `id` including its own tag, like `Element.outerHTML`.
pub fn outer_html(document: &MemoryDocument, id: NodeId) -> String {
    let mut out = String::new();
    write_outer(document, id, &mut out);
    out
}

/// Serialization of the children of `id`, like `Element.innerHTML`.
pub fn inner_html(document: &MemoryDocument, id: NodeId) -> String {
    let mut out = String::new();
    for child in document.children(id) {
        write_outer(document, *child, &mut out);
    }
    out
}

fn write_pretty(document: &MemoryDocument, id: NodeId, indent: usize, out: &mut String) {
    let padding = "  ".repeat(indent);
    if let Some(text) = document.text(id) {
        let _ = writeln!(out, "{}{}", padding, escape_text(text));
        return;
    }
    let Some(tag) = document.tag_name(id) else {
        return;
    };
    out.push_str(&padding);
    write_start_tag(document, id, tag, out);
    if VOID_ELEMENTS.contains(tag) {
        out.push('\n');
        return;
    }
    let children = document.children(id);
    if children.is_empty() {
        let _ = writeln!(out, "</{}>", tag);
        return;
    }
    out.push('\n');
    for child in children {
        write_pretty(document, *child, indent + 1, out);
    }
    let _ = writeln!(out, "{}</{}>", padding, tag);
}

/// One node per line, children indented by two spaces.
pub fn pretty_html(document: &MemoryDocument, id: NodeId) -> String {
    let mut out = String::new();
    write_pretty(document, id, 0, &mut out);
    out
}
