//! Fragment markup parsing and rendering.
//!
//! Fragments are small, trusted HTML snippets. The tokenizer understands start
//! and end tags, quoted/unquoted/boolean attributes, void elements, comments and
//! doctype declarations; it does not attempt full HTML5 tree construction.
//! Unbalanced end tags close the nearest matching open element and stray ones
//! are dropped, which matches how browsers recover for the common cases.
use regex::{Captures, Regex};
use std::fmt::{self, Write as _};
use std::sync::LazyLock;

use crate::dom::{Element, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<![A-Za-z][^>]*>|<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    )
    .expect("regex for markup tokens")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/"'>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("regex for markup attributes")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").expect("regex for entities")
});

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse `markup` and return its first top-level element, or `None` when the
/// markup contains no element at all.
pub fn parse_fragment(markup: &str) -> Option<Element> {
    parse_nodes(markup).into_iter().find_map(|node| match node {
        Node::Element(element) => Some(element),
        Node::Text(_) => None,
    })
}

/// Parse `markup` into its top-level nodes. Whitespace-only text is dropped.
pub fn parse_nodes(markup: &str) -> Vec<Node> {
    let mut roots: Vec<Node> = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut cursor = 0;

    for caps in TOKEN.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&markup[cursor..whole.start()], &mut open, &mut roots);
        cursor = whole.end();

        let Some(name) = caps.get(2) else {
            // comment or doctype
            continue;
        };
        let tag = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            close_tag(&tag, &mut open, &mut roots);
            continue;
        }

        let raw_attrs = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        let trimmed = raw_attrs.trim_end();
        let self_closing = trimmed.ends_with('/');
        let mut element = Element::new(&tag);
        for (key, value) in parse_attributes(trimmed.trim_end_matches('/')) {
            element.set_attr(&key, &value);
        }
        if self_closing || is_void(&tag) {
            attach(Node::Element(element), &mut open, &mut roots);
        } else {
            open.push(element);
        }
    }
    push_text(&markup[cursor..], &mut open, &mut roots);

    while let Some(element) = open.pop() {
        attach(Node::Element(element), &mut open, &mut roots);
    }
    roots
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = [2, 3, 4]
                .iter()
                .find_map(|group| caps.get(*group))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            Some((key, value))
        })
        .collect()
}

fn push_text(raw: &str, open: &mut [Element], roots: &mut Vec<Node>) {
    if raw.trim().is_empty() {
        return;
    }
    let text = decode_entities(raw);
    match open.last_mut() {
        Some(parent) => parent.push_text(&text),
        None => roots.push(Node::Text(text)),
    }
}

fn attach(node: Node, open: &mut [Element], roots: &mut Vec<Node>) {
    match open.last_mut() {
        Some(parent) => parent.push_child(node),
        None => roots.push(node),
    }
}

fn close_tag(tag: &str, open: &mut Vec<Element>, roots: &mut Vec<Node>) {
    let Some(position) = open.iter().rposition(|element| element.tag() == tag) else {
        return;
    };
    while open.len() > position {
        let Some(element) = open.pop() else {
            break;
        };
        attach(Node::Element(element), open, roots);
    }
}

pub fn decode_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => numeric_entity(body),
            };
            match decoded {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn numeric_entity(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
}

/// Serialize an element back to markup. Listeners are runtime state and are
/// not rendered.
pub fn render(element: &Element) -> String {
    let mut out = String::new();
    render_into(element, &mut out);
    out
}

fn render_into(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.tag());
    for (key, value) in element.attrs() {
        let _ = write!(out, " {key}=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');
    if is_void(element.tag()) {
        return;
    }
    for child in element.children() {
        match child {
            Node::Element(nested) => render_into(nested, out),
            Node::Text(text) => escape_text(text, out),
        }
    }
    let _ = write!(out, "</{}>", element.tag());
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
