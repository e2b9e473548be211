//! Plain-text views of a subtree, used by diagnostics and the demo binary.

use crate::arena::{Document, NodeKind};
use crate::patch::NodeKey;
use crate::walk::text_nodes_under;
use std::fmt::Write;

/// Concatenated content of every text leaf under `start`, in document order.
pub fn visible_text(doc: &Document, start: NodeKey) -> String {
    let mut out = String::new();
    for key in text_nodes_under(doc, start) {
        if let Some(text) = doc.text(key) {
            out.push_str(text);
        }
    }
    out
}

/// Indented one-node-per-line rendering of the subtree under `start`.
pub fn outline(doc: &Document, start: NodeKey) -> String {
    let mut out = String::new();
    render(doc, start, 0, &mut out);
    out
}

fn render(doc: &Document, key: NodeKey, depth: usize, out: &mut String) {
    let Some(kind) = doc.kind(key) else {
        return;
    };
    for _ in 0..depth {
        out.push_str("  ");
    }
    match kind {
        NodeKind::Document { doctype } => match doctype {
            Some(doctype) => {
                let _ = writeln!(out, "#document (doctype {doctype})");
            }
            None => out.push_str("#document\n"),
        },
        NodeKind::Element { name, attributes } => {
            let _ = write!(out, "<{name}");
            for (attr, value) in attributes {
                match value {
                    Some(value) => {
                        let _ = write!(out, " {attr}=\"{value}\"");
                    }
                    None => {
                        let _ = write!(out, " {attr}");
                    }
                }
            }
            out.push_str(">\n");
        }
        NodeKind::Text { text } => {
            let _ = writeln!(out, "{text:?}");
        }
        NodeKind::Comment { text } => {
            let _ = writeln!(out, "<!-- {text} -->");
        }
    }
    for child in doc.children(key) {
        render(doc, *child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{DomPatch, KeySeq};

    #[test]
    fn visible_text_concatenates_in_order() {
        let mut doc = Document::new();
        let mut keys = KeySeq::new();
        let root = keys.next_key();
        let p = keys.next_key();
        let a = keys.next_key();
        let b = keys.next_key();
        doc.apply(&[
            DomPatch::CreateDocument {
                key: root,
                doctype: None,
            },
            DomPatch::CreateElement {
                key: p,
                name: "p".into(),
                attributes: Vec::new(),
            },
            DomPatch::CreateText {
                key: a,
                text: "left ".into(),
            },
            DomPatch::CreateText {
                key: b,
                text: "right".into(),
            },
            DomPatch::AppendChild {
                parent: root,
                child: p,
            },
            DomPatch::AppendChild { parent: p, child: a },
            DomPatch::AppendChild { parent: p, child: b },
        ])
        .expect("build");

        assert_eq!(visible_text(&doc, root), "left right");
        let rendered = outline(&doc, root);
        assert!(rendered.contains("#document"));
        assert!(rendered.contains("<p>"));
        assert!(rendered.contains("\"left \""));
    }
}
