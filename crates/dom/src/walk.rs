//! Subtree traversal helpers.

use crate::arena::Document;
use crate::patch::NodeKey;

/// Collect every live text node in the subtree rooted at `start`, in
/// document order. `start` itself is included when it is a text node.
///
/// The keys are snapshotted up front so callers are free to rewrite node
/// content while iterating the result. Dead or unknown start keys yield an
/// empty list.
pub fn text_nodes_under(doc: &Document, start: NodeKey) -> Vec<NodeKey> {
    let mut out = Vec::new();
    if !doc.contains(start) {
        return out;
    }
    let mut stack = vec![start];
    while let Some(key) = stack.pop() {
        if doc.is_text(key) {
            out.push(key);
            continue;
        }
        // Reverse push keeps document order on a LIFO stack.
        for child in doc.children(key).iter().rev() {
            stack.push(*child);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{DomPatch, KeySeq, NodeKey};

    fn build() -> (Document, NodeKey, Vec<NodeKey>) {
        let mut doc = Document::new();
        let mut keys = KeySeq::new();
        let root = keys.next_key();
        let body = keys.next_key();
        let p1 = keys.next_key();
        let t1 = keys.next_key();
        let em = keys.next_key();
        let t2 = keys.next_key();
        let t3 = keys.next_key();
        doc.apply(&[
            DomPatch::CreateDocument {
                key: root,
                doctype: None,
            },
            DomPatch::CreateElement {
                key: body,
                name: "body".into(),
                attributes: Vec::new(),
            },
            DomPatch::CreateElement {
                key: p1,
                name: "p".into(),
                attributes: Vec::new(),
            },
            DomPatch::CreateText {
                key: t1,
                text: "first".into(),
            },
            DomPatch::CreateElement {
                key: em,
                name: "em".into(),
                attributes: Vec::new(),
            },
            DomPatch::CreateText {
                key: t2,
                text: "second".into(),
            },
            DomPatch::CreateText {
                key: t3,
                text: "third".into(),
            },
            DomPatch::AppendChild {
                parent: root,
                child: body,
            },
            DomPatch::AppendChild {
                parent: body,
                child: p1,
            },
            DomPatch::AppendChild { parent: p1, child: t1 },
            DomPatch::AppendChild { parent: p1, child: em },
            DomPatch::AppendChild { parent: em, child: t2 },
            DomPatch::AppendChild {
                parent: body,
                child: t3,
            },
        ])
        .expect("build");
        (doc, root, vec![t1, t2, t3])
    }

    #[test]
    fn visits_text_leaves_in_document_order() {
        let (doc, root, expected) = build();
        assert_eq!(text_nodes_under(&doc, root), expected);
    }

    #[test]
    fn start_at_text_node_yields_itself() {
        let (doc, _root, texts) = build();
        let first = texts[0];
        assert_eq!(text_nodes_under(&doc, first), vec![first]);
    }

    #[test]
    fn dead_start_yields_nothing() {
        let (mut doc, _root, texts) = build();
        let victim = texts[1];
        doc.apply(&[DomPatch::RemoveNode { key: victim }])
            .expect("remove");
        assert!(text_nodes_under(&doc, victim).is_empty());
    }
}
