//! Focus classification for key routing.

use crate::arena::Document;

/// Whether the document's focused node sits in an editing context, meaning
/// keystrokes belong to a form field or editable region rather than to
/// application shortcuts.
///
/// Editing contexts are text-taking `<input>` elements (anything but
/// `checkbox` and `radio`), `<textarea>`, and elements inside a
/// `contenteditable` region. `contenteditable` is inherited, so the ancestor
/// chain is climbed until an explicit value settles it either way.
pub fn is_editing_context(doc: &Document) -> bool {
    let Some(focused) = doc.focused() else {
        return false;
    };
    match doc.element_name(focused) {
        Some("textarea") => return true,
        Some("input") => {
            let kind = doc.attribute(focused, "type").unwrap_or("text");
            if !kind.eq_ignore_ascii_case("checkbox") && !kind.eq_ignore_ascii_case("radio") {
                return true;
            }
        }
        _ => {}
    }
    let mut current = Some(focused);
    while let Some(key) = current {
        if doc.has_attribute(key, "contenteditable") {
            return !matches!(doc.attribute(key, "contenteditable"), Some("false"));
        }
        current = doc.parent(key);
    }
    false
}
