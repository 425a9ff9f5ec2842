//! Expand/collapse blocks driven by `.expand-toggle` buttons.
//!
//! The collapsible content is the element right after its button.

use crate::dom::{Dom, Selector};

pub const EXPAND_TOGGLE_CLASS: &str = "expand-toggle";
pub const EXPAND_LABEL: &str = "▶ Expand";
pub const COLLAPSE_LABEL: &str = "▼ Collapse";

/// Flips one section. Returns the new expanded state.
pub fn toggle_section<D: Dom>(dom: &D, button: &D::Node) -> bool {
    let was_expanded = dom.attribute(button, "aria-expanded").as_deref() == Some("true");
    let expanded = !was_expanded;

    dom.set_attribute(button, "aria-expanded", if expanded { "true" } else { "false" });
    if let Some(content) = dom.next_sibling(button) {
        dom.set_style(&content, "display", if expanded { "block" } else { "none" });
    }
    dom.set_text(button, if expanded { COLLAPSE_LABEL } else { EXPAND_LABEL });
    expanded
}

/// Reveals every collapsible block, e.g. before printing. Button state is left
/// alone so the page reads the same after the print dialog closes.
pub fn expand_all<D: Dom>(dom: &D) -> usize {
    let mut shown = 0;
    for button in dom.find_all(&Selector::Class(EXPAND_TOGGLE_CLASS)) {
        if let Some(content) = dom.next_sibling(&button) {
            dom.set_style(&content, "display", "block");
            shown += 1;
        }
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{el, Document, NodeId};

    fn page() -> (Document, NodeId, NodeId) {
        let doc = Document::new();
        let wrapper = doc.append(
            &doc.body_id(),
            el("div")
                .class("expandable")
                .child(
                    el("button")
                        .class(EXPAND_TOGGLE_CLASS)
                        .attr("aria-expanded", "false")
                        .text(EXPAND_LABEL),
                )
                .child(el("div").class("expand-content").text("Hidden details")),
        );
        let children = doc.children(&wrapper);
        (doc, children[0], children[1])
    }

    #[test]
    fn test_toggle_expands_then_collapses() {
        let (doc, button, content) = page();

        assert!(toggle_section(&doc, &button));
        assert_eq!(doc.attribute(&button, "aria-expanded").as_deref(), Some("true"));
        assert_eq!(doc.style(&content, "display"), "block");
        assert_eq!(doc.text(&button), COLLAPSE_LABEL);

        assert!(!toggle_section(&doc, &button));
        assert_eq!(doc.attribute(&button, "aria-expanded").as_deref(), Some("false"));
        assert_eq!(doc.style(&content, "display"), "none");
        assert_eq!(doc.text(&button), EXPAND_LABEL);
    }

    #[test]
    fn test_missing_aria_counts_as_collapsed() {
        let doc = Document::new();
        let button = doc.append(&doc.body_id(), el("button").class(EXPAND_TOGGLE_CLASS));
        assert!(toggle_section(&doc, &button));
    }

    #[test]
    fn test_expand_all_for_print() {
        let (doc, button, content) = page();
        doc.append(&doc.body_id(), el("button").class(EXPAND_TOGGLE_CLASS));

        assert_eq!(expand_all(&doc), 1);
        assert_eq!(doc.style(&content, "display"), "block");
        assert_eq!(doc.attribute(&button, "aria-expanded").as_deref(), Some("false"));
    }
}
