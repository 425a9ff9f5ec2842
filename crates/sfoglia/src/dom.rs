//! DOM abstraction shared by the in-memory [`Document`](crate::Document) and
//! the browser binding.
//!
//! All methods take `&self`: the host is single-threaded and every
//! implementation mutates through interior mutability, the same way the
//! browser's own element handles behave.

use std::fmt;

use crate::error::Result;

/// Element selector understood by every [`Dom`] implementation.
///
/// Only the handful of shapes the page actually needs are modeled. The
/// [`Display`](fmt::Display) impl renders the equivalent CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(&'static str),
    /// `.class`
    Class(&'static str),
    /// `tag`
    Tag(&'static str),
    /// `tag[attr]`
    TagWithAttr(&'static str, &'static str),
    /// `tag[attr^="prefix"]`
    AttrPrefix {
        tag: &'static str,
        attr: &'static str,
        prefix: &'static str,
    },
    /// Descendant combinator: `outer inner`
    Within(Box<Selector>, Box<Selector>),
    /// Selector list: `a, b, c`
    AnyOf(Vec<Selector>),
}

impl Selector {
    /// `outer inner`
    pub fn within(outer: Selector, inner: Selector) -> Self {
        Self::Within(Box::new(outer), Box::new(inner))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::TagWithAttr(tag, attr) => write!(f, "{tag}[{attr}]"),
            Self::AttrPrefix { tag, attr, prefix } => write!(f, "{tag}[{attr}^=\"{prefix}\"]"),
            Self::Within(outer, inner) => write!(f, "{outer} {inner}"),
            Self::AnyOf(list) => {
                for (idx, selector) in list.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{selector}")?;
                }
                Ok(())
            }
        }
    }
}

/// The subset of the DOM the page behaviors touch.
pub trait Dom {
    /// Handle to an element.
    type Node: Clone + PartialEq + fmt::Debug;

    /// The document element (`<html>`).
    fn root(&self) -> Self::Node;

    fn body(&self) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

    fn query(&self, scope: &Self::Node, selector: &Selector) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Document-wide [`query_all`](Dom::query_all).
    fn find_all(&self, selector: &Selector) -> Vec<Self::Node> {
        self.query_all(&self.root(), selector)
    }

    fn find(&self, selector: &Selector) -> Option<Self::Node> {
        self.query(&self.root(), selector)
    }

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &Selector) -> Option<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children of `node`.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Next element sibling.
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Concatenated text of `node` and its descendants.
    fn text(&self, node: &Self::Node) -> String;

    /// Replaces the contents of `node` with `text`.
    fn set_text(&self, node: &Self::Node, text: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Flips `class` and returns whether it is now present.
    fn toggle_class(&self, node: &Self::Node, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    /// Inline style value, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;

    /// Sets an inline style; an empty value clears it.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn create_element(&self, tag: &str) -> Result<Self::Node>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Detaches `node` from the document. Detaching a detached node is a no-op.
    fn remove(&self, node: &Self::Node);

    fn offset_top(&self, node: &Self::Node) -> f64;

    fn offset_height(&self, node: &Self::Node) -> f64;

    /// `(clientWidth, clientHeight)`
    fn client_size(&self, node: &Self::Node) -> (f64, f64);

    fn focus(&self, node: &Self::Node);
}

/// Window-level scroll state.
pub trait Viewport {
    fn scroll_y(&self) -> f64;

    fn inner_height(&self) -> f64;

    /// Full scrollable height of the document.
    fn scroll_height(&self) -> f64;

    /// Smoothly scrolls the window so that `top` is at the top edge.
    fn scroll_to(&self, top: f64);

    fn pathname(&self) -> String;
}
