//! In-memory document used for headless runs and tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::dom::{Dom, Selector, Viewport};
use crate::error::Result;

/// Handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    top: f64,
    height: f64,
    client_width: f64,
    client_height: f64,
}

/// Declarative description of an element subtree, appended with
/// [`Document::append`].
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ElementSpec>,
}

/// Starts an [`ElementSpec`] for `tag`.
pub fn el(tag: &str) -> ElementSpec {
    ElementSpec {
        tag: tag.to_string(),
        ..ElementSpec::default()
    }
}

impl ElementSpec {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A minimal element tree plus window scroll state.
///
/// Layout is not computed; tests assign offsets with [`Document::set_layout`]
/// and scroll metrics with [`Document::set_viewport`].
#[derive(Debug)]
pub struct Document {
    nodes: RefCell<Vec<Element>>,
    body: NodeId,
    scroll_y: Cell<f64>,
    inner_height: Cell<f64>,
    scroll_height: Cell<f64>,
    pathname: RefCell<String>,
    focused: Cell<Option<NodeId>>,
    scroll_requests: RefCell<Vec<f64>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty `<html><body></body></html>`.
    pub fn new() -> Self {
        let root = Element {
            tag: "html".to_string(),
            children: vec![NodeId(1)],
            ..Element::default()
        };
        let body = Element {
            tag: "body".to_string(),
            parent: Some(NodeId(0)),
            ..Element::default()
        };
        Self {
            nodes: RefCell::new(vec![root, body]),
            body: NodeId(1),
            scroll_y: Cell::new(0.0),
            inner_height: Cell::new(0.0),
            scroll_height: Cell::new(0.0),
            pathname: RefCell::new("/".to_string()),
            focused: Cell::new(None),
            scroll_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Appends the subtree described by `spec` under `parent`.
    pub fn append(&self, parent: &NodeId, spec: ElementSpec) -> NodeId {
        let id = self.insert(spec.tag.as_str());
        {
            let mut nodes = self.nodes.borrow_mut();
            let element = &mut nodes[id.0];
            element.classes = spec.classes;
            for (name, value) in spec.attributes {
                element.attributes.insert(name, value);
            }
            if let Some(text) = spec.text {
                element.text = text;
            }
        }
        self.attach(parent, id);
        for child in spec.children {
            self.append(&id, child);
        }
        id
    }

    /// Assigns `offsetTop` / `offsetHeight`.
    pub fn set_layout(&self, node: &NodeId, top: f64, height: f64) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[node.0].top = top;
        nodes[node.0].height = height;
    }

    /// Assigns `clientWidth` / `clientHeight`.
    pub fn set_client_size(&self, node: &NodeId, width: f64, height: f64) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[node.0].client_width = width;
        nodes[node.0].client_height = height;
    }

    pub fn set_viewport(&self, scroll_y: f64, inner_height: f64, scroll_height: f64) {
        self.scroll_y.set(scroll_y);
        self.inner_height.set(inner_height);
        self.scroll_height.set(scroll_height);
    }

    pub fn set_scroll_y(&self, scroll_y: f64) {
        self.scroll_y.set(scroll_y);
    }

    pub fn set_pathname(&self, pathname: &str) {
        *self.pathname.borrow_mut() = pathname.to_string();
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    /// Every target passed to [`Viewport::scroll_to`], oldest first.
    pub fn scroll_requests(&self) -> Vec<f64> {
        self.scroll_requests.borrow().clone()
    }

    pub fn tag(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    fn insert(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Element {
            tag: tag.to_string(),
            ..Element::default()
        });
        NodeId(nodes.len() - 1)
    }

    fn attach(&self, parent: &NodeId, child: NodeId) {
        self.detach(&child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[parent.0].children.push(child);
        nodes[child.0].parent = Some(*parent);
    }

    fn detach(&self, node: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| c != node);
        }
    }

    /// Pre-order descendants of `scope`, excluding `scope`.
    fn descendants(&self, scope: &NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn ancestors(&self, node: &NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut current = nodes[node.0].parent;
        while let Some(parent) = current {
            out.push(parent);
            current = nodes[parent.0].parent;
        }
        out
    }

    fn matches(&self, node: &NodeId, selector: &Selector) -> bool {
        match selector {
            Selector::Within(outer, inner) => {
                self.matches(node, inner)
                    && self.ancestors(node).iter().any(|a| self.matches(a, outer))
            }
            Selector::AnyOf(list) => list.iter().any(|s| self.matches(node, s)),
            simple => {
                let nodes = self.nodes.borrow();
                let element = &nodes[node.0];
                match simple {
                    Selector::Id(id) => element.attributes.get("id").is_some_and(|v| v == id),
                    Selector::Class(class) => element.classes.iter().any(|c| c == class),
                    Selector::Tag(tag) => element.tag == *tag,
                    Selector::TagWithAttr(tag, attr) => {
                        element.tag == *tag && element.attributes.contains_key(*attr)
                    }
                    Selector::AttrPrefix { tag, attr, prefix } => {
                        element.tag == *tag
                            && element
                                .attributes
                                .get(*attr)
                                .is_some_and(|v| v.starts_with(prefix))
                    }
                    Selector::Within(..) | Selector::AnyOf(_) => false,
                }
            }
        }
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut found = None;
        for node in self.descendants(&self.root()) {
            if nodes[node.0].attributes.get("id").is_some_and(|v| v == id) {
                found = Some(node);
                break;
            }
        }
        found
    }

    fn query_all(&self, scope: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.matches(n, selector))
            .collect()
    }

    fn closest(&self, node: &NodeId, selector: &Selector) -> Option<NodeId> {
        if self.matches(node, selector) {
            return Some(*node);
        }
        self.ancestors(node)
            .into_iter()
            .find(|a| self.matches(a, selector))
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(&parent);
        let idx = siblings.iter().position(|s| s == node)?;
        siblings.get(idx + 1).copied()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(ancestor)
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = self.nodes.borrow()[node.0].text.clone();
        for child in self.children(node) {
            out.push_str(&self.text(&child));
        }
        out
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        for child in self.children(node) {
            self.detach(&child);
        }
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let element = &nodes[node.0];
        if name == "class" {
            return (!element.classes.is_empty()).then(|| element.classes.join(" "));
        }
        element.attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let element = &mut nodes[node.0];
        if name == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.nodes.borrow()[node.0]
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        Ok(self.insert(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.attach(parent, *child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.detach(node);
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].top
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].height
    }

    fn client_size(&self, node: &NodeId) -> (f64, f64) {
        let nodes = self.nodes.borrow();
        (nodes[node.0].client_width, nodes[node.0].client_height)
    }

    fn focus(&self, node: &NodeId) {
        self.focused.set(Some(*node));
    }
}

impl Viewport for Document {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn inner_height(&self) -> f64 {
        self.inner_height.get()
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height.get()
    }

    fn scroll_to(&self, top: f64) {
        self.scroll_requests.borrow_mut().push(top);
        self.scroll_y.set(top);
    }

    fn pathname(&self) -> String {
        self.pathname.borrow().clone()
    }
}
