//! [`Dom`] and [`Viewport`] over the live page.

use sfoglia::{Dom, Selector, Viewport};
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::error::{dom_error, WebError};

#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    root: Element,
}

impl WebDom {
    pub fn new() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document = window.document().ok_or(WebError::DomUnavailable)?;
        let root = document
            .document_element()
            .ok_or(WebError::DomUnavailable)?;
        Ok(Self {
            window,
            document,
            root,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn html(node: &Element) -> Option<&HtmlElement> {
    node.dyn_ref::<HtmlElement>()
}

impl Dom for WebDom {
    type Node = Element;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, scope: &Element, selector: &Selector) -> Vec<Element> {
        let css = selector.to_string();
        let Ok(list) = scope.query_selector_all(&css) else {
            debug!(selector = %css, "Invalid selector");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn closest(&self, node: &Element, selector: &Selector) -> Option<Element> {
        node.closest(&selector.to_string()).ok().flatten()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn next_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            debug!(error = %WebError::from(e), attribute = name, "set_attribute rejected");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn toggle_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or(false)
    }

    fn style(&self, node: &Element, property: &str) -> String {
        html(node)
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(el) = html(node) else {
            return;
        };
        let style = el.style();
        let outcome = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(e) = outcome {
            debug!(error = %WebError::from(e), property, "Style rejected");
        }
    }

    fn create_element(&self, tag: &str) -> sfoglia::Result<Element> {
        self.document.create_element(tag).map_err(dom_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> sfoglia::Result<()> {
        parent.append_child(child).map(|_| ()).map_err(dom_error)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn offset_top(&self, node: &Element) -> f64 {
        html(node).map_or(0.0, |el| f64::from(el.offset_top()))
    }

    fn offset_height(&self, node: &Element) -> f64 {
        html(node).map_or(0.0, |el| f64::from(el.offset_height()))
    }

    fn client_size(&self, node: &Element) -> (f64, f64) {
        let rect = node.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn focus(&self, node: &Element) {
        if let Some(el) = html(node) {
            let _ = el.focus();
        }
    }
}

impl Viewport for WebDom {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn inner_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.root.scroll_height())
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }
}
