//! Collapsible navigation panel for narrow screens.

use tracing::debug;

use crate::dom::{Dom, Selector};

pub const MENU_TOGGLE_ID: &str = "mobileMenuToggle";
pub const NAV_LINKS_CLASS: &str = "nav-links";
pub const NAV_LINK_CLASS: &str = "nav-link";
const ACTIVE_CLASS: &str = "active";

#[derive(Debug)]
pub struct MobileMenu<D: Dom> {
    toggle: D::Node,
    panel: D::Node,
}

impl<D: Dom> MobileMenu<D> {
    /// Requires both `#mobileMenuToggle` and `.nav-links`.
    pub fn attach(dom: &D) -> Option<Self> {
        let toggle = dom.element_by_id(MENU_TOGGLE_ID)?;
        let panel = dom.find(&Selector::Class(NAV_LINKS_CLASS))?;
        Some(Self { toggle, panel })
    }

    pub fn is_open(&self, dom: &D) -> bool {
        dom.has_class(&self.panel, ACTIVE_CLASS)
    }

    pub fn toggle(&self, dom: &D) -> bool {
        let open = dom.toggle_class(&self.panel, ACTIVE_CLASS);
        if open {
            dom.add_class(&self.toggle, ACTIVE_CLASS);
        } else {
            dom.remove_class(&self.toggle, ACTIVE_CLASS);
        }
        debug!(open, "Mobile menu toggled");
        open
    }

    pub fn close(&self, dom: &D) {
        dom.remove_class(&self.panel, ACTIVE_CLASS);
        dom.remove_class(&self.toggle, ACTIVE_CLASS);
    }

    /// Closes the menu unless the click landed on the toggle or inside the panel.
    pub fn on_document_click(&self, dom: &D, target: &D::Node) {
        if !dom.contains(&self.toggle, target) && !dom.contains(&self.panel, target) {
            self.close(dom);
        }
    }

    /// The toggle button, for listener registration.
    pub fn toggle_button(&self) -> &D::Node {
        &self.toggle
    }
}
