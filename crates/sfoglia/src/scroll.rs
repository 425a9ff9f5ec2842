//! Scroll-driven behaviors: anchor navigation, section highlighting, the
//! scroll-to-top button and the reading progress bar.

use tracing::{debug, warn};

use crate::dom::{Dom, Selector, Viewport};
use crate::error::Result;

/// Gap kept between the navbar and a scrolled-to target.
pub const SCROLL_MARGIN: f64 = 20.0;
/// How far above a section its highlight starts.
pub const SECTION_LEAD: f64 = 100.0;
/// Scroll distance past which the scroll-to-top button appears.
pub const SCROLL_TOP_THRESHOLD: f64 = 300.0;

const NAVBAR_CLASS: &str = "navbar";
const NAV_LINK_CLASS: &str = "nav-link";
const ACTIVE_CLASS: &str = "active";
const SCROLL_TOP_CLASS: &str = "scroll-to-top";
const PROGRESS_CLASS: &str = "reading-progress";

/// Anchors that jump within the page.
pub fn hash_links() -> Selector {
    Selector::AnyOf(vec![
        Selector::AttrPrefix {
            tag: "a",
            attr: "href",
            prefix: "#",
        },
        Selector::within(Selector::Class("toc-list"), Selector::Tag("a")),
    ])
}

/// Where to scroll so a target at `target_top` clears a navbar of
/// `navbar_height`.
pub fn scroll_offset(target_top: f64, navbar_height: f64) -> f64 {
    target_top - navbar_height - SCROLL_MARGIN
}

/// Handles a click on an in-page anchor. Returns whether the browser's
/// default navigation should be suppressed.
pub fn jump_to_anchor<D, V>(dom: &D, viewport: &V, href: &str) -> bool
where
    D: Dom,
    V: Viewport,
{
    let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
        return false;
    };

    if let Some(target) = dom.element_by_id(id) {
        let navbar_height = dom
            .find(&Selector::Class(NAVBAR_CLASS))
            .map(|navbar| dom.offset_height(&navbar))
            .unwrap_or(0.0);
        let top = scroll_offset(dom.offset_top(&target), navbar_height);
        debug!(target = id, top, "Smooth scroll");
        viewport.scroll_to(top);
    }
    true
}

/// Geometry of a `section[id]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The section under `scroll_y`. When ranges overlap the later section wins.
pub fn active_section(sections: &[SectionBox], scroll_y: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|s| {
            let start = s.top - SECTION_LEAD;
            scroll_y >= start && scroll_y < start + s.height
        })
        .last()
        .map(|s| s.id.as_str())
}

/// Updates `.nav-link` emphasis to follow the section in view.
pub fn highlight_active_section<D, V>(dom: &D, viewport: &V) -> Option<String>
where
    D: Dom,
    V: Viewport,
{
    let sections: Vec<SectionBox> = dom
        .find_all(&Selector::TagWithAttr("section", "id"))
        .iter()
        .map(|node| SectionBox {
            id: dom.attribute(node, "id").unwrap_or_default(),
            top: dom.offset_top(node),
            height: dom.offset_height(node),
        })
        .collect();
    if sections.is_empty() {
        return None;
    }

    let current = active_section(&sections, viewport.scroll_y()).map(str::to_string);
    let wanted = current.as_deref().map(|id| format!("#{id}"));
    for link in dom.find_all(&Selector::Class(NAV_LINK_CLASS)) {
        if wanted.is_some() && dom.attribute(&link, "href") == wanted {
            dom.add_class(&link, ACTIVE_CLASS);
        } else {
            dom.remove_class(&link, ACTIVE_CLASS);
        }
    }
    current
}

/// Marks `.sidebar-nav a` entries whose href occurs in the current path.
pub fn highlight_sidebar<D, V>(dom: &D, viewport: &V) -> usize
where
    D: Dom,
    V: Viewport,
{
    let path = viewport.pathname();
    let mut marked = 0;
    for link in dom.find_all(&Selector::within(
        Selector::Class("sidebar-nav"),
        Selector::Tag("a"),
    )) {
        match dom.attribute(&link, "href") {
            Some(href) if !href.is_empty() && path.contains(&href) => {
                dom.add_class(&link, ACTIVE_CLASS);
                marked += 1;
            }
            _ => {}
        }
    }
    marked
}

/// Coalesces scroll events into at most one update per animation frame.
///
/// The host hands over each frame request handle; a previous pending handle
/// is returned so the host can cancel it.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: Option<i32>,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `handle` as the pending frame and returns the one it replaces.
    pub fn replace(&mut self, handle: i32) -> Option<i32> {
        self.pending.replace(handle)
    }

    /// Marks the pending frame as run.
    pub fn complete(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Floating button returning the reader to the top of the page.
#[derive(Debug)]
pub struct ScrollToTop<D: Dom> {
    button: D::Node,
}

impl<D: Dom> ScrollToTop<D> {
    /// Appends the (hidden) button to `<body>`.
    pub fn install(dom: &D) -> Result<Option<Self>> {
        let Some(body) = dom.body() else {
            return Ok(None);
        };
        let button = dom.create_element("button")?;
        dom.set_text(&button, "↑");
        dom.set_attribute(&button, "class", SCROLL_TOP_CLASS);
        dom.set_attribute(&button, "aria-label", "Scroll to top");
        dom.set_style(&button, "display", "none");
        dom.append_child(&body, &button)?;
        Ok(Some(Self { button }))
    }

    pub fn button(&self) -> &D::Node {
        &self.button
    }

    /// Shows the button once the reader is past [`SCROLL_TOP_THRESHOLD`].
    pub fn update(&self, dom: &D, scroll_y: f64) {
        let display = if scroll_y > SCROLL_TOP_THRESHOLD {
            "block"
        } else {
            "none"
        };
        dom.set_style(&self.button, "display", display);
    }

    pub fn activate<V: Viewport>(&self, viewport: &V) {
        viewport.scroll_to(0.0);
    }
}

/// Share of the page already scrolled past, as a percentage in `0..=100`.
///
/// Pages that fit the viewport report 0.
pub fn progress_percent(scroll_y: f64, scroll_height: f64, inner_height: f64) -> f64 {
    let scrollable = scroll_height - inner_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Thin bar across the top of the window tracking [`progress_percent`].
#[derive(Debug)]
pub struct ReadingProgress<D: Dom> {
    bar: D::Node,
}

impl<D: Dom> ReadingProgress<D> {
    pub fn install(dom: &D) -> Result<Option<Self>> {
        let Some(body) = dom.body() else {
            return Ok(None);
        };
        let bar = dom.create_element("div")?;
        dom.set_attribute(&bar, "class", PROGRESS_CLASS);
        dom.set_style(&bar, "width", "0%");
        dom.append_child(&body, &bar)?;
        Ok(Some(Self { bar }))
    }

    pub fn update<V: Viewport>(&self, dom: &D, viewport: &V) -> f64 {
        let progress = progress_percent(
            viewport.scroll_y(),
            viewport.scroll_height(),
            viewport.inner_height(),
        );
        dom.set_style(&self.bar, "width", &format!("{progress}%"));
        progress
    }
}

/// Installs a body-level control, logging instead of failing page setup.
pub(crate) fn install_or_warn<T>(what: &str, installed: Result<Option<T>>) -> Option<T> {
    installed.unwrap_or_else(|e| {
        warn!(error = %e, control = what, "Failed to install control");
        None
    })
}
