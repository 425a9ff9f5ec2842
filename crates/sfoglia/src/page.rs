//! The page controller.
//!
//! [`Page`] owns every component handle, resolved once by [`Page::init`].
//! Hosts forward events through [`Page::dispatch`] and act on the returned
//! [`Response`] for the few things only they can do (cancel the native
//! event, schedule a frame, talk to the clipboard, run timers).

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clipboard::CodeCopy;
use crate::dom::{Dom, Viewport};
use crate::effects::{
    apply_parallax, apply_tilt, prepare_reveal, reset_tilt, reveal, spawn_ripple,
    EffectsProfile, RIPPLE_DURATION,
};
use crate::keys::{Shortcut, SHORTCUT_HINT};
use crate::menu::MobileMenu;
use crate::quiz::select_option;
use crate::scroll::{
    highlight_active_section, highlight_sidebar, install_or_warn, jump_to_anchor, FrameThrottle,
    ReadingProgress, ScrollToTop,
};
use crate::search::{FilterOutcome, SearchFilter, SEARCH_INPUT_ID};
use crate::sections::{expand_all, toggle_section};
use crate::theme::{PreferenceStore, Theme, ThemeSwitch};
use crate::wiring::Action;

/// A DOM event, reduced to what the handlers read.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent<N> {
    /// `target` is where the click originated, `current` the element the
    /// listener sits on (`None` for document listeners). `x`/`y` are
    /// relative to `current`.
    Click {
        target: N,
        current: Option<N>,
        x: f64,
        y: f64,
    },
    Input {
        value: String,
    },
    Scroll,
    Key {
        key: String,
        ctrl: bool,
        meta: bool,
    },
    BeforePrint,
    Load {
        elapsed_ms: f64,
    },
    /// Pointer position relative to `current`.
    PointerMove {
        current: N,
        x: f64,
        y: f64,
    },
    PointerLeave {
        current: N,
    },
}

impl<N> UiEvent<N> {
    fn current(&self) -> Option<&N> {
        match self {
            Self::Click { current, .. } => current.as_ref(),
            Self::PointerMove { current, .. } | Self::PointerLeave { current } => Some(current),
            _ => None,
        }
    }
}

/// Work left to the host after a handler ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<N> {
    /// Cancel the browser's default action.
    pub prevent_default: bool,
    /// Schedule [`Page::on_animation_frame`].
    pub request_frame: bool,
    /// Copy code block `n` via [`CodeCopy::copy`].
    pub copy: Option<usize>,
    /// Remove this node after the given delay.
    pub remove_after: Option<(N, Duration)>,
}

impl<N> Default for Response<N> {
    fn default() -> Self {
        Self {
            prevent_default: false,
            request_frame: false,
            copy: None,
            remove_after: None,
        }
    }
}

#[derive(Debug)]
pub struct Page<D: Dom, S> {
    profile: EffectsProfile,
    theme: ThemeSwitch<D, S>,
    menu: Option<MobileMenu<D>>,
    search_input: Option<D::Node>,
    search: Option<SearchFilter<D>>,
    code_copy: Option<CodeCopy<D>>,
    scroll_top: Option<ScrollToTop<D>>,
    progress: Option<ReadingProgress<D>>,
    throttle: FrameThrottle,
    observed: Vec<D::Node>,
}

impl<D: Dom, S: PreferenceStore> Page<D, S> {
    /// Resolves every component against the loaded document, applies the
    /// persisted theme and installs the generated controls. Features whose
    /// elements are missing stay inert.
    pub fn init<V: Viewport>(dom: &D, viewport: &V, store: S, profile: EffectsProfile) -> Self {
        let theme = ThemeSwitch::attach(dom, store);
        let applied = theme.load(dom);

        let search_input = dom.element_by_id(SEARCH_INPUT_ID);
        let search = search_input
            .as_ref()
            .and_then(|_| SearchFilter::attach(dom));

        let code_copy = CodeCopy::install(dom)
            .map_err(|e| warn!(error = %e, "Failed to install copy buttons"))
            .ok();

        let page = Self {
            profile,
            menu: MobileMenu::attach(dom),
            search_input,
            search,
            code_copy,
            scroll_top: install_or_warn("scroll-to-top", ScrollToTop::install(dom)),
            progress: install_or_warn("reading-progress", ReadingProgress::install(dom)),
            throttle: FrameThrottle::new(),
            observed: prepare_reveal(dom, profile),
            theme,
        };

        let highlighted = highlight_sidebar(dom, viewport);
        info!(
            theme = %applied,
            profile = profile.as_str(),
            cards = page.search.as_ref().map_or(0, SearchFilter::len),
            code_blocks = page.code_copy.as_ref().map_or(0, CodeCopy::len),
            highlighted,
            "Page initialized"
        );
        info!("{SHORTCUT_HINT}");
        page
    }

    pub fn profile(&self) -> EffectsProfile {
        self.profile
    }

    pub fn theme(&self) -> &ThemeSwitch<D, S> {
        &self.theme
    }

    pub fn code_copy(&self) -> Option<&CodeCopy<D>> {
        self.code_copy.as_ref()
    }

    /// Elements waiting for the reveal animation.
    pub fn observed(&self) -> &[D::Node] {
        &self.observed
    }

    pub fn reveal(&self, dom: &D, node: &D::Node, batch_index: usize) {
        reveal(dom, node, batch_index, self.profile);
    }

    /// Runs the filter directly; `None` when the page has no search.
    pub fn search(&mut self, dom: &D, raw: &str) -> Option<FilterOutcome> {
        let filter = self.search.as_mut()?;
        Some(filter.on_query_change(dom, raw))
    }

    /// Records a newly scheduled frame, returning the superseded one for
    /// the host to cancel.
    pub fn frame_scheduled(&mut self, handle: i32) -> Option<i32> {
        self.throttle.replace(handle)
    }

    pub fn on_animation_frame<V: Viewport>(&mut self, dom: &D, viewport: &V) {
        self.throttle.complete();
        highlight_active_section(dom, viewport);
    }

    pub fn dispatch<V: Viewport>(
        &mut self,
        dom: &D,
        viewport: &V,
        action: Action,
        event: &UiEvent<D::Node>,
    ) -> Response<D::Node> {
        let mut response = Response::default();
        match action {
            Action::ToggleTheme => {
                self.theme.toggle(dom);
            }
            Action::ToggleMenu => {
                if let Some(menu) = &self.menu {
                    menu.toggle(dom);
                }
            }
            Action::CloseMenu => {
                if let Some(menu) = &self.menu {
                    menu.close(dom);
                }
            }
            Action::OutsideClick => {
                if let (Some(menu), UiEvent::Click { target, .. }) = (&self.menu, event) {
                    menu.on_document_click(dom, target);
                }
            }
            Action::Search => {
                if let UiEvent::Input { value } = event {
                    self.search(dom, value);
                }
            }
            Action::JumpToAnchor => {
                if let Some(href) = event.current().and_then(|a| dom.attribute(a, "href")) {
                    response.prevent_default = jump_to_anchor(dom, viewport, &href);
                }
            }
            Action::Scroll => {
                let scroll_y = viewport.scroll_y();
                if let Some(button) = &self.scroll_top {
                    button.update(dom, scroll_y);
                }
                if let Some(bar) = &self.progress {
                    bar.update(dom, viewport);
                }
                if self.profile.is_enhanced() {
                    apply_parallax(dom, scroll_y);
                }
                response.request_frame = true;
            }
            Action::ToggleSection => {
                if let Some(button) = event.current() {
                    toggle_section(dom, button);
                }
            }
            Action::SelectQuizOption => {
                if let Some(option) = event.current() {
                    select_option(dom, option);
                }
            }
            Action::CopyCode => {
                response.copy = event
                    .current()
                    .zip(self.code_copy.as_ref())
                    .and_then(|(button, copy)| copy.index_of(button));
            }
            Action::ScrollToTop => {
                if let Some(button) = &self.scroll_top {
                    button.activate(viewport);
                }
            }
            Action::Shortcut => {
                if let UiEvent::Key { key, ctrl, meta } = event {
                    if let Some(shortcut) = Shortcut::from_key(key, *ctrl, *meta) {
                        self.run_shortcut(dom, shortcut);
                        response.prevent_default = true;
                    }
                }
            }
            Action::PrepareForPrint => {
                let expanded = expand_all(dom);
                debug!(expanded, "Expanded sections for print");
            }
            Action::Loaded => {
                if let UiEvent::Load { elapsed_ms } = event {
                    info!(elapsed_ms = *elapsed_ms, "Page loaded");
                }
            }
            Action::Tilt => {
                if let UiEvent::PointerMove { current, x, y } = event {
                    apply_tilt(dom, current, *x, *y);
                }
            }
            Action::ResetTilt => {
                if let Some(card) = event.current() {
                    reset_tilt(dom, card);
                }
            }
            Action::Ripple => {
                if let UiEvent::Click {
                    current: Some(button),
                    x,
                    y,
                    ..
                } = event
                {
                    match spawn_ripple(dom, button, *x, *y) {
                        Ok(circle) => response.remove_after = Some((circle, RIPPLE_DURATION)),
                        Err(e) => warn!(error = %e, "Failed to spawn ripple"),
                    }
                }
            }
        }
        response
    }

    fn run_shortcut(&self, dom: &D, shortcut: Shortcut) {
        match shortcut {
            Shortcut::FocusSearch => {
                if let Some(input) = &self.search_input {
                    dom.focus(input);
                }
            }
            Shortcut::ToggleTheme => {
                let theme: Theme = self.theme.toggle(dom);
                debug!(theme = %theme, "Theme toggled from keyboard");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{el, Document, NodeId};
    use crate::theme::{MemoryStore, THEME_KEY};

    fn page_doc() -> Document {
        let doc = Document::new();
        let body = doc.body_id();
        doc.append(
            &body,
            el("nav")
                .class("navbar")
                .child(el("button").id("themeToggle"))
                .child(el("button").id("mobileMenuToggle"))
                .child(
                    el("ul")
                        .class("nav-links")
                        .child(el("a").class("nav-link").attr("href", "#about").text("About")),
                ),
        );
        doc.append(&body, el("input").id("searchInput"));
        doc.append(
            &body,
            el("div").id("chaptersGrid").child(
                el("a")
                    .class("chapter-card")
                    .child(el("h3").class("chapter-title").text("Storage"))
                    .child(el("p").class("chapter-description").text("Disks"))
                    .child(el("span").class("topic-tag").text("LVM")),
            ),
        );
        doc.append(&body, el("section").id("about").text("About"));
        doc.append(&body, el("pre").child(el("code").text("ls -la")));
        doc.append(&body, el("button").class("btn").text("Start"));
        doc.set_viewport(0.0, 800.0, 3000.0);
        doc
    }

    fn click(target: NodeId, current: Option<NodeId>) -> UiEvent<NodeId> {
        UiEvent::Click {
            target,
            current,
            x: 0.0,
            y: 0.0,
        }
    }

    #[test]
    fn test_init_applies_stored_theme() {
        let doc = page_doc();
        let store = MemoryStore::new();
        store.save(THEME_KEY, "dark").unwrap();

        let page = Page::init(&doc, &doc, store, EffectsProfile::Basic);

        assert_eq!(page.theme().current(&doc), Theme::Dark);
        assert_eq!(page.code_copy().map(CodeCopy::len), Some(1));
    }

    #[test]
    fn test_init_keeps_generated_theme_with_empty_store() {
        let doc = page_doc();
        doc.set_attribute(&doc.root(), "data-theme", "dark");

        let page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

        assert_eq!(page.theme().current(&doc), Theme::Dark);
        assert_eq!(doc.attribute(&doc.root(), "data-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_dispatch_search_filters_cards() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

        let response = page.dispatch(
            &doc,
            &doc,
            Action::Search,
            &UiEvent::Input {
                value: "nothing here".to_string(),
            },
        );

        assert_eq!(response, Response::default());
        assert!(SearchFilter::notice_present(&doc));
    }

    #[test]
    fn test_dispatch_anchor_prevents_default() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);
        let link = doc.find(&crate::dom::Selector::Class("nav-link")).unwrap();

        let response = page.dispatch(&doc, &doc, Action::JumpToAnchor, &click(link, Some(link)));

        assert!(response.prevent_default);
        assert_eq!(doc.scroll_requests().len(), 1);
    }

    #[test]
    fn test_dispatch_copy_reports_block_index() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);
        let button = page.code_copy().unwrap().buttons().next().unwrap().clone();

        let response = page.dispatch(&doc, &doc, Action::CopyCode, &click(button, Some(button)));

        assert_eq!(response.copy, Some(0));
    }

    #[test]
    fn test_dispatch_scroll_requests_frame() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);
        doc.set_scroll_y(500.0);

        let response = page.dispatch(&doc, &doc, Action::Scroll, &UiEvent::Scroll);

        assert!(response.request_frame);
        let button = doc.find(&crate::dom::Selector::Class("scroll-to-top")).unwrap();
        assert_eq!(doc.style(&button, "display"), "block");
    }

    #[test]
    fn test_frame_throttle_returns_superseded_handle() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

        assert_eq!(page.frame_scheduled(1), None);
        assert_eq!(page.frame_scheduled(2), Some(1));
        page.on_animation_frame(&doc, &doc);
        assert_eq!(page.frame_scheduled(3), None);
    }

    #[test]
    fn test_shortcut_focuses_search() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

        let response = page.dispatch(
            &doc,
            &doc,
            Action::Shortcut,
            &UiEvent::Key {
                key: "k".to_string(),
                ctrl: true,
                meta: false,
            },
        );

        assert!(response.prevent_default);
        assert_eq!(doc.focused(), doc.element_by_id("searchInput"));
    }

    #[test]
    fn test_unbound_key_passes_through() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

        let response = page.dispatch(
            &doc,
            &doc,
            Action::Shortcut,
            &UiEvent::Key {
                key: "s".to_string(),
                ctrl: true,
                meta: false,
            },
        );

        assert!(!response.prevent_default);
    }

    #[test]
    fn test_ripple_scheduled_for_removal() {
        let doc = page_doc();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Enhanced);
        let button = doc.find(&crate::dom::Selector::Class("btn")).unwrap();

        let response = page.dispatch(&doc, &doc, Action::Ripple, &click(button, Some(button)));

        let (circle, delay) = response.remove_after.unwrap();
        assert_eq!(delay, RIPPLE_DURATION);
        assert_eq!(doc.parent(&circle), Some(button));
    }

    #[test]
    fn test_missing_features_are_inert() {
        let doc = Document::new();
        let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

        let body = doc.body_id();
        for action in [Action::ToggleMenu, Action::CloseMenu, Action::CopyCode] {
            assert_eq!(
                page.dispatch(&doc, &doc, action, &click(body, Some(body))),
                Response::default()
            );
        }
        assert!(page.search(&doc, "x").is_none());
    }
}
