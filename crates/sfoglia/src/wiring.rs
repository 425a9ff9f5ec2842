//! The declarative listener table.
//!
//! A host walks [`bindings`] once after [`Page::init`](crate::Page::init),
//! attaches one listener per resolved element, and forwards every event to
//! [`Page::dispatch`](crate::Page::dispatch) with the binding's [`Action`].

use crate::dom::Selector;
use crate::effects::{ripple_targets, tilt_targets, EffectsProfile};
use crate::menu::{MENU_TOGGLE_ID, NAV_LINKS_CLASS, NAV_LINK_CLASS};
use crate::quiz::quiz_options;
use crate::scroll::hash_links;
use crate::search::SEARCH_INPUT_ID;
use crate::sections::EXPAND_TOGGLE_CLASS;
use crate::theme::THEME_TOGGLE_ID;

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The element with this id, if present.
    Id(&'static str),
    /// Every element matching the selector.
    Each(Selector),
    Document,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Input,
    Scroll,
    KeyDown,
    BeforePrint,
    Load,
    PointerMove,
    PointerLeave,
}

impl EventKind {
    /// DOM event type name.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::Scroll => "scroll",
            Self::KeyDown => "keydown",
            Self::BeforePrint => "beforeprint",
            Self::Load => "load",
            Self::PointerMove => "mousemove",
            Self::PointerLeave => "mouseleave",
        }
    }

    /// `load` fires once. A listener attached after the document completed
    /// would never run, so the host dispatches directly instead.
    pub fn already_fired(self, document_complete: bool) -> bool {
        self == Self::Load && document_complete
    }
}

/// Handler selected by a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    ToggleMenu,
    CloseMenu,
    OutsideClick,
    Search,
    JumpToAnchor,
    Scroll,
    ToggleSection,
    SelectQuizOption,
    CopyCode,
    ScrollToTop,
    Shortcut,
    PrepareForPrint,
    Loaded,
    Tilt,
    ResetTilt,
    Ripple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub trigger: Trigger,
    pub event: EventKind,
    pub action: Action,
}

impl Binding {
    fn new(trigger: Trigger, event: EventKind, action: Action) -> Self {
        Self {
            trigger,
            event,
            action,
        }
    }
}

/// Every listener the page needs under `profile`.
pub fn bindings(profile: EffectsProfile) -> Vec<Binding> {
    use Action as A;
    use EventKind as E;

    let mut table = vec![
        Binding::new(Trigger::Id(THEME_TOGGLE_ID), E::Click, A::ToggleTheme),
        Binding::new(Trigger::Id(MENU_TOGGLE_ID), E::Click, A::ToggleMenu),
        Binding::new(Trigger::Document, E::Click, A::OutsideClick),
        Binding::new(
            Trigger::Each(Selector::within(
                Selector::Class(NAV_LINKS_CLASS),
                Selector::Class(NAV_LINK_CLASS),
            )),
            E::Click,
            A::CloseMenu,
        ),
        Binding::new(Trigger::Id(SEARCH_INPUT_ID), E::Input, A::Search),
        Binding::new(Trigger::Each(hash_links()), E::Click, A::JumpToAnchor),
        Binding::new(Trigger::Window, E::Scroll, A::Scroll),
        Binding::new(
            Trigger::Each(Selector::Class(EXPAND_TOGGLE_CLASS)),
            E::Click,
            A::ToggleSection,
        ),
        Binding::new(Trigger::Each(quiz_options()), E::Click, A::SelectQuizOption),
        Binding::new(
            Trigger::Each(Selector::Class("copy-code-btn")),
            E::Click,
            A::CopyCode,
        ),
        Binding::new(
            Trigger::Each(Selector::Class("scroll-to-top")),
            E::Click,
            A::ScrollToTop,
        ),
        Binding::new(Trigger::Document, E::KeyDown, A::Shortcut),
        Binding::new(Trigger::Window, E::BeforePrint, A::PrepareForPrint),
        Binding::new(Trigger::Window, E::Load, A::Loaded),
    ];

    if profile.is_enhanced() {
        table.extend([
            Binding::new(Trigger::Each(tilt_targets()), E::PointerMove, A::Tilt),
            Binding::new(Trigger::Each(tilt_targets()), E::PointerLeave, A::ResetTilt),
            Binding::new(Trigger::Each(ripple_targets()), E::Click, A::Ripple),
        ]);
    }
    table
}
