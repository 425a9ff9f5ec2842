//! Interactive behaviors for static study-guide pages.
//!
//! Everything here is written against the [`Dom`] and [`Viewport`] traits, so
//! the same code drives the browser (through the `vetrina` binding) and the
//! in-memory [`Document`] used by the `quaderno` CLI and the tests.

pub mod clipboard;
pub mod document;
pub mod dom;
pub mod effects;
pub mod error;
pub mod keys;
pub mod menu;
pub mod page;
pub mod quiz;
pub mod scroll;
pub mod search;
pub mod sections;
pub mod theme;
pub mod wiring;

pub use clipboard::{feedback, Clipboard, CodeCopy, CopyState};
pub use document::{el, Document, ElementSpec, NodeId};
pub use dom::{Dom, Selector, Viewport};
pub use effects::EffectsProfile;
pub use error::{Error, Result};
pub use page::{Page, Response, UiEvent};
pub use search::{FilterOutcome, Query, SearchFilter};
pub use theme::{MemoryStore, PreferenceStore, Theme, ThemeSwitch};
pub use wiring::{bindings, Action, Binding, EventKind, Trigger};
