//! Listener registration and the glue between DOM events and [`Page`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use sfoglia::clipboard::{feedback, FEEDBACK_DURATION};
use sfoglia::{bindings, Action, Binding, Dom, EffectsProfile, EventKind, Page, Trigger, UiEvent};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Element, Event, EventTarget, HtmlInputElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent,
};

use crate::clipboard::NavigatorClipboard;
use crate::dom::WebDom;
use crate::error::WebError;
use crate::storage::LocalStore;

const REVEAL_THRESHOLD: f64 = 0.1;
const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

/// The running page. Listeners keep it alive for the lifetime of the document.
pub struct App {
    dom: WebDom,
    page: RefCell<Page<WebDom, LocalStore>>,
    clipboard: NavigatorClipboard,
    frame: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl App {
    pub fn start(dom: WebDom, profile: EffectsProfile) -> Result<Rc<Self>, WebError> {
        let store = LocalStore::new(dom.window());
        let clipboard = NavigatorClipboard::new(dom.window());
        let page = Page::init(&dom, &dom, store, profile);

        let app = Rc::new(Self {
            dom,
            page: RefCell::new(page),
            clipboard,
            frame: RefCell::new(None),
        });

        let weak = Rc::downgrade(&app);
        *app.frame.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            if let Some(app) = weak.upgrade() {
                app.page
                    .borrow_mut()
                    .on_animation_frame(&app.dom, &app.dom);
            }
        }));

        let mut listeners = 0;
        for binding in bindings(profile) {
            listeners += app.register(&binding)?;
        }
        app.observe_reveals()?;

        debug!(listeners, profile = profile.as_str(), "Listeners registered");
        Ok(app)
    }

    fn register(self: &Rc<Self>, binding: &Binding) -> Result<usize, WebError> {
        let complete = self.dom.document().ready_state() == "complete";
        if binding.event.already_fired(complete) {
            debug!(event = binding.event.dom_name(), "Document already loaded");
            let ui = UiEvent::Load {
                elapsed_ms: self.elapsed_ms(),
            };
            self.run(binding.action, &ui, None);
            return Ok(0);
        }

        let targets: Vec<EventTarget> = match &binding.trigger {
            Trigger::Id(id) => self
                .dom
                .element_by_id(id)
                .into_iter()
                .map(EventTarget::from)
                .collect(),
            Trigger::Each(selector) => self
                .dom
                .find_all(selector)
                .into_iter()
                .map(EventTarget::from)
                .collect(),
            Trigger::Document => vec![self.dom.document().clone().into()],
            Trigger::Window => vec![self.dom.window().clone().into()],
        };

        for target in &targets {
            let app = Rc::clone(self);
            let (action, kind) = (binding.action, binding.event);
            let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                app.handle(action, kind, &event);
            });
            target.add_event_listener_with_callback(
                kind.dom_name(),
                listener.as_ref().unchecked_ref(),
            )?;
            listener.forget();
        }
        Ok(targets.len())
    }

    fn handle(self: &Rc<Self>, action: Action, kind: EventKind, event: &Event) {
        let Some(ui) = self.ui_event(kind, event) else {
            return;
        };
        self.run(action, &ui, Some(event));
    }

    /// Dispatches to the page and carries out the returned [`Response`].
    /// `event` is `None` when no native event backs the dispatch.
    fn run(self: &Rc<Self>, action: Action, ui: &UiEvent<Element>, event: Option<&Event>) {
        let response = self
            .page
            .borrow_mut()
            .dispatch(&self.dom, &self.dom, action, ui);

        if response.prevent_default {
            if let Some(event) = event {
                event.prevent_default();
            }
        }
        if response.request_frame {
            self.request_frame();
        }
        if let Some(index) = response.copy {
            self.spawn_copy(index);
        }
        if let Some((node, delay)) = response.remove_after {
            spawn_local(async move {
                TimeoutFuture::new(millis(delay)).await;
                node.remove();
            });
        }
    }

    fn ui_event(&self, kind: EventKind, event: &Event) -> Option<UiEvent<Element>> {
        let current = event
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok());

        let ui = match kind {
            EventKind::Click => {
                let target = event.target().and_then(|t| t.dyn_into::<Element>().ok())?;
                let (x, y) = relative_point(event, current.as_ref());
                UiEvent::Click {
                    target,
                    current,
                    x,
                    y,
                }
            }
            EventKind::Input => UiEvent::Input {
                value: current
                    .and_then(|c| c.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default(),
            },
            EventKind::Scroll => UiEvent::Scroll,
            EventKind::KeyDown => {
                let key = event.dyn_ref::<KeyboardEvent>()?;
                UiEvent::Key {
                    key: key.key(),
                    ctrl: key.ctrl_key(),
                    meta: key.meta_key(),
                }
            }
            EventKind::BeforePrint => UiEvent::BeforePrint,
            EventKind::Load => UiEvent::Load {
                elapsed_ms: self.elapsed_ms(),
            },
            EventKind::PointerMove => {
                let current = current?;
                let (x, y) = relative_point(event, Some(&current));
                UiEvent::PointerMove { current, x, y }
            }
            EventKind::PointerLeave => UiEvent::PointerLeave { current: current? },
        };
        Some(ui)
    }

    /// Milliseconds since navigation started.
    fn elapsed_ms(&self) -> f64 {
        self.dom.window().performance().map_or(0.0, |p| p.now())
    }

    /// Schedules the section highlight for the next frame, replacing any
    /// frame still pending.
    fn request_frame(&self) {
        let frame = self.frame.borrow();
        let Some(callback) = frame.as_ref() else {
            return;
        };
        let window = self.dom.window();
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => {
                if let Some(previous) = self.page.borrow_mut().frame_scheduled(handle) {
                    let _ = window.cancel_animation_frame(previous);
                }
            }
            Err(e) => warn!(error = %WebError::from(e), "requestAnimationFrame failed"),
        }
    }

    fn spawn_copy(self: &Rc<Self>, index: usize) {
        let Some(copy) = self.page.borrow().code_copy().cloned() else {
            return;
        };
        let app = Rc::clone(self);
        spawn_local(async move {
            let outcome = copy.copy(&app.clipboard, index).await;
            copy.render(&app.dom, index, feedback(Some(&outcome), Duration::ZERO));
            TimeoutFuture::new(millis(FEEDBACK_DURATION)).await;
            copy.render(&app.dom, index, feedback(Some(&outcome), FEEDBACK_DURATION));
        });
    }

    fn observe_reveals(self: &Rc<Self>) -> Result<(), WebError> {
        let observed = self.page.borrow().observed().to_vec();
        if observed.is_empty() {
            return Ok(());
        }

        let app = Rc::downgrade(self);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let Some(app) = app.upgrade() else {
                    return;
                };
                let page = app.page.borrow();
                for (index, entry) in entries.iter().enumerate() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        page.reveal(&app.dom, &target, index);
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        options.set_root_margin(REVEAL_ROOT_MARGIN);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for node in &observed {
            observer.observe(node);
        }
        callback.forget();

        debug!(observed = observed.len(), "Reveal observer installed");
        Ok(())
    }
}

/// Pointer position relative to `current`'s bounding box.
fn relative_point(event: &Event, current: Option<&Element>) -> (f64, f64) {
    let (Some(mouse), Some(current)) = (event.dyn_ref::<MouseEvent>(), current) else {
        return (0.0, 0.0);
    };
    let rect = current.get_bounding_client_rect();
    (
        f64::from(mouse.client_x()) - rect.left(),
        f64::from(mouse.client_y()) - rect.top(),
    )
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_converts_durations() {
        assert_eq!(millis(Duration::ZERO), 0);
        assert_eq!(millis(FEEDBACK_DURATION), 2000);
        assert_eq!(millis(sfoglia::effects::RIPPLE_DURATION), 600);
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
