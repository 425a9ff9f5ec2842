//! Browser entry point for the generated guide.
//!
//! Binds [`sfoglia`]'s page controller to the live DOM: `localStorage` for
//! the theme, `navigator.clipboard` for code copy, and `tracing` into the
//! console.

mod clipboard;
mod dom;
mod error;
mod events;
mod logging;
mod storage;

use sfoglia::effects::page_profile;
use tracing::{info, Level};
use wasm_bindgen::prelude::*;

pub use dom::WebDom;
pub use error::WebError;
pub use events::App;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init_tracing(Level::INFO);

    let dom = WebDom::new()?;
    let profile = page_profile(&dom);
    info!("🎓 {}", dom.document().title());

    App::start(dom, profile)?;
    Ok(())
}
