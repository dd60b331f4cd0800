use std::cell::RefCell;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, HtmlVideoElement, Window};

use crate::error::RevealError;

/// Gestures that unlock playback when autoplay was refused.
const UNLOCK_EVENTS: [&str; 3] = ["pointerdown", "touchstart", "scroll"];

/// Looping, muted, inline video feeding the base texture. Never attached to
/// the document; the compositor samples it directly.
pub struct BaseVideo {
    element: HtmlVideoElement,
    unlock: RefCell<Vec<EventListener>>,
}

impl BaseVideo {
    pub fn new(document: &Document, url: &str) -> Result<Self, RevealError> {
        let element: HtmlVideoElement = document
            .create_element("video")?
            .dyn_into()
            .map_err(|_| RevealError::GlCreate("video element"))?;
        element.set_muted(true);
        element.set_loop(true);
        element.set_attribute("playsinline", "")?;
        element.set_preload("auto");
        element.set_src(url);
        Ok(BaseVideo {
            element,
            unlock: RefCell::new(Vec::new()),
        })
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }

    /// Start playback now and arm one-shot retries on the first gestures.
    pub fn start(&self, window: &Window) {
        try_play(&self.element);
        let listeners: Vec<EventListener> = UNLOCK_EVENTS
            .iter()
            .map(|&event| {
                let element = self.element.clone();
                EventListener::once(window, event, move |_| {
                    log::debug!("retrying base video playback after {event}");
                    try_play(&element);
                })
            })
            .collect();
        *self.unlock.borrow_mut() = listeners;
    }

    pub fn dispose(&self) {
        self.unlock.borrow_mut().clear();
        let _ = self.element.pause();
        let _ = self.element.remove_attribute("src");
        self.element.load();
        self.element.remove();
    }
}

/// Autoplay refusal is expected on some platforms and is not an error.
fn try_play(element: &HtmlVideoElement) {
    let promise = match element.play() {
        Ok(promise) => promise,
        Err(err) => {
            log::debug!("base video play() threw: {err:?}");
            return;
        }
    };
    spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log::debug!("base video autoplay refused: {err:?}");
        }
    });
}
