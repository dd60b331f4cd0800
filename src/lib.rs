//! Interactive chest surface: a looping base video composited with a
//! hover-driven frame sequence inside a fixed zone of a centered square.
//!
//! The interaction model (viewport mapping, chest state machine, frame
//! slots, uniforms) is platform independent and lives at the top level.
//! Browser glue (WebGL2, DOM listeners, loading) only builds for wasm32.

pub mod chest;
pub mod config;
pub mod debug;
pub mod error;
pub mod frames;
pub mod shader;
pub mod stage;
pub mod viewport;
pub mod zone;

pub use chest::{ChestController, ChestOutput, ChestPhase};
pub use config::{ChestTuning, FrameSource, RetryPolicy, RevealConfig};
pub use error::{ConfigError, RevealError};
pub use frames::{FrameSequence, LoadStatus};
pub use stage::{FrameUniforms, OverlaySource, Stage};
pub use viewport::{PointerState, Viewport};
pub use zone::ZoneRect;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::config::RevealConfig;

    mod compositor;
    mod input;
    mod loader;
    mod overlay;
    mod render;
    mod video;

    pub use render::Reveal;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        Ok(())
    }

    /// JS handle: `new ChestReveal(container, onChestClick, debug?)`.
    #[wasm_bindgen]
    pub struct ChestReveal {
        inner: Reveal,
    }

    #[wasm_bindgen]
    impl ChestReveal {
        #[wasm_bindgen(constructor)]
        pub fn new(
            container: web_sys::HtmlElement,
            on_chest_click: JsValue,
            debug: Option<bool>,
        ) -> Result<ChestReveal, JsValue> {
            let config = RevealConfig {
                debug_overlay: debug.unwrap_or(false),
                ..RevealConfig::default()
            };
            // Anything that is not a function is ignored rather than called.
            let callback = on_chest_click
                .dyn_into::<js_sys::Function>()
                .ok()
                .map(|f| -> render::ClickCallback {
                    Box::new(move || {
                        if let Err(err) = f.call0(&JsValue::NULL) {
                            log::warn!("onChestClick threw: {err:?}");
                        }
                    })
                });
            let inner = Reveal::mount(container, config, callback)?;
            Ok(ChestReveal { inner })
        }

        pub fn dispose(&mut self) {
            self.inner.dispose();
        }

        #[wasm_bindgen(getter)]
        pub fn disposed(&self) -> bool {
            self.inner.is_disposed()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{ChestReveal, Reveal};
