use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as GL};

use super::compositor::Compositor;
use super::input;
use super::loader::{self, Frames};
use super::overlay::DebugCanvas;
use super::video::BaseVideo;
use crate::config::RevealConfig;
use crate::debug::DebugSnapshot;
use crate::error::RevealError;
use crate::frames::FrameSequence;
use crate::stage::{OverlaySource, Stage};

pub type ClickCallback = Box<dyn FnMut()>;

/// A mounted chest surface. Dropping it disposes it.
pub struct Reveal {
    shared: Rc<Shared>,
    listeners: Vec<EventListener>,
    disposed: bool,
}

/// State reachable from the tick and the input handlers.
pub(super) struct Shared {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    gl: GL,
    max_pixel_ratio: f64,
    stage: RefCell<Stage>,
    compositor: RefCell<Compositor>,
    frames: Frames,
    video: BaseVideo,
    overlay: RefCell<Option<DebugCanvas>>,
    on_click: RefCell<Option<ClickCallback>>,
    frame_handle: RefCell<Option<AnimationFrame>>,
    alive: Rc<Cell<bool>>,
    ticks: Cell<u64>,
}

/// Undoes a half-finished mount: frees the GL objects and detaches the
/// canvas unless released.
struct MountGuard {
    canvas: HtmlCanvasElement,
    compositor: Option<Compositor>,
    armed: bool,
}

impl MountGuard {
    fn new(canvas: HtmlCanvasElement, compositor: Compositor) -> Self {
        MountGuard {
            canvas,
            compositor: Some(compositor),
            armed: true,
        }
    }

    fn release(mut self) -> Option<Compositor> {
        self.armed = false;
        self.compositor.take()
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.destroy();
        }
        self.canvas.remove();
        log::warn!("chest surface mount aborted");
    }
}

impl Reveal {
    /// Attach a canvas to `container` and start the loop.
    pub fn mount(
        container: HtmlElement,
        config: RevealConfig,
        on_click: Option<ClickCallback>,
    ) -> Result<Reveal, RevealError> {
        config.validate()?;
        let window = window().ok_or(RevealError::NoWindow)?;
        let document = window.document().ok_or(RevealError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| RevealError::GlCreate("canvas"))?;
        canvas.style().set_property("display", "block")?;
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(RevealError::WebGl2Unsupported)?
            .dyn_into()
            .map_err(|_| RevealError::WebGl2Unsupported)?;

        let guard = MountGuard::new(
            canvas.clone(),
            Compositor::new(gl.clone(), config.tuning.parallax_base)?,
        );
        let video = BaseVideo::new(&document, &config.base_video_url)?;
        let overlay = if config.debug_overlay {
            Some(DebugCanvas::new(&document)?)
        } else {
            None
        };
        container.append_child(&canvas)?;
        if let Some(overlay) = &overlay {
            overlay.attach(&container)?;
        }
        let compositor = guard.release().ok_or(RevealError::GlCreate("compositor"))?;

        let shared = Rc::new(Shared {
            container,
            canvas,
            gl,
            max_pixel_ratio: config.max_pixel_ratio,
            stage: RefCell::new(Stage::new(&config)),
            compositor: RefCell::new(compositor),
            frames: Rc::new(RefCell::new(FrameSequence::new(config.frames.count))),
            video,
            overlay: RefCell::new(overlay),
            on_click: RefCell::new(on_click),
            frame_handle: RefCell::new(None),
            alive: Rc::new(Cell::new(true)),
            ticks: Cell::new(0),
        });

        shared.resize();
        shared.video.start(&window);
        loader::spawn(
            shared.gl.clone(),
            config.frames.clone(),
            config.retry,
            Rc::clone(&shared.frames),
            Rc::clone(&shared.alive),
        );
        let listeners = input::install(&shared, &window);
        shared.schedule();

        log::info!(
            "chest surface mounted ({} frames from {})",
            config.frames.count,
            config.frames.dir
        );
        Ok(Reveal {
            shared,
            listeners,
            disposed: false,
        })
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.shared.canvas
    }

    /// Frames drawn so far.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.get()
    }

    /// Tear everything down. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.listeners.clear();
        self.shared.shutdown();
        log::info!("chest surface disposed");
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Shared {
    pub(super) fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub(super) fn stage(&self) -> &RefCell<Stage> {
        &self.stage
    }

    pub(super) fn container_origin(&self) -> Vec2 {
        let rect = self.container.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    /// Resize the backing store and re-derive the square viewport.
    pub(super) fn resize(&self) {
        let width = self.container.client_width();
        let height = self.container.client_height();
        let ratio = window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .min(self.max_pixel_ratio);

        let viewport = self.stage.borrow_mut().resize(width, height);
        self.canvas.set_width((width.max(0) as f64 * ratio).round() as u32);
        self.canvas.set_height((height.max(0) as f64 * ratio).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        self.compositor
            .borrow()
            .set_viewport(viewport.to_device(height, ratio));
        log::debug!("viewport {viewport:?} for {width}x{height} @{ratio}");
    }

    /// Run the tap callback without holding any borrow, so the callback may
    /// dispose the surface.
    pub(super) fn fire_click(&self) {
        let Some(mut callback) = self.on_click.borrow_mut().take() else {
            return;
        };
        callback();
        if self.alive.get() {
            let mut slot = self.on_click.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    fn schedule(self: &Rc<Self>) {
        if !self.alive.get() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |timestamp| {
            if let Some(shared) = weak.upgrade() {
                shared.frame_handle.borrow_mut().take();
                shared.tick(timestamp);
            }
        });
        *self.frame_handle.borrow_mut() = Some(handle);
    }

    fn tick(self: &Rc<Self>, timestamp: f64) {
        if !self.alive.get() {
            return;
        }
        let size = (self.container.client_width(), self.container.client_height());
        if size != self.stage.borrow().container_size() {
            self.resize();
        }

        let loaded = self.frames.borrow().is_loaded();
        let uniforms = self.stage.borrow_mut().tick(timestamp, loaded);
        {
            let compositor = self.compositor.borrow();
            compositor.upload_video(self.video.element());
            let frames = self.frames.borrow();
            let overlay = match uniforms.overlay {
                OverlaySource::Frame(index) => frames.get(index),
                OverlaySource::Base => None,
            };
            compositor.draw(&uniforms, overlay);
        }
        self.ticks.set(self.ticks.get() + 1);
        if let Some(overlay) = self.overlay.borrow().as_ref() {
            overlay.draw(&DebugSnapshot::capture(&self.stage.borrow()));
        }

        self.schedule();
    }

    fn shutdown(&self) {
        self.alive.set(false);
        self.frame_handle.borrow_mut().take();
        self.on_click.borrow_mut().take();
        self.video.dispose();

        let textures = self.frames.borrow_mut().drain();
        for texture in &textures {
            self.gl.delete_texture(Some(texture));
        }
        self.compositor.borrow_mut().destroy();

        if let Some(overlay) = self.overlay.borrow_mut().take() {
            overlay.remove();
        }
        self.canvas.remove();
    }
}
