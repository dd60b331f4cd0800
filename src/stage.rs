//! Per-tick state shared between the input handlers and the render loop.
//!
//! Nothing in here touches the browser, so the whole interaction can be
//! driven from tests with synthetic sizes, pointer samples and timestamps.

use glam::{Vec2, Vec4};

use crate::chest::ChestController;
use crate::config::RevealConfig;
use crate::viewport::{PointerState, Viewport};
use crate::zone::ZoneRect;

/// Which texture the overlay sampler should be bound to this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlaySource {
    /// Frames are not ready; the zone shows the base video.
    Base,
    Frame(usize),
}

/// Uniform values for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub overlay: OverlaySource,
    pub mouse: Vec2,
    pub zone: Vec4,
    pub bias: f32,
}

/// Turns requestAnimationFrame timestamps (ms) into tick deltas (s).
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt_ms = match self.last_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        (dt_ms / 1000.0) as f32
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    zone: ZoneRect,
    viewport: Viewport,
    container: (i32, i32),
    pointer: PointerState,
    chest: ChestController,
    clock: FrameClock,
}

impl Stage {
    pub fn new(config: &RevealConfig) -> Self {
        Stage {
            zone: config.zone,
            viewport: Viewport::default(),
            container: (0, 0),
            pointer: PointerState::outside(),
            chest: ChestController::new(config.tuning, config.frames.count),
            clock: FrameClock::default(),
        }
    }

    pub fn zone(&self) -> &ZoneRect {
        &self.zone
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn container_size(&self) -> (i32, i32) {
        self.container
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn chest(&self) -> &ChestController {
        &self.chest
    }

    /// Recompute the square for a new container size.
    pub fn resize(&mut self, width: i32, height: i32) -> Viewport {
        self.container = (width, height);
        self.viewport = Viewport::fit(width, height);
        self.viewport
    }

    pub fn pointer_moved(&mut self, client: Vec2, origin: Vec2) {
        self.pointer.update(client, origin, &self.viewport);
    }

    pub fn pointer_cleared(&mut self) {
        self.pointer.clear();
    }

    pub fn hovering(&self) -> bool {
        !self.pointer.is_outside() && self.zone.contains(self.pointer.square)
    }

    /// A completed click or tap lands on the chest.
    pub fn tap_hits(&self) -> bool {
        self.hovering()
    }

    /// Advance the animation and produce this tick's uniforms. The chest is
    /// frozen until the frame sequence has loaded.
    pub fn tick(&mut self, now_ms: f64, frames_loaded: bool) -> FrameUniforms {
        let dt = self.clock.advance(now_ms);
        let overlay = if frames_loaded {
            let hover = self.hovering();
            let out = self.chest.update(hover, dt);
            OverlaySource::Frame(out.frame_index)
        } else {
            OverlaySource::Base
        };
        FrameUniforms {
            overlay,
            mouse: self.pointer.parallax,
            zone: self.zone.to_vec4(),
            bias: self.chest.bias(),
        }
    }
}
