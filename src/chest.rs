//! Hover-driven playback of the chest frame sequence.
//!
//! `frame` chases `target` with an exponential ease every tick; the phase only
//! decides what the target is and how much extra parallax to apply.

use crate::config::ChestTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestPhase {
    Idle,
    /// Hovering, waiting out `hover_delay` while peeking a few frames in.
    Pre,
    Active,
    Release,
}

/// What the compositor needs from one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChestOutput {
    pub frame_index: usize,
    pub bias: f32,
}

#[derive(Debug, Clone)]
pub struct ChestController {
    tuning: ChestTuning,
    last_frame: usize,
    phase: ChestPhase,
    timer: f32,
    frame: f32,
    target: usize,
    bias: f32,
    was_hovering: bool,
}

impl ChestController {
    pub fn new(tuning: ChestTuning, frame_count: usize) -> Self {
        ChestController {
            tuning,
            last_frame: frame_count.saturating_sub(1),
            phase: ChestPhase::Idle,
            timer: 0.0,
            frame: 0.0,
            target: 0,
            bias: 0.0,
            was_hovering: false,
        }
    }

    pub fn phase(&self) -> ChestPhase {
        self.phase
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn frame(&self) -> f32 {
        self.frame
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn frame_index(&self) -> usize {
        self.frame.round() as usize
    }

    pub fn output(&self) -> ChestOutput {
        ChestOutput {
            frame_index: self.frame_index(),
            bias: self.bias,
        }
    }

    /// Advance one tick of `dt` seconds.
    pub fn update(&mut self, hover: bool, dt: f32) -> ChestOutput {
        let t = self.tuning;

        if hover && !self.was_hovering {
            self.phase = ChestPhase::Pre;
            self.timer = 0.0;
        }
        if !hover && self.was_hovering {
            self.phase = ChestPhase::Release;
            self.target = 0;
        }
        self.was_hovering = hover;

        if self.phase == ChestPhase::Pre {
            self.timer += dt.max(0.0);
            let progress = (self.timer / t.hover_delay).min(1.0);
            self.bias = progress * t.prehover_bias;
            if self.timer >= t.hover_delay {
                self.phase = ChestPhase::Active;
                self.target = self.last_frame;
            } else {
                self.target = t.peek_frame.min(self.last_frame);
            }
        }

        // Re-asserted every tick so a re-entrant hover keeps the lid open.
        if self.phase == ChestPhase::Active {
            self.bias = t.prehover_bias;
            self.target = self.last_frame;
        }

        if self.phase == ChestPhase::Release {
            self.bias *= t.release_decay;
            self.target = 0;
            if self.frame < t.idle_threshold {
                self.phase = ChestPhase::Idle;
            }
        }

        let target = self.target as f32;
        let easing = if target > self.frame {
            t.open_ease
        } else {
            t.close_ease
        };
        self.frame += (target - self.frame) * easing;
        self.frame = self.frame.clamp(0.0, self.last_frame as f32);

        self.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ChestController {
        ChestController::new(ChestTuning::default(), 120)
    }

    #[test]
    fn starts_idle_and_closed() {
        let c = controller();
        assert_eq!(c.phase(), ChestPhase::Idle);
        assert_eq!(c.output(), ChestOutput { frame_index: 0, bias: 0.0 });
    }

    #[test]
    fn idle_without_hover_stays_put() {
        let mut c = controller();
        for _ in 0..10 {
            c.update(false, 0.016);
        }
        assert_eq!(c.phase(), ChestPhase::Idle);
        assert_eq!(c.frame(), 0.0);
    }

    #[test]
    fn single_frame_sequence_never_moves() {
        let mut c = ChestController::new(ChestTuning::default(), 1);
        for _ in 0..20 {
            c.update(true, 0.05);
        }
        assert_eq!(c.phase(), ChestPhase::Active);
        assert_eq!(c.target(), 0);
        assert_eq!(c.frame_index(), 0);
    }

    #[test]
    fn ease_is_asymmetric() {
        let tuning = ChestTuning {
            open_ease: 0.5,
            close_ease: 0.1,
            ..ChestTuning::default()
        };
        let mut c = ChestController::new(tuning, 11);
        c.update(true, 1.0);
        assert_eq!(c.phase(), ChestPhase::Active);
        assert!((c.frame() - 5.0).abs() < 1e-5);
        c.update(false, 0.016);
        assert_eq!(c.phase(), ChestPhase::Release);
        assert!((c.frame() - 4.5).abs() < 1e-5);
    }
}
