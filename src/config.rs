//! Construction-time settings. `Default` reproduces the shipped room.

use crate::error::ConfigError;
use crate::zone::ZoneRect;

#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    pub base_video_url: String,
    pub frames: FrameSource,
    pub zone: ZoneRect,
    pub tuning: ChestTuning,
    /// Cap on `devicePixelRatio` when sizing the backing store.
    pub max_pixel_ratio: f64,
    pub retry: RetryPolicy,
    pub debug_overlay: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            base_video_url: "/base.mp4".to_string(),
            frames: FrameSource::default(),
            zone: ZoneRect::CHEST,
            tuning: ChestTuning::default(),
            max_pixel_ratio: 2.0,
            retry: RetryPolicy::default(),
            debug_overlay: false,
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zone.validate()?;
        self.frames.validate()?;
        self.tuning.validate()?;
        if !(self.max_pixel_ratio > 0.0) {
            return Err(out_of_range("max_pixel_ratio", "(0, inf)", self.max_pixel_ratio));
        }
        if self.retry.attempts == 0 {
            return Err(out_of_range("retry.attempts", "[1, inf)", 0.0));
        }
        Ok(())
    }
}

/// Location and naming of the numbered overlay images.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSource {
    pub dir: String,
    pub prefix: String,
    /// Zero-padded width of the numeric part.
    pub pad: usize,
    pub ext: String,
    pub count: usize,
    /// Number written into the name of slot 0.
    pub first_index: usize,
}

impl Default for FrameSource {
    fn default() -> Self {
        FrameSource {
            dir: "/chest/".to_string(),
            prefix: "chest_".to_string(),
            pad: 5,
            ext: ".jpg".to_string(),
            count: 120,
            first_index: 0,
        }
    }
}

impl FrameSource {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::EmptySequence);
        }
        if self.pad == 0 {
            return Err(ConfigError::ZeroPadding);
        }
        Ok(())
    }

    /// File name of slot `slot`, e.g. `chest_00007.jpg`.
    pub fn file_name(&self, slot: usize) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            self.first_index + slot,
            self.ext,
            width = self.pad
        )
    }

    pub fn url(&self, slot: usize) -> String {
        format!("{}{}", self.dir, self.file_name(slot))
    }

    pub fn urls(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.count).map(move |slot| self.url(slot))
    }

    pub fn last_slot(&self) -> usize {
        self.count.saturating_sub(1)
    }
}

/// Feel of the hover animation. Times are in seconds, eases are per-tick
/// fractions of the remaining distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChestTuning {
    pub hover_delay: f32,
    pub open_ease: f32,
    pub close_ease: f32,
    pub parallax_base: f32,
    pub prehover_bias: f32,
    pub release_decay: f32,
    pub idle_threshold: f32,
    /// Frame targeted while the hover delay is still running.
    pub peek_frame: usize,
}

impl Default for ChestTuning {
    fn default() -> Self {
        ChestTuning {
            hover_delay: 0.10,
            open_ease: 0.035,
            close_ease: 0.035,
            parallax_base: 0.02,
            prehover_bias: 0.015,
            release_decay: 0.85,
            idle_threshold: 0.25,
            peek_frame: 2,
        }
    }
}

impl ChestTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hover_delay > 0.0) {
            return Err(out_of_range("hover_delay", "(0, inf)", self.hover_delay as f64));
        }
        for (name, value) in [("open_ease", self.open_ease), ("close_ease", self.close_ease)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(out_of_range(name, "(0, 1]", value as f64));
            }
        }
        if !(0.0..1.0).contains(&self.release_decay) {
            return Err(out_of_range("release_decay", "[0, 1)", self.release_decay as f64));
        }
        if self.parallax_base < 0.0 || self.prehover_bias < 0.0 {
            return Err(out_of_range(
                "parallax",
                "[0, inf)",
                self.parallax_base.min(self.prehover_bias) as f64,
            ));
        }
        if !(self.idle_threshold > 0.0) {
            return Err(out_of_range("idle_threshold", "(0, inf)", self.idle_threshold as f64));
        }
        Ok(())
    }
}

/// Per-frame retry schedule for the overlay loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            base_delay_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (1-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Option<u32> {
        if attempt <= 1 || attempt > self.attempts {
            return None;
        }
        let shift = (attempt - 2).min(16);
        Some(self.base_delay_ms.saturating_mul(1 << shift))
    }
}

fn out_of_range(name: &'static str, range: &'static str, value: f64) -> ConfigError {
    ConfigError::OutOfRange { name, range, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_urls_are_zero_padded() {
        let src = FrameSource::default();
        assert_eq!(src.url(0), "/chest/chest_00000.jpg");
        assert_eq!(src.url(119), "/chest/chest_00119.jpg");

        let one_based = FrameSource {
            first_index: 1,
            ..FrameSource::default()
        };
        assert_eq!(one_based.url(119), "/chest/chest_00120.jpg");
        assert_eq!(one_based.urls().count(), 120);
    }

    #[test]
    fn retry_backs_off_exponentially() {
        let retry = RetryPolicy {
            attempts: 4,
            base_delay_ms: 100,
        };
        assert_eq!(retry.delay_before(1), None);
        assert_eq!(retry.delay_before(2), Some(100));
        assert_eq!(retry.delay_before(3), Some(200));
        assert_eq!(retry.delay_before(4), Some(400));
        assert_eq!(retry.delay_before(5), None);
    }

    #[test]
    fn defaults_validate() {
        assert_eq!(RevealConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = RevealConfig::default();
        cfg.frames.count = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySequence));

        let mut cfg = RevealConfig::default();
        cfg.tuning.open_ease = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { name: "open_ease", .. })
        ));

        let mut cfg = RevealConfig::default();
        cfg.tuning.release_decay = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = RevealConfig::default();
        cfg.retry.attempts = 0;
        assert!(cfg.validate().is_err());
    }
}
