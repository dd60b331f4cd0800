use glam::{Vec2, Vec4};

use crate::error::ConfigError;

/// Normalized sub-rectangle of the square viewport where the overlay plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRect {
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
}

impl ZoneRect {
    pub const CHEST: ZoneRect = ZoneRect {
        x0: 0.2,
        x1: 0.56,
        y0: 0.0,
        y1: 0.38,
    };

    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32) -> Result<Self, ConfigError> {
        let zone = ZoneRect { x0, x1, y0, y1 };
        zone.validate()?;
        Ok(zone)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        let ok = unit(self.x0)
            && unit(self.x1)
            && unit(self.y0)
            && unit(self.y1)
            && self.x0 < self.x1
            && self.y0 < self.y1;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidZone {
                x0: self.x0,
                x1: self.x1,
                y0: self.y0,
                y1: self.y1,
            })
        }
    }

    /// Strict containment: points on the boundary are outside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x0 && p.x < self.x1 && p.y > self.y0 && p.y < self.y1
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Packed as `(x0, x1, y0, y1)` for the `uZone` uniform.
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.x0, self.x1, self.y0, self.y1)
    }
}

impl Default for ZoneRect {
    fn default() -> Self {
        ZoneRect::CHEST
    }
}
