//! Square viewport placement and pointer mapping.
//!
//! Three coordinate spaces meet here: client pixels (y down) as delivered by
//! pointer events, the centered square region inside the host container, and
//! normalized square space `[0,1]²` with y up, which is what the shader sees.

use glam::Vec2;

/// Centered square region inside the host container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

impl Viewport {
    /// Largest square that fits `width x height`, centered (offsets floored).
    pub fn fit(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let size = width.min(height);
        Viewport {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        }
    }

    /// GL viewport/scissor rectangle for a backing store scaled by `pixel_ratio`.
    ///
    /// GL counts rows from the bottom, so the y offset is measured from the
    /// container's bottom edge.
    pub fn to_device(&self, container_height: i32, pixel_ratio: f64) -> DeviceRect {
        let scale = |v: i32| (v as f64 * pixel_ratio).round() as i32;
        let bottom = container_height - (self.y + self.size);
        DeviceRect {
            x: scale(self.x),
            y: scale(bottom.max(0)),
            width: scale(self.size),
            height: scale(self.size),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { x: 0, y: 0, size: 1 }
    }
}

/// Rectangle in device pixels with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Most recent pointer sample. Written by input handlers, read once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Position in square space, or [`PointerState::OUTSIDE`].
    pub square: Vec2,
    /// `square` remapped to `[-1,1]²`; zero while outside.
    pub parallax: Vec2,
}

impl PointerState {
    pub const OUTSIDE: Vec2 = Vec2::new(-1.0, -1.0);

    pub fn outside() -> Self {
        PointerState {
            square: Self::OUTSIDE,
            parallax: Vec2::ZERO,
        }
    }

    /// Map a client-space position. `origin` is the container's bounding rect
    /// top-left in client space.
    pub fn update(&mut self, client: Vec2, origin: Vec2, viewport: &Viewport) {
        *self = Self::from_client(client, origin, viewport);
    }

    pub fn from_client(client: Vec2, origin: Vec2, viewport: &Viewport) -> Self {
        if viewport.size <= 0 {
            return Self::outside();
        }
        let size = viewport.size as f32;
        let sx = (client.x - origin.x - viewport.x as f32) / size;
        let sy = 1.0 - (client.y - origin.y - viewport.y as f32) / size;
        if (0.0..=1.0).contains(&sx) && (0.0..=1.0).contains(&sy) {
            let square = Vec2::new(sx, sy);
            PointerState {
                square,
                parallax: (square - Vec2::splat(0.5)) * 2.0,
            }
        } else {
            Self::outside()
        }
    }

    pub fn clear(&mut self) {
        *self = Self::outside();
    }

    pub fn is_outside(&self) -> bool {
        self.square.x < 0.0
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::outside()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_centers_horizontally() {
        let vp = Viewport::fit(1920, 1080);
        assert_eq!(vp, Viewport { x: 420, y: 0, size: 1080 });
    }

    #[test]
    fn odd_slack_is_floored() {
        let vp = Viewport::fit(101, 100);
        assert_eq!(vp, Viewport { x: 0, y: 0, size: 100 });
        let vp = Viewport::fit(100, 103);
        assert_eq!(vp, Viewport { x: 0, y: 1, size: 100 });
    }

    #[test]
    fn device_rect_counts_from_bottom() {
        let vp = Viewport::fit(100, 300);
        assert_eq!(vp.y, 100);
        let rect = vp.to_device(300, 2.0);
        assert_eq!(
            rect,
            DeviceRect {
                x: 0,
                y: 200,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn pointer_y_is_flipped() {
        let vp = Viewport::fit(200, 200);
        let p = PointerState::from_client(Vec2::new(50.0, 50.0), Vec2::ZERO, &vp);
        assert_eq!(p.square, Vec2::new(0.25, 0.75));
        assert_eq!(p.parallax, Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn pointer_respects_container_origin() {
        let vp = Viewport::fit(300, 200);
        let origin = Vec2::new(10.0, 20.0);
        let client = Vec2::new(10.0 + 50.0 + 100.0, 20.0 + 100.0);
        let p = PointerState::from_client(client, origin, &vp);
        assert_eq!(p.square, Vec2::new(0.5, 0.5));
        assert_eq!(p.parallax, Vec2::ZERO);
    }
}
