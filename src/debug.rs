//! Geometry for the optional diagnostic overlay, in container CSS pixels
//! (y down). Drawing happens elsewhere; this only reads [`Stage`].

use glam::Vec2;

use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerMarker {
    pub center: Vec2,
    pub hovering: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugSnapshot {
    pub container: (i32, i32),
    pub viewport: Rect,
    pub zone: Rect,
    pub pointer: Option<PointerMarker>,
    pub lines: Vec<String>,
}

impl DebugSnapshot {
    pub fn capture(stage: &Stage) -> Self {
        let vp = stage.viewport();
        let size = vp.size as f32;
        let (vx, vy) = (vp.x as f32, vp.y as f32);
        let z = stage.zone();

        let zone = Rect {
            x: vx + z.x0 * size,
            y: vy + (1.0 - z.y1) * size,
            width: z.width() * size,
            height: z.height() * size,
        };

        let mut lines = Vec::new();
        let pointer = if stage.pointer().is_outside() {
            None
        } else {
            let sq = stage.pointer().square;
            let hovering = stage.hovering();
            lines.push(format!("Mouse: ({:.3}, {:.3})", sq.x, sq.y));
            lines.push(format!("Hovering: {hovering}"));
            lines.push(format!("Frame: {}", stage.chest().frame_index()));
            Some(PointerMarker {
                center: Vec2::new(vx + sq.x * size, vy + (1.0 - sq.y) * size),
                hovering,
            })
        };

        DebugSnapshot {
            container: stage.container_size(),
            viewport: Rect {
                x: vx,
                y: vy,
                width: size,
                height: size,
            },
            zone,
            pointer,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;

    #[test]
    fn zone_is_drawn_y_down() {
        let mut stage = Stage::new(&RevealConfig::default());
        stage.resize(300, 100);
        let snap = DebugSnapshot::capture(&stage);
        assert_eq!(snap.viewport, Rect { x: 100.0, y: 0.0, width: 100.0, height: 100.0 });
        assert!((snap.zone.x - 120.0).abs() < 1e-4);
        assert!((snap.zone.y - 62.0).abs() < 1e-4);
        assert!((snap.zone.width - 36.0).abs() < 1e-4);
        assert!((snap.zone.height - 38.0).abs() < 1e-4);
        assert!(snap.pointer.is_none());
        assert!(snap.lines.is_empty());
    }

    #[test]
    fn pointer_marker_tracks_hover() {
        let mut stage = Stage::new(&RevealConfig::default());
        stage.resize(100, 100);
        stage.pointer_moved(Vec2::new(30.0, 90.0), Vec2::ZERO);
        let snap = DebugSnapshot::capture(&stage);
        let marker = snap.pointer.expect("pointer inside");
        assert!(marker.hovering);
        assert!((marker.center - Vec2::new(30.0, 90.0)).length() < 1e-3);
        assert_eq!(snap.lines[1], "Hovering: true");
        assert_eq!(snap.lines[2], "Frame: 0");
    }
}
