use glam::Vec2;
use reveal_wasm::stage::Stage;
use reveal_wasm::{PointerState, RevealConfig, Viewport};

fn approx_eq2(a: Vec2, b: Vec2, eps: f32) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

#[test]
fn square_fits_and_centers_for_any_container() {
    for w in (0..=640).step_by(37) {
        for h in (0..=640).step_by(41) {
            let vp = Viewport::fit(w, h);
            assert_eq!(vp.size, w.min(h), "{w}x{h}");
            assert!(vp.x >= 0 && vp.y >= 0);
            assert!(vp.x + vp.size <= w && vp.y + vp.size <= h, "{w}x{h} -> {vp:?}");
            // Slack on either side differs by at most one pixel.
            assert!(((w - vp.size - vp.x) - vp.x).abs() <= 1);
            assert!(((h - vp.size - vp.y) - vp.y).abs() <= 1);
        }
    }
}

#[test]
fn samples_outside_the_square_use_the_sentinel() {
    let res = [(1920, 1080), (1080, 1920), (500, 500)];
    let origin = Vec2::new(12.0, 34.0);
    for &(w, h) in &res {
        let vp = Viewport::fit(w, h);
        let left = origin + Vec2::new(vp.x as f32 - 1.0, (vp.y + vp.size / 2) as f32);
        let below = origin + Vec2::new((vp.x + vp.size / 2) as f32, (vp.y + vp.size) as f32 + 1.0);
        let far = Vec2::new(-500.0, -500.0);
        for client in [left, below, far] {
            let p = PointerState::from_client(client, origin, &vp);
            assert_eq!(p.square, PointerState::OUTSIDE);
            assert_eq!(p.parallax, Vec2::ZERO);
            assert!(p.is_outside());
        }
    }
}

#[test]
fn same_square_point_for_wide_and_tall_containers() {
    // Two different aspect ratios
    let wide = Viewport::fit(1920, 1080);
    let tall = Viewport::fit(1080, 1920);

    let samples = [
        Vec2::new(0.5, 0.5),
        Vec2::new(0.6, 0.5),
        Vec2::new(0.5, 0.6),
        Vec2::new(0.2, 0.8),
        Vec2::new(0.8, 0.2),
    ];

    for &sq in &samples {
        let to_client = |vp: &Viewport| {
            Vec2::new(
                vp.x as f32 + sq.x * vp.size as f32,
                vp.y as f32 + (1.0 - sq.y) * vp.size as f32,
            )
        };
        let p1 = PointerState::from_client(to_client(&wide), Vec2::ZERO, &wide);
        let p2 = PointerState::from_client(to_client(&tall), Vec2::ZERO, &tall);
        assert!(approx_eq2(p1.square, sq, 1e-5), "p1={:?} sq={:?}", p1.square, sq);
        assert!(approx_eq2(p1.square, p2.square, 1e-5));
        assert!(approx_eq2(p1.parallax, (sq - Vec2::splat(0.5)) * 2.0, 1e-5));
    }
}

#[test]
fn resize_remaps_later_pointer_samples() {
    let mut stage = Stage::new(&RevealConfig::default());
    stage.resize(400, 200);
    assert_eq!(*stage.viewport(), Viewport { x: 100, y: 0, size: 200 });
    // Left of the square once the container is wide.
    stage.pointer_moved(Vec2::new(50.0, 150.0), Vec2::ZERO);
    assert!(stage.pointer().is_outside());

    stage.resize(200, 200);
    stage.pointer_moved(Vec2::new(50.0, 150.0), Vec2::ZERO);
    assert!(approx_eq2(stage.pointer().square, Vec2::new(0.25, 0.25), 1e-6));
    assert!(stage.hovering());
}

#[test]
fn zone_edge_is_not_hovering() {
    let mut stage = Stage::new(&RevealConfig::default());
    stage.resize(100, 100);
    // x = 0.2 exactly (left edge of the zone).
    stage.pointer_moved(Vec2::new(20.0, 90.0), Vec2::ZERO);
    assert!(!stage.hovering());
    stage.pointer_moved(Vec2::new(21.0, 90.0), Vec2::ZERO);
    assert!(stage.hovering());
    stage.pointer_cleared();
    assert!(!stage.tap_hits());
}
