#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use reveal_wasm::{Reveal, RevealConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn container(width: u32, height: u32) -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div: web_sys::HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    let style = div.style();
    style.set_property("width", &format!("{width}px")).unwrap();
    style.set_property("height", &format!("{height}px")).unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

/// Dispatch a window click at square-space `(sx, sy)` (y up) of a square `div`.
fn click_at(div: &web_sys::HtmlElement, sx: f64, sy: f64) {
    let rect = div.get_bounding_client_rect();
    let size = rect.width().min(rect.height());
    let init = web_sys::MouseEventInit::new();
    init.set_bubbles(true);
    init.set_client_x((rect.left() + sx * size).round() as i32);
    init.set_client_y((rect.top() + (1.0 - sy) * size).round() as i32);
    let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
}

fn counter() -> (Rc<Cell<u32>>, Box<dyn FnMut()>) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    (count, Box::new(move || seen.set(seen.get() + 1)))
}

#[wasm_bindgen_test]
fn mount_attaches_a_sized_canvas() {
    let div = container(320, 200);
    let mut reveal = Reveal::mount(div.clone(), RevealConfig::default(), None).unwrap();

    let canvas = reveal.canvas().clone();
    assert!(canvas.parent_node().is_some());
    let rect = canvas.get_bounding_client_rect();
    assert!(rect.width() > 0.0 && rect.height() > 0.0);

    reveal.dispose();
    assert!(reveal.is_disposed());
    assert!(canvas.parent_node().is_none());
    assert_eq!(div.child_element_count(), 0);
    div.remove();
}

#[wasm_bindgen_test]
fn dispose_twice_is_harmless() {
    let div = container(100, 100);
    let config = RevealConfig {
        debug_overlay: true,
        ..RevealConfig::default()
    };
    let mut reveal = Reveal::mount(div.clone(), config, Some(Box::new(|| {}))).unwrap();
    assert_eq!(div.child_element_count(), 2);
    reveal.dispose();
    reveal.dispose();
    assert_eq!(div.child_element_count(), 0);
    div.remove();
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected_before_mounting() {
    let div = container(100, 100);
    let mut config = RevealConfig::default();
    config.frames.count = 0;
    assert!(Reveal::mount(div.clone(), config, None).is_err());
    assert_eq!(div.child_element_count(), 0);
    div.remove();
}

#[wasm_bindgen_test]
fn click_fires_only_inside_the_chest_zone() {
    let div = container(200, 200);
    let (count, on_click) = counter();
    let mut reveal = Reveal::mount(div.clone(), RevealConfig::default(), Some(on_click)).unwrap();

    click_at(&div, 0.38, 0.19);
    assert_eq!(count.get(), 1);
    click_at(&div, 0.8, 0.8);
    assert_eq!(count.get(), 1);

    reveal.dispose();
    click_at(&div, 0.38, 0.19);
    assert_eq!(count.get(), 1);
    div.remove();
}

#[wasm_bindgen_test]
fn callback_may_dispose_the_surface() {
    let div = container(200, 200);
    let slot: Rc<RefCell<Option<Reveal>>> = Rc::new(RefCell::new(None));
    let count = Rc::new(Cell::new(0));
    let on_click = {
        let slot = Rc::clone(&slot);
        let count = Rc::clone(&count);
        Box::new(move || {
            count.set(count.get() + 1);
            let reveal = slot.borrow_mut().take();
            if let Some(mut reveal) = reveal {
                reveal.dispose();
            }
        })
    };
    let reveal = Reveal::mount(div.clone(), RevealConfig::default(), Some(on_click)).unwrap();
    let canvas = reveal.canvas().clone();
    *slot.borrow_mut() = Some(reveal);

    click_at(&div, 0.38, 0.19);
    assert_eq!(count.get(), 1);
    assert!(slot.borrow().is_none());
    assert!(canvas.parent_node().is_none());

    click_at(&div, 0.38, 0.19);
    assert_eq!(count.get(), 1);
    div.remove();
}

#[wasm_bindgen_test]
async fn disposed_surface_stops_drawing() {
    let div = container(200, 200);
    let mut reveal = Reveal::mount(div.clone(), RevealConfig::default(), None).unwrap();
    TimeoutFuture::new(200).await;
    assert!(reveal.ticks() > 0);

    reveal.dispose();
    let ticks = reveal.ticks();
    TimeoutFuture::new(200).await;
    assert_eq!(reveal.ticks(), ticks);
    div.remove();
}
