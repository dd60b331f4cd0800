//! Window-level pointer, touch and resize listeners.
//!
//! Each listener is returned to the caller, which keeps it alive for the
//! lifetime of the surface; dropping the vector deregisters exactly these
//! handlers.

use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent, Window};

use super::render::Shared;

pub(super) fn install(shared: &Rc<Shared>, window: &Window) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    let view = Rc::clone(shared);
    listeners.push(EventListener::new(window, "mousemove", move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        pointer_at(&view, mouse_client(event));
    }));

    let view = Rc::clone(shared);
    listeners.push(EventListener::new_with_options(
        window,
        "touchmove",
        EventListenerOptions::enable_prevent_default(),
        move |event: &Event| {
            let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let Some(client) = first_touch(touch) else {
                return;
            };
            pointer_at(&view, client);
            // Keep the page from scrolling while dragging over the chest.
            if view.stage().borrow().hovering() {
                event.prevent_default();
            }
        },
    ));

    let view = Rc::clone(shared);
    listeners.push(EventListener::new(window, "touchstart", move |event: &Event| {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        if let Some(client) = first_touch(touch) {
            pointer_at(&view, client);
        }
    }));

    let view = Rc::clone(shared);
    listeners.push(EventListener::new(window, "click", move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        pointer_at(&view, mouse_client(event));
        let hit = view.stage().borrow().tap_hits();
        if hit {
            view.fire_click();
        }
    }));

    let view = Rc::clone(shared);
    listeners.push(EventListener::new_with_options(
        window,
        "touchend",
        EventListenerOptions::enable_prevent_default(),
        move |event: &Event| {
            if !view.is_alive() {
                return;
            }
            let hit = {
                let mut stage = view.stage().borrow_mut();
                let hit = stage.tap_hits();
                stage.pointer_cleared();
                hit
            };
            if hit {
                // Suppress the emulated click so one tap fires once.
                event.prevent_default();
                view.fire_click();
            }
        },
    ));

    let view = Rc::clone(shared);
    listeners.push(EventListener::new(window, "resize", move |_event| {
        if view.is_alive() {
            view.resize();
        }
    }));

    listeners
}

fn pointer_at(view: &Shared, client: Vec2) {
    if !view.is_alive() {
        return;
    }
    let origin = view.container_origin();
    view.stage().borrow_mut().pointer_moved(client, origin);
}

fn mouse_client(event: &MouseEvent) -> Vec2 {
    Vec2::new(event.client_x() as f32, event.client_y() as f32)
}

fn first_touch(event: &TouchEvent) -> Option<Vec2> {
    let touch = event.touches().get(0)?;
    Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
}
