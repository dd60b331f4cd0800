use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::debug::DebugSnapshot;
use crate::error::RevealError;

/// Transparent 2D canvas stacked over the surface. Draws whatever
/// [`DebugSnapshot`] it is handed and never feeds back into the stage.
pub struct DebugCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl DebugCanvas {
    /// Build the canvas detached; [`DebugCanvas::attach`] puts it on the page.
    pub fn new(document: &Document) -> Result<Self, RevealError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| RevealError::GlCreate("debug canvas"))?;
        let style = canvas.style();
        style.set_property("position", "absolute")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("z-index", "1000")?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(RevealError::GlCreate("2d context"))?
            .dyn_into()
            .map_err(|_| RevealError::GlCreate("2d context"))?;
        Ok(DebugCanvas { canvas, ctx })
    }

    pub fn attach(&self, container: &HtmlElement) -> Result<(), RevealError> {
        container.append_child(&self.canvas)?;
        Ok(())
    }

    pub fn draw(&self, snap: &DebugSnapshot) {
        let (w, h) = snap.container;
        if self.canvas.width() != w.max(0) as u32 || self.canvas.height() != h.max(0) as u32 {
            self.canvas.set_width(w.max(0) as u32);
            self.canvas.set_height(h.max(0) as u32);
        }
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w as f64, h as f64);

        let vp = snap.viewport;
        ctx.set_stroke_style_str("cyan");
        ctx.set_line_width(2.0);
        ctx.stroke_rect(vp.x as f64, vp.y as f64, vp.width as f64, vp.height as f64);

        let z = snap.zone;
        ctx.set_fill_style_str("rgba(255, 0, 0, 0.3)");
        ctx.fill_rect(z.x as f64, z.y as f64, z.width as f64, z.height as f64);
        ctx.set_stroke_style_str("red");
        ctx.set_line_width(3.0);
        ctx.stroke_rect(z.x as f64, z.y as f64, z.width as f64, z.height as f64);

        if let Some(pointer) = &snap.pointer {
            ctx.set_fill_style_str(if pointer.hovering { "lime" } else { "yellow" });
            ctx.begin_path();
            let _ = ctx.arc(
                pointer.center.x as f64,
                pointer.center.y as f64,
                10.0,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        ctx.set_fill_style_str("white");
        ctx.set_font("14px monospace");
        for (i, line) in snap.lines.iter().enumerate() {
            let _ = ctx.fill_text(line, 10.0, 20.0 + 20.0 * i as f64);
        }
    }

    pub fn remove(&self) {
        self.canvas.remove();
    }
}
