//! HTML canvas 2D implementation of [`Surface`].

use std::f64::consts::TAU;

use tracing::trace;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::{EngineError, EngineResult};
use crate::view::{BoundingRect, Surface};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> EngineResult<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| EngineError::ContextUnavailable(canvas.id()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::ContextUnavailable(canvas.id()))?;
        Ok(Self { canvas, ctx })
    }

    /// Use the canvas with `id`, or create one and append it to the body.
    pub fn find_or_create(document: &Document, id: &str) -> EngineResult<Self> {
        let canvas = match document.get_element_by_id(id) {
            Some(el) => el
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| EngineError::NotACanvas(id.to_string()))?,
            None => {
                let body = document.body().ok_or(EngineError::NoBody)?;
                let canvas = document
                    .create_element("canvas")?
                    .dyn_into::<HtmlCanvasElement>()
                    .map_err(|_| EngineError::NotACanvas(id.to_string()))?;
                canvas.set_id(id);
                body.append_child(&canvas)?;
                tracing::debug!(id, "created canvas");
                canvas
            }
        };
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn circle_path(&self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        if let Err(err) = self.ctx.arc(x, y, radius.max(0.0), 0.0, TAU) {
            trace!(?err, x, y, radius, "arc rejected");
        }
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn bounding_rect(&self) -> BoundingRect {
        let rect = self.canvas.get_bounding_client_rect();
        BoundingRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.circle_path(x, y, radius);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, line_width: f64) {
        self.circle_path(x, y, radius);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: &str) {
        self.ctx.set_font(&format!("{}px 'Courier New', monospace", size.round() as i32));
        self.ctx.set_fill_style_str(color);
        if let Err(err) = self.ctx.fill_text(text, x, y) {
            trace!(?err, text, "fill_text rejected");
        }
    }
}
