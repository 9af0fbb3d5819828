/// On-screen box of a surface in client (page) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Client coordinates → surface-local coordinates.
    pub fn to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.left, client_y - self.top)
    }
}

/// Something the loop can draw into. Entities and the universe draw through
/// the same primitives.
pub trait Surface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    fn resize(&mut self, width: f64, height: f64);

    fn bounding_rect(&self) -> BoundingRect;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, line_width: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: &str);

    fn clear(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.clear_rect(0.0, 0.0, w, h);
    }

    fn fill(&mut self, color: &str) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0.0, 0.0, w, h, color);
    }
}
