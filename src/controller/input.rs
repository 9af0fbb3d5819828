//! Platform-agnostic input handling

use glam::DVec2;

use crate::view::BoundingRect;

/// Pointer click in client (page) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerClick {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerClick {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    /// Position relative to the surface's top-left corner.
    pub fn local_to(&self, rect: &BoundingRect) -> DVec2 {
        let (x, y) = rect.to_local(self.client_x, self.client_y);
        DVec2::new(x, y)
    }
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    Click(PointerClick),
    Resize { width: f64, height: f64 },
    FocusLost,
}

pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }

    pub fn mouse_click_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::Click(PointerClick::new(e.client_x() as f64, e.client_y() as f64))
    }
}
