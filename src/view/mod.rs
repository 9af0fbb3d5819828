// VIEW: Drawing surfaces
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use surface::{BoundingRect, Surface};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
