use crate::error::EngineResult;

/// Host per-frame callback primitive. Each `request_frame` asks the host to
/// invoke the bound continuation once, at the next display refresh, with a
/// millisecond timestamp.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> EngineResult<()>;
}

#[cfg(target_arch = "wasm32")]
pub use raf::RafScheduler;

#[cfg(target_arch = "wasm32")]
mod raf {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::Window;

    use super::FrameScheduler;
    use crate::error::{EngineError, EngineResult};

    pub type FrameCallback = Closure<dyn FnMut(f64)>;

    /// `requestAnimationFrame` scheduler. The continuation lives in a shared
    /// slot so it can be bound after the controller that owns this scheduler
    /// has been built.
    pub struct RafScheduler {
        window: Window,
        callback: Rc<RefCell<Option<FrameCallback>>>,
    }

    impl RafScheduler {
        pub fn new(window: Window) -> Self {
            Self {
                window,
                callback: Rc::new(RefCell::new(None)),
            }
        }

        pub fn slot(&self) -> Rc<RefCell<Option<FrameCallback>>> {
            self.callback.clone()
        }

        pub fn bind(slot: &Rc<RefCell<Option<FrameCallback>>>, f: impl FnMut(f64) + 'static) {
            *slot.borrow_mut() = Some(Closure::wrap(Box::new(f) as Box<dyn FnMut(f64)>));
        }
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self) -> EngineResult<()> {
            let callback = self.callback.borrow();
            let callback = callback
                .as_ref()
                .ok_or_else(|| EngineError::Schedule("frame callback not bound".to_string()))?;
            self.window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map_err(|e| EngineError::Schedule(format!("{e:?}")))?;
            Ok(())
        }
    }
}
