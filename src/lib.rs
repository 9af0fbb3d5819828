pub mod config;
pub mod error;
pub mod logging;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use controller::{FrameScheduler, GameLoopController, InputEvent, LoopState, PointerClick};
pub use error::{EngineError, EngineResult};
pub use model::{entity_ref, Entity, EntityKind, EntityRef, EntityView, EventContext, KeyState, Universe};
pub use view::{BoundingRect, Surface};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, convert::FromWasmAbi, prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

#[cfg(target_arch = "wasm32")]
use controller::{input::wasm as web_input, RafScheduler};
#[cfg(target_arch = "wasm32")]
use view::CanvasSurface;

/// Handle to a launched loop. Dropping it does not stop the loop.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct EngineHandle {
    controller: Rc<RefCell<GameLoopController>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl EngineHandle {
    pub fn start(&self) -> Result<bool, JsValue> {
        let now = performance_now(&self.window);
        Ok(self.controller.borrow_mut().start(now)?)
    }

    pub fn stop(&self) {
        self.controller.borrow_mut().stop();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.controller.borrow().is_running()
    }

    #[wasm_bindgen(getter = entityCount)]
    pub fn entity_count(&self) -> usize {
        self.controller.borrow().entity_count()
    }
}

#[cfg(target_arch = "wasm32")]
impl EngineHandle {
    pub fn controller(&self) -> Rc<RefCell<GameLoopController>> {
        self.controller.clone()
    }
}

/// Attach to the configured canvas, wire input, let `setup` populate the
/// world, then start the loop.
#[cfg(target_arch = "wasm32")]
pub fn launch(
    config: EngineConfig,
    setup: impl FnOnce(&mut GameLoopController),
) -> EngineResult<EngineHandle> {
    logging::init(&config.log_filter);

    let window = web_sys::window().ok_or(EngineError::NoWindow)?;
    let document = window.document().ok_or(EngineError::NoDocument)?;
    let mut surface = CanvasSurface::find_or_create(&document, &config.canvas_id)?;
    let canvas = surface.canvas().clone();
    let fit_to_window = config.fit_to_window;
    if fit_to_window {
        let (w, h) = window_size(&window);
        surface.resize(w, h);
    }

    let scheduler = RafScheduler::new(window.clone());
    let slot = scheduler.slot();
    let controller = Rc::new(RefCell::new(GameLoopController::new(
        Box::new(surface),
        Box::new(scheduler),
        config,
    )));

    // The frame callback holds a weak handle so the loop ends with the controller
    let weak = Rc::downgrade(&controller);
    RafScheduler::bind(&slot, move |timestamp: f64| {
        if let Some(controller) = weak.upgrade() {
            controller.borrow_mut().tick(timestamp);
        }
    });

    setup_input_listeners(&window, &document, &canvas, &controller, fit_to_window)?;

    setup(&mut controller.borrow_mut());
    let now = performance_now(&window);
    controller.borrow_mut().start(now)?;
    tracing::info!(canvas = %canvas.id(), "engine launched");

    Ok(EngineHandle { controller, window })
}

#[cfg(target_arch = "wasm32")]
fn listen<E: FromWasmAbi + 'static>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> EngineResult<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    controller: &Rc<RefCell<GameLoopController>>,
    fit_to_window: bool,
) -> EngineResult<()> {
    // Keyboard down
    {
        let controller = controller.clone();
        listen(window, "keydown", move |e: KeyboardEvent| {
            controller.borrow_mut().handle_event(&web_input::keyboard_event_to_input(&e, true));
        })?;
    }

    // Keyboard up
    {
        let controller = controller.clone();
        listen(window, "keyup", move |e: KeyboardEvent| {
            controller.borrow_mut().handle_event(&web_input::keyboard_event_to_input(&e, false));
        })?;
    }

    // Canvas click
    {
        let controller = controller.clone();
        listen(canvas, "click", move |e: MouseEvent| {
            controller.borrow_mut().handle_event(&web_input::mouse_click_to_input(&e));
        })?;
    }

    // Focus loss - release all keys
    {
        let controller = controller.clone();
        listen(window, "blur", move |_e: Event| {
            controller.borrow_mut().handle_event(&InputEvent::FocusLost);
        })?;
    }

    // Visibility change - release all keys
    {
        let controller = controller.clone();
        let doc = document.clone();
        listen(document, "visibilitychange", move |_e: Event| {
            if doc.hidden() {
                controller.borrow_mut().handle_event(&InputEvent::FocusLost);
            }
        })?;
    }

    if fit_to_window {
        let controller = controller.clone();
        let win = window.clone();
        listen(window, "resize", move |_e: Event| {
            let (width, height) = window_size(&win);
            controller.borrow_mut().handle_event(&InputEvent::Resize { width, height });
        })?;
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn window_size(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(800.0);
    let height = window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(600.0);
    (width, height)
}

#[cfg(target_arch = "wasm32")]
fn performance_now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}
