/// Turnstage Web - wasm binding of the rotation controller for a browser host
///
/// Wires pointer, touch and keyboard listeners on a canvas to one controller
/// instance and exposes a per-frame `tick()` plus angle/stage getters. The
/// embedding page owns rendering and the requestAnimationFrame loop: call
/// `tick()` once per frame and apply `rotation()` to the scene object.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use turnstage_core::{RotateKey, RotationController};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

type Listener = (&'static str, EventTarget, Closure<dyn FnMut(Event)>);

/// Browser-facing handle around one [`RotationController`].
///
/// `dispose()` must be called when the scene is torn down: it removes every
/// DOM listener, and a disposed handle ignores any stale callback reference
/// the page might still invoke.
#[wasm_bindgen]
pub struct WebController {
    controller: Rc<RefCell<RotationController>>,
    disposed: Rc<Cell<bool>>,
    canvas: HtmlCanvasElement,
    listeners: Vec<Listener>,
    on_stage: Rc<RefCell<Option<js_sys::Function>>>,
}

#[wasm_bindgen]
impl WebController {
    /// Attach a controller to the canvas with the given DOM id.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebController, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas not found"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let controller = Rc::new(RefCell::new(RotationController::new(
            canvas.client_width().max(1) as f32,
        )));
        let disposed = Rc::new(Cell::new(false));
        let on_stage = Rc::new(RefCell::new(None::<js_sys::Function>));

        let mut binding = WebController {
            controller,
            disposed,
            canvas: canvas.clone(),
            listeners: Vec::new(),
            on_stage,
        };

        let canvas_target: EventTarget = canvas.into();
        let window_target: EventTarget = window.into();

        // Pointer and touch funnel through the same drag contract; the first
        // touch contact stands in for the pointer position.
        binding.listen(&canvas_target, "pointerdown", |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(x) = horizontal_coord(event) {
                controller.drag_start(x);
            }
        })?;
        binding.listen(&canvas_target, "pointermove", |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(x) = horizontal_coord(event) {
                controller.drag_move(x);
            }
        })?;
        binding.listen(&canvas_target, "pointerup", |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            controller.drag_end();
        })?;
        binding.listen(&canvas_target, "touchstart", |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(x) = horizontal_coord(event) {
                controller.drag_start(x);
            }
        })?;
        binding.listen(&canvas_target, "touchmove", |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(x) = horizontal_coord(event) {
                controller.drag_move(x);
            }
        })?;
        binding.listen(&canvas_target, "touchend", |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            controller.drag_end();
        })?;
        binding.listen(&window_target, "keydown", |controller, event| {
            if let Some(key) = rotate_key(event) {
                controller.key_down(key);
            }
        })?;
        binding.listen(&window_target, "keyup", |controller, event| {
            if let Some(key) = rotate_key(event) {
                controller.key_up(key);
            }
        })?;

        Ok(binding)
    }

    /// Advance one rendered frame; call once per requestAnimationFrame.
    ///
    /// Dragging frames re-classify the stage and report it to the `on_stage`
    /// callback. The controller borrow is released before the callback runs,
    /// so the page may freely read this handle from inside it.
    pub fn tick(&self) {
        if self.disposed.get() {
            return;
        }
        let (dragging, stage) = {
            let mut controller = self.controller.borrow_mut();
            controller.update();
            (controller.is_dragging(), controller.stage())
        };
        if dragging {
            let callback = self.on_stage.borrow().as_ref().cloned();
            if let Some(callback) = callback {
                let value = match stage {
                    Some(stage) => JsValue::from(stage.0),
                    None => JsValue::NULL,
                };
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        }
    }

    /// Unbounded accumulated rotation in radians
    pub fn rotation(&self) -> f32 {
        self.controller.borrow().angle()
    }

    /// Rotation reduced to [0, 2π)
    pub fn normalized_rotation(&self) -> f32 {
        self.controller.borrow().normalized_angle()
    }

    /// Current stage id, or `undefined` when no window matches
    pub fn stage(&self) -> Option<u8> {
        self.controller.borrow().stage().map(|stage| stage.0)
    }

    pub fn is_rotating(&self) -> bool {
        self.controller.borrow().is_dragging()
    }

    /// Register a page callback invoked with the stage id (or null) on every
    /// dragging frame.
    pub fn set_on_stage(&self, callback: js_sys::Function) {
        *self.on_stage.borrow_mut() = Some(callback);
    }

    /// Re-read the canvas width after a layout change
    pub fn sync_viewport(&self) {
        if self.disposed.get() {
            return;
        }
        self.controller
            .borrow_mut()
            .set_viewport_width(self.canvas.client_width().max(1) as f32);
    }

    /// Remove every DOM listener. Idempotent; the handle goes inert.
    pub fn dispose(&mut self) {
        if self.disposed.replace(true) {
            return;
        }
        for (name, target, closure) in self.listeners.drain(..) {
            let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
        *self.on_stage.borrow_mut() = None;
    }
}

impl WebController {
    fn listen(
        &mut self,
        target: &EventTarget,
        name: &'static str,
        handler: fn(&mut RotationController, &Event),
    ) -> Result<(), JsValue> {
        let controller = Rc::clone(&self.controller);
        let disposed = Rc::clone(&self.disposed);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if disposed.get() {
                return;
            }
            handler(&mut controller.borrow_mut(), &event);
        });
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        self.listeners.push((name, target.clone(), closure));
        Ok(())
    }
}

/// One coordinate extraction step shared by mouse, pointer and touch events
fn horizontal_coord(event: &Event) -> Option<f32> {
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        return touch_event
            .touches()
            .get(0)
            .map(|touch| touch.client_x() as f32);
    }
    event
        .dyn_ref::<MouseEvent>()
        .map(|mouse| mouse.client_x() as f32)
}

fn rotate_key(event: &Event) -> Option<RotateKey> {
    let keyboard = event.dyn_ref::<KeyboardEvent>()?;
    match keyboard.key().as_str() {
        "ArrowLeft" => Some(RotateKey::Left),
        "ArrowRight" => Some(RotateKey::Right),
        _ => None,
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Surface panics in the browser console
    console_error_panic_hook::set_once();
    Ok(())
}
