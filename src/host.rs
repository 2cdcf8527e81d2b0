//! Browser wiring: the frame loop, pointer routing, and the exported `PixelGrid`.
//!
//! `FrameLoop` re-requests an animation frame every tick for as long as it
//! lives; the engine's dirty flag decides whether a tick draws anything.
//! `Listeners` keeps pointer handlers on the canvas at rest and moves the
//! move/up handlers to the window while a drag is active, then moves them
//! back on release.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, PointerEvent, WheelEvent};

use crate::camera::Point;
use crate::color::Color;
use crate::config::GridConfig;
use crate::engine::{Action, Engine, EngineCore};
use crate::input::{Button, Routing};

type EventClosure = Closure<dyn FnMut(Event)>;

// =============================================================
// Frame loop
// =============================================================

struct FrameState {
    running: Cell<bool>,
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameState {
    fn schedule(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return Ok(());
        };
        let handle = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        self.handle.set(Some(handle));
        Ok(())
    }
}

/// A self-rescheduling animation-frame task, stopped on `stop` or drop.
pub struct FrameLoop {
    state: Rc<FrameState>,
}

impl FrameLoop {
    /// Start calling `tick` once per display frame.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the first frame cannot be requested.
    pub fn start(mut tick: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let state = Rc::new(FrameState {
            running: Cell::new(true),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&state);
        let cb = Closure::wrap(Box::new(move |_ts: f64| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if !state.running.get() {
                return;
            }
            tick();
            if let Err(err) = state.schedule() {
                log::warn!("frame loop stopped: {err:?}");
                state.running.set(false);
            }
        }) as Box<dyn FnMut(f64)>);

        *state.callback.borrow_mut() = Some(cb);
        state.schedule()?;
        Ok(Self { state })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Cancel the pending frame and release the callback.
    pub fn stop(&self) {
        if !self.state.running.replace(false) {
            return;
        }
        if let (Some(handle), Some(window)) = (self.state.handle.take(), web_sys::window()) {
            if let Err(err) = window.cancel_animation_frame(handle) {
                log::warn!("cancel_animation_frame failed: {err:?}");
            }
        }
        self.state.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================
// Listeners
// =============================================================

/// Pointer and wheel handlers plus the routing they are currently attached under.
pub struct Listeners {
    surface: EventTarget,
    window: EventTarget,
    engine: Rc<RefCell<Engine>>,
    routing: Cell<Routing>,
    attached: Cell<bool>,
    down: EventClosure,
    moved: EventClosure,
    up: EventClosure,
    leave: EventClosure,
    wheel: EventClosure,
}

impl Listeners {
    /// Build the handlers and attach them to the surface.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there is no window.
    pub fn attach(engine: Rc<RefCell<Engine>>) -> Result<Rc<Self>, JsValue> {
        let window: EventTarget = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?.into();
        let surface: EventTarget = engine.borrow().canvas().clone().into();

        let listeners = Rc::new_cyclic(|weak: &Weak<Self>| Self {
            surface,
            window,
            engine: Rc::clone(&engine),
            routing: Cell::new(Routing::Surface),
            attached: Cell::new(false),
            down: handler(weak, |core, ev| {
                let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                    return Vec::new();
                };
                ev.prevent_default();
                core.on_pointer_down(viewport_point(ev), Button::from_dom(ev.button()))
            }),
            moved: handler(weak, |core, ev| {
                let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                    return Vec::new();
                };
                let coalesced = coalesced_points(ev);
                core.on_pointer_move(viewport_point(ev), &coalesced)
            }),
            up: handler(weak, |core, _ev| core.on_pointer_up()),
            leave: handler(weak, |core, _ev| core.on_pointer_leave()),
            wheel: handler(weak, |core, ev| {
                let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
                    return Vec::new();
                };
                ev.prevent_default();
                let pt = Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
                core.on_wheel(pt, ev.delta_y())
            }),
        });

        listeners.attach_surface();
        Ok(listeners)
    }

    fn attach_surface(&self) {
        listen(&self.surface, "pointerdown", &self.down);
        listen(&self.surface, "pointermove", &self.moved);
        listen(&self.surface, "pointerup", &self.up);
        listen(&self.surface, "pointerleave", &self.leave);
        listen(&self.surface, "wheel", &self.wheel);
        self.attached.set(true);
    }

    /// Move the drag handlers from the surface to the window.
    pub fn capture(&self) {
        if self.routing.replace(Routing::Window) == Routing::Window {
            return;
        }
        unlisten(&self.surface, "pointermove", &self.moved);
        unlisten(&self.surface, "pointerup", &self.up);
        listen(&self.window, "pointermove", &self.moved);
        listen(&self.window, "pointerup", &self.up);
    }

    /// Move the drag handlers back to the surface.
    pub fn release(&self) {
        if self.routing.replace(Routing::Surface) == Routing::Surface {
            return;
        }
        unlisten(&self.window, "pointermove", &self.moved);
        unlisten(&self.window, "pointerup", &self.up);
        listen(&self.surface, "pointermove", &self.moved);
        listen(&self.surface, "pointerup", &self.up);
    }

    /// Remove every handler from wherever it is attached.
    pub fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        let drag_target = match self.routing.replace(Routing::Surface) {
            Routing::Surface => &self.surface,
            Routing::Window => &self.window,
        };
        unlisten(drag_target, "pointermove", &self.moved);
        unlisten(drag_target, "pointerup", &self.up);
        unlisten(&self.surface, "pointerdown", &self.down);
        unlisten(&self.surface, "pointerleave", &self.leave);
        unlisten(&self.surface, "wheel", &self.wheel);
    }

    fn process(&self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::CapturePointer => self.capture(),
                Action::ReleasePointer => self.release(),
                Action::SetCursor(cursor) => self.set_cursor(cursor),
                Action::RenderNeeded => {}
            }
        }
    }

    fn set_cursor(&self, cursor: &str) {
        let Ok(engine) = self.engine.try_borrow() else {
            return;
        };
        if let Err(err) = engine.canvas().style().set_property("cursor", cursor) {
            log::warn!("failed to set cursor: {err:?}");
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Wrap an engine handler so it refreshes the surface origin, runs, and
/// hands its actions back to the listeners.
fn handler(weak: &Weak<Listeners>, f: impl Fn(&mut EngineCore, &Event) -> Vec<Action> + 'static) -> EventClosure {
    let weak = weak.clone();
    Closure::wrap(Box::new(move |ev: Event| {
        let Some(listeners) = weak.upgrade() else {
            return;
        };
        let actions = {
            let Ok(mut engine) = listeners.engine.try_borrow_mut() else {
                log::warn!("dropped {} event: engine busy", ev.type_());
                return;
            };
            engine.sync_surface_origin();
            f(&mut engine.core, &ev)
        };
        listeners.process(actions);
    }) as Box<dyn FnMut(Event)>)
}

fn listen(target: &EventTarget, event: &str, cb: &EventClosure) {
    let f: &Function = cb.as_ref().unchecked_ref();
    if let Err(err) = target.add_event_listener_with_callback(event, f) {
        log::warn!("failed to add {event} listener: {err:?}");
    }
}

fn unlisten(target: &EventTarget, event: &str, cb: &EventClosure) {
    let f: &Function = cb.as_ref().unchecked_ref();
    if let Err(err) = target.remove_event_listener_with_callback(event, f) {
        log::warn!("failed to remove {event} listener: {err:?}");
    }
}

fn viewport_point(ev: &PointerEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

/// The sub-events batched into `ev`, oldest first.
fn coalesced_points(ev: &PointerEvent) -> Vec<Point> {
    let mut points = Vec::new();
    for value in ev.get_coalesced_events().iter() {
        if let Ok(sub) = value.dyn_into::<PointerEvent>() {
            points.push(viewport_point(&sub));
        }
    }
    points
}

// =============================================================
// Exported surface
// =============================================================

/// A mounted painting surface, exported to JavaScript.
#[wasm_bindgen]
pub struct PixelGrid {
    engine: Rc<RefCell<Engine>>,
    listeners: Rc<Listeners>,
    frames: FrameLoop,
}

#[wasm_bindgen]
impl PixelGrid {
    /// Mount on the canvas with id `canvas_id`. `config_json` may be empty.
    ///
    /// # Errors
    ///
    /// Fails when the canvas or its 2D context is missing, or the config is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<PixelGrid, JsValue> {
        let config = GridConfig::from_json(config_json.as_deref().unwrap_or_default()).map_err(to_js)?;
        let engine = Engine::from_element_id(canvas_id, config).map_err(to_js)?;
        let engine = Rc::new(RefCell::new(engine));

        let listeners = Listeners::attach(Rc::clone(&engine))?;

        let for_tick = Rc::clone(&engine);
        let frames = FrameLoop::start(move || {
            let Ok(mut engine) = for_tick.try_borrow_mut() else {
                return;
            };
            if let Err(err) = engine.render() {
                log::warn!("render failed: {err:?}");
            }
        })?;

        log::info!("pixel grid mounted on #{canvas_id}");
        Ok(Self { engine, listeners, frames })
    }

    /// Set the paint color from a `#rgb` / `#rrggbb` string. Returns `false`
    /// and keeps the current color when the string is not a color.
    pub fn set_active_color(&self, color: &str) -> bool {
        let Some(parsed) = Color::from_hex(color) else {
            log::warn!("ignoring invalid color {color:?}");
            return false;
        };
        self.engine.borrow_mut().core.set_active_color(parsed);
        true
    }

    /// Update the drawable size in CSS pixels and the device pixel ratio.
    pub fn set_viewport(&self, width: f64, height: f64, dpr: f64) {
        self.engine.borrow_mut().core.set_viewport(width, height, dpr);
    }

    /// JSON array of `{row, col, key, color, adjacency, region}` for every cell.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn cell_snapshot(&self) -> Result<String, JsValue> {
        let snapshot = self.engine.borrow().core.snapshot();
        serde_json::to_string(&snapshot).map_err(to_js)
    }

    /// Stop the frame loop and detach every listener.
    pub fn teardown(&self) {
        self.frames.stop();
        self.listeners.detach();
        log::info!("pixel grid torn down");
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
