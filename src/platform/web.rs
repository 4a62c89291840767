//! Browser glue: `requestAnimationFrame` loop and canvas listeners
//!
//! A [`MountedDemo`] owns everything it registered. Dropping it stops the
//! scheduler, cancels the pending frame and detaches every listener; a frame
//! callback that still fires afterwards finds nothing to upgrade and returns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};

use super::{FrameToken, Scheduler};
use crate::demos::Demo;
use crate::error::{DemoError, Result};
use crate::renderer::CanvasSurface;

struct Shared {
    scheduler: RefCell<Scheduler<Box<dyn Demo>>>,
    surface: RefCell<CanvasSurface>,
    raf_handle: Cell<Option<i32>>,
}

/// A DOM listener that detaches itself when dropped
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, callback: Closure<dyn FnMut(Event)>) -> Result<Self> {
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| DemoError::Dom(format!("add {kind} listener: {e:?}")))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// A demo attached to a canvas and running
pub struct MountedDemo {
    shared: Rc<Shared>,
    _listeners: Vec<Listener>,
}

impl MountedDemo {
    /// Attach `demo` to the canvas with id `canvas_id` and start its loop
    pub fn mount(canvas_id: &str, demo: Box<dyn Demo>) -> Result<Self> {
        let window = web_sys::window().ok_or(DemoError::SurfaceUnavailable)?;
        let document = window.document().ok_or(DemoError::SurfaceUnavailable)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or(DemoError::SurfaceUnavailable)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| DemoError::SurfaceUnavailable)?;
        let surface = CanvasSurface::new(canvas.clone())?;

        let mut scheduler = Scheduler::new(demo);
        let (w, h) = surface.client_size();
        scheduler.request_resize(w, h);
        let token = scheduler.start();

        let shared = Rc::new(Shared {
            scheduler: RefCell::new(scheduler),
            surface: RefCell::new(surface),
            raf_handle: Cell::new(None),
        });

        let listeners = vec![
            Listener::attach(&canvas, "mousemove", pointer_move_handler(&shared, &canvas))?,
            Listener::attach(&canvas, "touchmove", touch_move_handler(&shared, &canvas))?,
            Listener::attach(&canvas, "mouseleave", pointer_leave_handler(&shared))?,
            Listener::attach(&window, "resize", resize_handler(&shared))?,
        ];

        request_frame(&shared, token);
        log::info!("mounted demo on #{canvas_id}");
        Ok(Self {
            shared,
            _listeners: listeners,
        })
    }

    /// Forward a named control change to the demo
    pub fn control(&self, name: &str, value: &str) -> bool {
        self.shared.scheduler.borrow_mut().demo_mut().control(name, value)
    }
}

impl Drop for MountedDemo {
    fn drop(&mut self) {
        self.shared.scheduler.borrow_mut().stop();
        if let Some(handle) = self.shared.raf_handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }
}

fn request_frame(shared: &Rc<Shared>, token: FrameToken) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let weak = Rc::downgrade(shared);
    let callback = Closure::once_into_js(move |time: f64| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.raf_handle.set(None);
        let next = {
            let mut scheduler = shared.scheduler.borrow_mut();
            let mut surface = shared.surface.borrow_mut();
            scheduler.on_frame(token, time, &mut *surface)
        };
        if let Some(next) = next {
            request_frame(&shared, next);
        }
    });
    match window.request_animation_frame(callback.unchecked_ref()) {
        Ok(handle) => shared.raf_handle.set(Some(handle)),
        Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
    }
}

fn with_demo(weak: &Weak<Shared>, f: impl FnOnce(&mut dyn Demo)) {
    if let Some(shared) = weak.upgrade() {
        // A listener can fire while a frame holds the borrow; drop the event then
        if let Ok(mut scheduler) = shared.scheduler.try_borrow_mut() {
            f(scheduler.demo_mut().as_mut());
        }
    }
}

fn pointer_move_handler(shared: &Rc<Shared>, canvas: &HtmlCanvasElement) -> Closure<dyn FnMut(Event)> {
    let weak = Rc::downgrade(shared);
    let canvas = canvas.clone();
    Closure::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let rect = canvas.get_bounding_client_rect();
        let x = f64::from(event.client_x()) - rect.left();
        let y = f64::from(event.client_y()) - rect.top();
        with_demo(&weak, |demo| demo.pointer_move(x, y));
    })
}

fn touch_move_handler(shared: &Rc<Shared>, canvas: &HtmlCanvasElement) -> Closure<dyn FnMut(Event)> {
    let weak = Rc::downgrade(shared);
    let canvas = canvas.clone();
    Closure::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        if let Some(touch) = event.touches().get(0) {
            let rect = canvas.get_bounding_client_rect();
            let x = f64::from(touch.client_x()) - rect.left();
            let y = f64::from(touch.client_y()) - rect.top();
            with_demo(&weak, |demo| demo.pointer_move(x, y));
        }
    })
}

fn pointer_leave_handler(shared: &Rc<Shared>) -> Closure<dyn FnMut(Event)> {
    let weak = Rc::downgrade(shared);
    Closure::new(move |_event: Event| {
        with_demo(&weak, |demo| demo.pointer_leave());
    })
}

fn resize_handler(shared: &Rc<Shared>) -> Closure<dyn FnMut(Event)> {
    let weak = Rc::downgrade(shared);
    Closure::new(move |_event: Event| {
        if let Some(shared) = weak.upgrade() {
            let (w, h) = shared.surface.borrow().client_size();
            if let Ok(mut scheduler) = shared.scheduler.try_borrow_mut() {
                scheduler.request_resize(w, h);
            }
        }
    })
}
