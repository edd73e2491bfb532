use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    AddEventListenerOptions, EventTarget, HtmlElement, Performance, PointerEvent, TouchEvent,
    Window,
};

use crate::clock::AnimationClock;
use crate::error::LayerResult;
use crate::input::{map_client_point, pointer_spawns};
use crate::ripple::RippleBuffer;

use super::surface::element_rect;

/// The only writer of a layer's ripple buffer. Pointer and touch listeners are
/// attached on request; [`InputTracker::push`] serves programmatic ripples.
pub struct InputTracker {
    sink: Rc<RippleSink>,
    listeners: Option<Listeners>,
}

struct RippleSink {
    ripples: Rc<RefCell<RippleBuffer>>,
    clock: AnimationClock,
    performance: Option<Performance>,
}

impl RippleSink {
    fn push(&self, x: f32, y: f32) {
        let t = self.clock.elapsed(now_ms(self.performance.as_ref()));
        // Skip rather than panic if a frame is reading the buffer.
        if let Ok(mut buf) = self.ripples.try_borrow_mut() {
            buf.push(x, y, t);
        }
    }
}

/// Passive `pointermove`/`touchmove` listeners. Removed on drop.
struct Listeners {
    target: EventTarget,
    pointer: Closure<dyn FnMut(PointerEvent)>,
    touch: Closure<dyn FnMut(TouchEvent)>,
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("pointermove", self.pointer.as_ref().unchecked_ref());
        let _ = self
            .target
            .remove_event_listener_with_callback("touchmove", self.touch.as_ref().unchecked_ref());
    }
}

impl InputTracker {
    pub fn new(window: &Window, ripples: Rc<RefCell<RippleBuffer>>, clock: AnimationClock) -> Self {
        Self {
            sink: Rc::new(RippleSink {
                ripples,
                clock,
                performance: window.performance(),
            }),
            listeners: None,
        }
    }

    /// Listen for moves on `target`. Every move that lands inside `layer`
    /// pushes exactly one ripple per contact point.
    pub fn listen(
        &mut self,
        window: &Window,
        target: EventTarget,
        layer: HtmlElement,
    ) -> LayerResult<()> {
        self.detach();

        let spawn: Rc<dyn Fn(f64, f64)> = {
            let window = window.clone();
            let sink = self.sink.clone();
            Rc::new(move |client_x: f64, client_y: f64| {
                let rect = element_rect(&layer);
                if let Some([x, y]) =
                    map_client_point(client_x, client_y, rect, window.device_pixel_ratio())
                {
                    sink.push(x, y);
                }
            })
        };

        let pointer = {
            let spawn = spawn.clone();
            Closure::wrap(Box::new(move |ev: PointerEvent| {
                if pointer_spawns(&ev.pointer_type()) {
                    spawn(ev.client_x() as f64, ev.client_y() as f64);
                }
            }) as Box<dyn FnMut(PointerEvent)>)
        };

        let touch = Closure::wrap(Box::new(move |ev: TouchEvent| {
            let touches = ev.changed_touches();
            for i in 0..touches.length() {
                if let Some(t) = touches.get(i) {
                    spawn(t.client_x() as f64, t.client_y() as f64);
                }
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        // Built first so a failed registration is undone on drop.
        let listeners = Listeners {
            target,
            pointer,
            touch,
        };
        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        listeners
            .target
            .add_event_listener_with_callback_and_add_event_listener_options(
                "pointermove",
                listeners.pointer.as_ref().unchecked_ref(),
                &opts,
            )?;
        listeners
            .target
            .add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                listeners.touch.as_ref().unchecked_ref(),
                &opts,
            )?;
        self.listeners = Some(listeners);
        Ok(())
    }

    /// Spawn a ripple at surface pixel `(x, y)`, bottom-left origin.
    pub fn push(&self, x: f32, y: f32) {
        self.sink.push(x, y);
    }

    /// Remove both listeners. Idempotent.
    pub fn detach(&mut self) {
        self.listeners = None;
    }
}

pub fn now_ms(performance: Option<&Performance>) -> f64 {
    performance
        .map(Performance::now)
        .unwrap_or_else(js_sys::Date::now)
}
