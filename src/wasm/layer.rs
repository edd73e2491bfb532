use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, HtmlElement, Performance, Window};

use crate::config::{Palette, RippleConfig};
use crate::driver::FrameDriver;
use crate::error::{LayerError, LayerResult};
use crate::ripple::RippleBuffer;
use crate::viewport::Viewport;

use super::input::{now_ms, InputTracker};
use super::program::GlBackend;
use super::surface::{lose_context, Surface};

/// Options for [`RippleLayer::mount`]. Every setter is optional; unset fields
/// keep their defaults and out-of-range values are clamped on mount.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct RippleOptions {
    config: RippleConfig,
}

#[wasm_bindgen]
impl RippleOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(js_name = setZIndex)]
    pub fn set_z_index(&mut self, z_index: i32) {
        self.config.z_index = Some(z_index);
    }

    #[wasm_bindgen(js_name = setMixBlendMode)]
    pub fn set_mix_blend_mode(&mut self, mode: String) {
        self.config.mix_blend_mode = mode;
    }

    #[wasm_bindgen(js_name = setOpacity)]
    pub fn set_opacity(&mut self, opacity: f32) {
        self.config.opacity = opacity;
    }

    #[wasm_bindgen(js_name = setMaxRipples)]
    pub fn set_max_ripples(&mut self, max_ripples: u32) {
        self.config.max_ripples = max_ripples as usize;
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, r: f32, g: f32, b: f32) {
        self.config.color = [r, g, b];
    }

    #[wasm_bindgen(js_name = setRippleAlpha)]
    pub fn set_ripple_alpha(&mut self, alpha: f32) {
        self.config.ripple_alpha = alpha;
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed: f32) {
        self.config.speed = speed;
    }

    #[wasm_bindgen(js_name = setFrequency)]
    pub fn set_frequency(&mut self, frequency: f32) {
        self.config.frequency = frequency;
    }

    #[wasm_bindgen(js_name = setDamping)]
    pub fn set_damping(&mut self, damping: f32) {
        self.config.damping = damping;
    }

    #[wasm_bindgen(js_name = setMaxRadius)]
    pub fn set_max_radius(&mut self, max_radius: f32) {
        self.config.max_radius = max_radius;
    }

    #[wasm_bindgen(js_name = setIntensity)]
    pub fn set_intensity(&mut self, intensity: f32) {
        self.config.intensity = intensity;
    }

    /// `"tint"` or `"cosmic"`; anything else keeps the current palette.
    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&mut self, name: &str) {
        match Palette::parse(name) {
            Some(palette) => self.config.palette = palette,
            None => log::warn!("unknown palette {name:?}, keeping {:?}", self.config.palette),
        }
    }

    #[wasm_bindgen(js_name = setMouseInteraction)]
    pub fn set_mouse_interaction(&mut self, enabled: bool) {
        self.config.mouse_interaction = enabled;
    }

    #[wasm_bindgen(js_name = setClassName)]
    pub fn set_class_name(&mut self, class_name: String) {
        self.config.class_name = class_name;
    }
}

/// A mounted ripple layer. Inert when the environment could not support it.
#[wasm_bindgen]
pub struct RippleLayer {
    inner: Option<Rc<RefCell<Mounted>>>,
}

#[wasm_bindgen]
impl RippleLayer {
    /// Mount a new layer inside `container`. Never throws: when WebGL2 or the
    /// shader is unavailable the failure is logged and an inert layer returned.
    pub fn mount(container: &HtmlElement, options: Option<RippleOptions>) -> RippleLayer {
        let config = options.map(|o| o.config).unwrap_or_default().sanitized();
        match Mounted::create(container, config) {
            Ok(inner) => RippleLayer { inner: Some(inner) },
            Err(e) => {
                log::error!("ripple layer disabled: {e}");
                RippleLayer { inner: None }
            }
        }
    }

    /// Stop the frame loop, detach listeners and free GPU resources.
    /// Idempotent.
    pub fn dispose(&mut self) {
        if let Some(inner) = self.inner.take() {
            // A callback cannot be running here: JS is single threaded and
            // none of ours call back into `dispose`.
            if let Ok(mut m) = inner.try_borrow_mut() {
                m.dispose();
            }
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner
            .as_ref()
            .map(|m| m.borrow().driver.is_running())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = rippleCount)]
    pub fn ripple_count(&self) -> usize {
        self.inner
            .as_ref()
            .map(|m| m.borrow().ripples.borrow().count())
            .unwrap_or(0)
    }

    /// Spawn a ripple at surface pixel `(x, y)`, bottom-left origin.
    #[wasm_bindgen(js_name = pushRipple)]
    pub fn push_ripple(&self, x: f32, y: f32) {
        if let Some(inner) = &self.inner {
            inner.borrow().push_now(x, y);
        }
    }
}

impl Drop for RippleLayer {
    fn drop(&mut self) {
        self.dispose();
    }
}

struct Mounted {
    window: Window,
    performance: Option<Performance>,
    surface: Surface,
    driver: FrameDriver<GlBackend>,
    ripples: Rc<RefCell<RippleBuffer>>,
    input: InputTracker,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_frame: Option<Closure<dyn FnMut()>>,
    raf_id: Option<i32>,
}

impl Mounted {
    fn create(container: &HtmlElement, config: RippleConfig) -> LayerResult<Rc<RefCell<Self>>> {
        let window = window().ok_or(LayerError::NoWindow)?;
        let document = window.document().ok_or(LayerError::NoDocument)?;
        let performance = window.performance();

        let surface = Surface::create(&document, container, &config)?;
        // A zero-sized wrapper at mount gets a 1x1 surface; the first real
        // resize event replaces it.
        let viewport = surface.viewport(&window).unwrap_or(Viewport {
            width_px: 1,
            height_px: 1,
            device_pixel_ratio: 1.0,
        });
        let backend = GlBackend::new(
            surface.gl().clone(),
            surface.canvas().clone(),
            &config,
            &viewport,
        )
        .map_err(|e| {
            lose_context(surface.gl());
            e
        })?;

        let mut driver = FrameDriver::new(backend, viewport);
        driver.start(now_ms(performance.as_ref()));
        let clock = driver.clock().ok_or(LayerError::ContextUnavailable)?;

        let ripples = Rc::new(RefCell::new(RippleBuffer::new(config.max_ripples)));
        let mut input = InputTracker::new(&window, ripples.clone(), clock);
        if config.mouse_interaction {
            input.listen(&window, document.into(), surface.layer_element().clone())?;
        }

        log::info!(
            "ripple layer mounted at {}x{} (capacity {}, palette {:?})",
            viewport.width_px,
            viewport.height_px,
            config.max_ripples,
            config.palette
        );

        let mounted = Rc::new(RefCell::new(Mounted {
            window: window.clone(),
            performance,
            surface,
            driver,
            ripples,
            input,
            on_resize: None,
            on_frame: None,
            raf_id: None,
        }));

        let on_resize = {
            let weak = Rc::downgrade(&mounted);
            Closure::wrap(Box::new(move || {
                with_mounted(&weak, Mounted::resize);
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        let on_frame = {
            let weak = Rc::downgrade(&mounted);
            Closure::wrap(Box::new(move || {
                with_mounted(&weak, Mounted::frame);
            }) as Box<dyn FnMut()>)
        };

        {
            let mut m = mounted.borrow_mut();
            m.on_resize = Some(on_resize);
            m.on_frame = Some(on_frame);
            m.schedule();
        }
        Ok(mounted)
    }

    fn now_ms(&self) -> f64 {
        now_ms(self.performance.as_ref())
    }

    fn frame(&mut self) {
        self.raf_id = None;
        let now = self.now_ms();
        let again = match self.ripples.try_borrow() {
            Ok(buf) => self.driver.tick(now, &buf),
            Err(_) => self.driver.is_running(),
        };
        if again {
            self.schedule();
        }
    }

    fn schedule(&mut self) {
        let Some(cb) = self.on_frame.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn resize(&mut self) {
        if let Some(viewport) = self.surface.viewport(&self.window) {
            self.driver.resize(viewport);
        }
    }

    fn push_now(&self, x: f32, y: f32) {
        if self.driver.is_running() {
            self.input.push(x, y);
        }
    }

    fn dispose(&mut self) {
        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        if let Some(cb) = self.on_resize.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        self.input.detach();
        self.driver.dispose();
        self.surface.detach();
        self.on_frame = None;
        log::info!("ripple layer disposed after {} frames", self.driver.frames());
    }
}

/// Run `f` on the layer if it is still alive and not already borrowed.
fn with_mounted(weak: &Weak<RefCell<Mounted>>, f: impl FnOnce(&mut Mounted)) {
    let Some(mounted) = weak.upgrade() else {
        return;
    };
    let Ok(mut m) = mounted.try_borrow_mut() else {
        return;
    };
    f(&mut *m);
}
