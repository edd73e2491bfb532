use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as GL, WebglLoseContext,
    Window,
};

use crate::config::RippleConfig;
use crate::error::{LayerError, LayerResult};
use crate::input::ContainerRect;
use crate::viewport::Viewport;

/// The layer's DOM footprint: a fixed, click-through wrapper holding one
/// full-viewport canvas, plus the WebGL2 context acquired from it.
pub struct Surface {
    layer: HtmlElement,
    canvas: HtmlCanvasElement,
    gl: GL,
    attached: bool,
}

impl Surface {
    /// Build the wrapper and canvas, append them to `container` and acquire a
    /// straight-alpha WebGL2 context.
    pub fn create(
        document: &Document,
        container: &HtmlElement,
        config: &RippleConfig,
    ) -> LayerResult<Self> {
        let layer: HtmlElement = document.create_element("div")?.unchecked_into();
        style_layer(&layer, config)?;

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
        let s = canvas.style();
        s.set_property("position", "absolute")?;
        s.set_property("inset", "0")?;
        s.set_property("width", "100%")?;
        s.set_property("height", "100%")?;
        s.set_property("display", "block")?;
        s.set_property("pointer-events", "none")?;

        let gl = acquire_context(&canvas)?;

        layer.append_child(&canvas)?;
        container.append_child(&layer)?;

        Ok(Self {
            layer,
            canvas,
            gl,
            attached: true,
        })
    }

    pub fn gl(&self) -> &GL {
        &self.gl
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn layer_element(&self) -> &HtmlElement {
        &self.layer
    }

    /// Device-pixel size of the wrapper, the same rect pointer input is
    /// mapped against. `None` while it has no area.
    pub fn viewport(&self, window: &Window) -> Option<Viewport> {
        Viewport::covering(element_rect(&self.layer), window.device_pixel_ratio())
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Remove the wrapper from the document. Idempotent.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.layer.remove();
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.detach();
    }
}

fn style_layer(layer: &HtmlElement, config: &RippleConfig) -> Result<(), JsValue> {
    let s = layer.style();
    s.set_property("position", "fixed")?;
    s.set_property("inset", "0")?;
    s.set_property("width", "100%")?;
    s.set_property("height", "100%")?;
    s.set_property("pointer-events", "none")?;
    s.set_property("mix-blend-mode", &config.mix_blend_mode)?;
    s.set_property("opacity", &config.opacity.to_string())?;
    if let Some(z) = config.z_index {
        s.set_property("z-index", &z.to_string())?;
    }
    let classes = layer.class_list();
    for class in config.class_name.split_whitespace() {
        classes.add_1(class)?;
    }
    Ok(())
}

fn acquire_context(canvas: &HtmlCanvasElement) -> LayerResult<GL> {
    let attrs = js_sys::Object::new();
    js_sys::Reflect::set(&attrs, &"alpha".into(), &JsValue::TRUE)?;
    js_sys::Reflect::set(&attrs, &"premultipliedAlpha".into(), &JsValue::FALSE)?;
    js_sys::Reflect::set(&attrs, &"antialias".into(), &JsValue::FALSE)?;

    canvas
        .get_context_with_context_options("webgl2", &attrs)
        .map_err(|_| LayerError::ContextUnavailable)?
        .ok_or(LayerError::ContextUnavailable)?
        .dyn_into::<GL>()
        .map_err(|_| LayerError::ContextUnavailable)
}

/// Ask the browser to drop the context now instead of at garbage collection.
pub fn lose_context(gl: &GL) {
    if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
        ext.unchecked_into::<WebglLoseContext>().lose_context();
    }
}

pub fn element_rect(el: &HtmlElement) -> ContainerRect {
    let rect = el.get_bounding_client_rect();
    ContainerRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}
