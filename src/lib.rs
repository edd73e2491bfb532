#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Pointer-driven WebGL ripple layer.
//!
//! The ripple buffer, wave field, viewport and frame driver are plain Rust and
//! build on any target. The browser glue that wires them to a canvas, DOM
//! events and `requestAnimationFrame` only compiles for wasm32.

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod input;
pub mod ripple;
pub mod viewport;

pub use config::{Palette, RippleConfig, MAX_RIPPLES};
pub use driver::{DriverState, FrameDriver, FrameUniforms, RenderBackend};
pub use error::{LayerError, LayerResult};
pub use field::WaveParams;
pub use ripple::{RippleBuffer, RippleEvent, RippleSnapshot};
pub use viewport::Viewport;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod input;
    mod layer;
    mod program;
    mod surface;

    pub use layer::{RippleLayer, RippleOptions};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("ripple_wasm loaded");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{RippleLayer, RippleOptions};
