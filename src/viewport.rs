//! Drawing surface dimensions in device pixels.

use crate::input::ContainerRect;

pub const MIN_PIXEL_RATIO: f64 = 1.0;
/// Upper bound on the device pixel ratio; caps fragment cost on dense screens.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Clamp a raw `devicePixelRatio` into `[MIN_PIXEL_RATIO, MAX_PIXEL_RATIO]`.
/// Non-finite input is treated as 1.
pub fn clamp_pixel_ratio(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
    } else {
        MIN_PIXEL_RATIO
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Build from CSS dimensions and the raw device pixel ratio.
    ///
    /// Returns `None` for zero, negative or non-finite sizes: during a resize
    /// the window can briefly report those, and the caller should keep the
    /// previous surface until a real size shows up.
    pub fn from_css(css_width: f64, css_height: f64, raw_ratio: f64) -> Option<Self> {
        if !(css_width.is_finite() && css_height.is_finite()) {
            return None;
        }
        let ratio = clamp_pixel_ratio(raw_ratio);
        let width_px = (css_width * ratio).round();
        let height_px = (css_height * ratio).round();
        if width_px < 1.0 || height_px < 1.0 {
            return None;
        }
        Some(Self {
            width_px: width_px as u32,
            height_px: height_px as u32,
            device_pixel_ratio: ratio,
        })
    }

    /// Surface covering `rect`. Pointer positions are mapped against the same
    /// rect by [`crate::input::map_client_point`], so both share one basis.
    pub fn covering(rect: ContainerRect, raw_ratio: f64) -> Option<Self> {
        Self::from_css(rect.width, rect.height, raw_ratio)
    }

    /// Value of the `u_resolution` uniform.
    pub fn resolution(&self) -> [f32; 2] {
        [self.width_px as f32, self.height_px as f32]
    }

    pub fn same_size(&self, other: &Viewport) -> bool {
        self.width_px == other.width_px && self.height_px == other.height_px
    }
}
