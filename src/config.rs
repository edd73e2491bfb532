//! Layer configuration: the option table a page hands to `RippleLayer::mount`.

/// Length of the ripple uniform arrays in the fragment shader.
pub const MAX_RIPPLES: usize = 32;

pub const DEFAULT_MAX_RIPPLES: usize = 12;
pub const DEFAULT_SPEED: f32 = 600.0;
pub const DEFAULT_FREQUENCY: f32 = 0.045;
pub const DEFAULT_DAMPING: f32 = 2.2;
pub const DEFAULT_RIPPLE_ALPHA: f32 = 0.8;
pub const DEFAULT_COLOR: [f32; 3] = [0.55, 0.35, 1.0];
pub const DEFAULT_BLEND_MODE: &str = "screen";

/// How the shader colours lit pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Every ripple uses the configured `color`.
    #[default]
    Tint,
    /// Purple/blue blend that drifts with time and local intensity.
    Cosmic,
}

impl Palette {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tint" => Some(Palette::Tint),
            "cosmic" => Some(Palette::Cosmic),
            _ => None,
        }
    }

    /// Value uploaded to the `u_palette` uniform.
    pub fn shader_index(self) -> i32 {
        match self {
            Palette::Tint => 0,
            Palette::Cosmic => 1,
        }
    }
}

/// Ripple layer options
#[derive(Debug, Clone, PartialEq)]
pub struct RippleConfig {
    /// CSS stacking order of the layer container; `None` leaves it unset.
    pub z_index: Option<i32>,

    /// CSS `mix-blend-mode` of the layer container
    pub mix_blend_mode: String,

    /// Global visibility multiplier (CSS opacity, 0..1)
    pub opacity: f32,

    /// Ring buffer capacity (1..=MAX_RIPPLES)
    pub max_ripples: usize,

    /// Base tint (linear RGB, 0..1)
    pub color: [f32; 3],

    /// Peak opacity contribution of a single ripple
    pub ripple_alpha: f32,

    /// Wavefront expansion rate (surface pixels / second)
    pub speed: f32,

    /// Spatial ring density (radians / pixel)
    pub frequency: f32,

    /// Temporal decay rate (1 / second)
    pub damping: f32,

    /// Hard cutoff distance in surface pixels; 0 disables it
    pub max_radius: f32,

    /// Global scale applied to the summed ripple field before clamping
    pub intensity: f32,

    pub palette: Palette,

    /// Whether pointer and touch movement spawn ripples
    pub mouse_interaction: bool,

    /// Extra CSS classes for the layer container
    pub class_name: String,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            z_index: None,
            mix_blend_mode: DEFAULT_BLEND_MODE.to_string(),
            opacity: 1.0,
            max_ripples: DEFAULT_MAX_RIPPLES,
            color: DEFAULT_COLOR,
            ripple_alpha: DEFAULT_RIPPLE_ALPHA,
            speed: DEFAULT_SPEED,
            frequency: DEFAULT_FREQUENCY,
            damping: DEFAULT_DAMPING,
            max_radius: 0.0,
            intensity: 1.0,
            palette: Palette::Tint,
            mouse_interaction: true,
            class_name: String::new(),
        }
    }
}

impl RippleConfig {
    /// Returns a copy with every field pulled into its valid range.
    ///
    /// Out-of-range values never fail a mount: fractions are clamped, and
    /// negative or non-finite rates fall back to their defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();

        out.opacity = clamp_unit(self.opacity, defaults.opacity);
        out.ripple_alpha = clamp_unit(self.ripple_alpha, defaults.ripple_alpha);
        out.max_ripples = self.max_ripples.clamp(1, MAX_RIPPLES);
        out.color = self.color.map(|c| clamp_unit(c, 0.0));
        out.speed = non_negative(self.speed, defaults.speed, "speed");
        out.frequency = non_negative(self.frequency, defaults.frequency, "frequency");
        out.damping = non_negative(self.damping, defaults.damping, "damping");
        out.max_radius = non_negative(self.max_radius, defaults.max_radius, "max_radius");
        out.intensity = non_negative(self.intensity, defaults.intensity, "intensity");

        if out.mix_blend_mode.trim().is_empty() {
            out.mix_blend_mode = defaults.mix_blend_mode;
        }
        if out.max_ripples != self.max_ripples {
            log::warn!(
                "max_ripples {} out of range, using {}",
                self.max_ripples,
                out.max_ripples
            );
        }
        out
    }
}

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn non_negative(value: f32, fallback: f32, name: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{name} = {value} is invalid, using {fallback}");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_already_sane() {
        let cfg = RippleConfig::default();
        assert_eq!(cfg.sanitized(), cfg);
    }

    #[test]
    fn sanitize_clamps_and_falls_back() {
        let cfg = RippleConfig {
            opacity: 3.0,
            ripple_alpha: -1.0,
            max_ripples: 0,
            color: [2.0, -0.5, 0.25],
            speed: f32::NAN,
            damping: -4.0,
            max_radius: f32::INFINITY,
            mix_blend_mode: "  ".into(),
            ..RippleConfig::default()
        }
        .sanitized();

        assert_eq!(cfg.opacity, 1.0);
        assert_eq!(cfg.ripple_alpha, 0.0);
        assert_eq!(cfg.max_ripples, 1);
        assert_eq!(cfg.color, [1.0, 0.0, 0.25]);
        assert_eq!(cfg.speed, DEFAULT_SPEED);
        assert_eq!(cfg.damping, DEFAULT_DAMPING);
        assert_eq!(cfg.max_radius, 0.0);
        assert_eq!(cfg.mix_blend_mode, DEFAULT_BLEND_MODE);
    }

    #[test]
    fn max_ripples_capped_at_shader_limit() {
        let cfg = RippleConfig {
            max_ripples: 500,
            ..RippleConfig::default()
        };
        assert_eq!(cfg.sanitized().max_ripples, MAX_RIPPLES);
    }

    #[test]
    fn palette_names() {
        assert_eq!(Palette::parse("Cosmic"), Some(Palette::Cosmic));
        assert_eq!(Palette::parse(" tint "), Some(Palette::Tint));
        assert_eq!(Palette::parse("rainbow"), None);
    }
}
