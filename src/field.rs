//! The ripple field, evaluated per pixel.
//!
//! This is the same function the fragment shader in `wasm::program` computes.
//! Keep the two in lockstep: constants here are spliced into the GLSL source.

use crate::config::{Palette, RippleConfig};
use crate::ripple::{RippleEvent, RippleSnapshot};

/// Half-width (pixels) of the visible band around each wavefront.
pub const BAND_WIDTH: f32 = 28.0;
/// Radius (pixels) around the origin where a ripple is faded out.
pub const CORE_RADIUS: f32 = 6.0;
/// Distance (pixels) over which the `max_radius` cutoff fades to zero.
pub const CUTOFF_FEATHER: f32 = 24.0;

const PURPLE: [f32; 3] = [0.5, 0.2, 0.8];
const BLUE: [f32; 3] = [0.2, 0.4, 1.0];
const LIGHT_BLUE: [f32; 3] = [0.4, 0.6, 1.0];

/// Uniform inputs of the field that do not change per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub speed: f32,
    pub frequency: f32,
    pub damping: f32,
    pub max_radius: f32,
    pub ripple_alpha: f32,
    pub intensity: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::from(&RippleConfig::default())
    }
}

impl From<&RippleConfig> for WaveParams {
    fn from(cfg: &RippleConfig) -> Self {
        Self {
            speed: cfg.speed,
            frequency: cfg.frequency,
            damping: cfg.damping,
            max_radius: cfg.max_radius,
            ripple_alpha: cfg.ripple_alpha,
            intensity: cfg.intensity,
        }
    }
}

impl WaveParams {
    /// Radius of the wavefront `age` seconds after spawn.
    pub fn wavefront_radius(&self, age: f32) -> f32 {
        age * self.speed
    }

    /// Seconds for the ring pattern to repeat at a fixed point.
    pub fn ring_period(&self) -> f32 {
        std::f32::consts::TAU / (self.frequency * self.speed)
    }

    /// Everything but the oscillating ring term: band envelope, temporal fade,
    /// core suppression, radius cutoff and per-ripple alpha.
    pub fn envelope(&self, r: f32, age: f32) -> f32 {
        if age < 0.0 {
            return 0.0;
        }
        let d = r - self.wavefront_radius(age);
        let band = (-(d / BAND_WIDTH).powi(2)).exp();
        let fade = (-self.damping * age).exp();
        let inner = smoothstep(0.0, CORE_RADIUS, r);
        band * fade * inner * self.cutoff(r) * self.ripple_alpha
    }

    /// Contribution of one ripple at distance `r` from its origin.
    pub fn contribution(&self, r: f32, age: f32) -> f32 {
        let d = r - self.wavefront_radius(age);
        let rings = 0.5 + 0.5 * (d * self.frequency).sin();
        rings * self.envelope(r, age)
    }

    fn cutoff(&self, r: f32) -> f32 {
        if self.max_radius <= 0.0 {
            return 1.0;
        }
        if r >= self.max_radius {
            return 0.0;
        }
        let feather = CUTOFF_FEATHER.min(self.max_radius);
        1.0 - smoothstep(self.max_radius - feather, self.max_radius, r)
    }

    /// Summed and clamped field at surface point `p`.
    pub fn intensity_at<I>(&self, p: [f32; 2], ripples: I, now: f32) -> f32
    where
        I: IntoIterator<Item = RippleEvent>,
    {
        let sum: f32 = ripples
            .into_iter()
            .map(|ev| {
                let dx = p[0] - ev.origin[0];
                let dy = p[1] - ev.origin[1];
                self.contribution((dx * dx + dy * dy).sqrt(), ev.age(now))
            })
            .sum();
        (sum * self.intensity).clamp(0.0, 1.0)
    }

    /// RGBA of the pixel at `p`, straight (non-premultiplied) alpha.
    pub fn shade(
        &self,
        p: [f32; 2],
        snapshot: &RippleSnapshot,
        now: f32,
        palette: Palette,
        tint: [f32; 3],
    ) -> [f32; 4] {
        let total = self.intensity_at(p, snapshot.events(), now);
        let [r, g, b] = palette_color(palette, tint, total, now);
        [r, g, b, total]
    }
}

/// Colour for a pixel with field value `total` at time `now`.
pub fn palette_color(palette: Palette, tint: [f32; 3], total: f32, now: f32) -> [f32; 3] {
    match palette {
        Palette::Tint => tint,
        Palette::Cosmic => {
            let phase = 0.5 + 0.5 * (now * 0.5 + total * 3.0).sin();
            let near = mix(PURPLE, BLUE, phase);
            let far = mix(BLUE, LIGHT_BLUE, phase);
            mix(near, far, total)
        }
    }
}

/// GLSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_matches_glsl() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tint_palette_is_constant() {
        let tint = [0.1, 0.2, 0.3];
        assert_eq!(palette_color(Palette::Tint, tint, 0.7, 12.0), tint);
    }

    #[test]
    fn cosmic_palette_stays_in_gamut() {
        for step in 0..50 {
            let t = step as f32 * 0.37;
            let c = palette_color(Palette::Cosmic, [0.0; 3], step as f32 / 49.0, t);
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)), "{c:?}");
        }
    }

    #[test]
    fn unborn_ripple_is_dark() {
        let params = WaveParams::default();
        assert_eq!(params.contribution(40.0, -0.5), 0.0);
    }
}
