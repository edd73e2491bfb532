//! Pointer coordinate mapping, kept free of DOM types so it can be tested on
//! the host. The listeners that feed it live in `wasm::input`.

use crate::viewport::clamp_pixel_ratio;

/// Container bounds as reported by `getBoundingClientRect`, CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client-space point to surface pixels with a bottom-left origin.
///
/// Returns `None` when the point lies outside the container or the container
/// has no area.
pub fn map_client_point(
    client_x: f64,
    client_y: f64,
    rect: ContainerRect,
    raw_ratio: f64,
) -> Option<[f32; 2]> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let local_x = client_x - rect.left;
    let local_y = client_y - rect.top;
    if !(0.0..=rect.width).contains(&local_x) || !(0.0..=rect.height).contains(&local_y) {
        return None;
    }
    let ratio = clamp_pixel_ratio(raw_ratio);
    let x = local_x * ratio;
    let y = (rect.height - local_y) * ratio;
    Some([x as f32, y as f32])
}

/// Whether a `pointermove` of this `pointerType` should spawn a ripple. Touch
/// contacts also fire `touchmove`, which spawns for them, so touch pointers are
/// skipped to keep one ripple per contact point.
pub fn pointer_spawns(pointer_type: &str) -> bool {
    pointer_type != "touch"
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: ContainerRect = ContainerRect {
        left: 10.0,
        top: 20.0,
        width: 400.0,
        height: 300.0,
    };

    #[test]
    fn flips_y_axis() {
        assert_eq!(map_client_point(10.0, 20.0, RECT, 1.0), Some([0.0, 300.0]));
        assert_eq!(map_client_point(410.0, 320.0, RECT, 1.0), Some([400.0, 0.0]));
    }

    #[test]
    fn applies_clamped_ratio() {
        assert_eq!(map_client_point(110.0, 120.0, RECT, 2.0), Some([200.0, 400.0]));
        assert_eq!(map_client_point(110.0, 120.0, RECT, 4.0), Some([200.0, 400.0]));
    }

    #[test]
    fn ignores_points_outside() {
        assert_eq!(map_client_point(5.0, 100.0, RECT, 1.0), None);
        assert_eq!(map_client_point(100.0, 400.0, RECT, 1.0), None);
        let empty = ContainerRect { width: 0.0, ..RECT };
        assert_eq!(map_client_point(10.0, 20.0, empty, 1.0), None);
    }

    #[test]
    fn touch_pointers_left_to_touch_events() {
        assert!(pointer_spawns("mouse"));
        assert!(pointer_spawns("pen"));
        assert!(pointer_spawns(""));
        assert!(!pointer_spawns("touch"));
    }
}
