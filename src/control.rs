// Pointer position -> the two normalized control signals effects read.

use crate::types::CanvasSize;

/// Last known raw pointer position in canvas pixels. May lie outside the
/// canvas; nothing clamps it until `Controls::from_pointer`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

/// `a` follows the pointer horizontally, `b` vertically. Both in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub a: f32,
    pub b: f32,
}

impl Controls {
    pub fn from_pointer(pointer: Pointer, size: CanvasSize) -> Self {
        Self {
            a: normalize(pointer.x, size.width),
            b: normalize(pointer.y, size.height),
        }
    }
}

/// `clamp(value / extent, 0, 1)`; NaN counts as 0.
pub fn normalize(value: f32, extent: usize) -> f32 {
    if extent == 0 {
        return 0.0;
    }
    let v = value / extent as f32;
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: CanvasSize = CanvasSize { width: 800, height: 600 };

    fn controls(x: f32, y: f32) -> Controls {
        Controls::from_pointer(Pointer { x, y }, SIZE)
    }

    #[test]
    fn center_maps_to_half() {
        assert_eq!(controls(400.0, 300.0), Controls { a: 0.5, b: 0.5 });
    }

    #[test]
    fn corners_map_to_bounds() {
        assert_eq!(controls(0.0, 0.0), Controls { a: 0.0, b: 0.0 });
        assert_eq!(controls(800.0, 600.0), Controls { a: 1.0, b: 1.0 });
    }

    #[test]
    fn excursions_outside_canvas_are_clamped() {
        let cases = [
            (-50.0, -1.0),
            (5000.0, 9000.0),
            (-1.0e9, 1.0e9),
            (f32::INFINITY, f32::NEG_INFINITY),
            (f32::NAN, f32::NAN),
            (799.0, -0.001),
        ];
        for (x, y) in cases {
            let c = controls(x, y);
            assert!((0.0..=1.0).contains(&c.a), "a out of range for {x}");
            assert!((0.0..=1.0).contains(&c.b), "b out of range for {y}");
        }
        assert_eq!(controls(f32::NAN, f32::INFINITY), Controls { a: 0.0, b: 1.0 });
    }

    #[test]
    fn zero_extent_is_zero() {
        assert_eq!(normalize(10.0, 0), 0.0);
    }
}
