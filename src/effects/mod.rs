//! Concrete effects, each a self-contained `Effect` implementation.
//! `main` picks one at build time.

mod cross_hatch;
mod halftone;
mod line_halftone;
mod pixelate;
mod rgb_grid;
mod rgb_split;
mod slit_scan;

pub use cross_hatch::CrossHatch;
pub use halftone::CircleHalftone;
pub use line_halftone::LineHalftone;
pub use pixelate::Pixelate;
pub use rgb_grid::RgbSplitGrid;
pub use rgb_split::RgbSplit;
pub use slit_scan::SlitScan;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    RgbSplit,
    SlitScan,
    Pixelate,
    CircleHalftone,
    LineHalftone,
    CrossHatch,
    RgbSplitGrid,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::RgbSplit,
        EffectKind::SlitScan,
        EffectKind::Pixelate,
        EffectKind::CircleHalftone,
        EffectKind::LineHalftone,
        EffectKind::CrossHatch,
        EffectKind::RgbSplitGrid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::RgbSplit => "RGB Channel Split",
            EffectKind::SlitScan => "Scanline Slit-Scan",
            EffectKind::Pixelate => "Standard Pixelate",
            EffectKind::CircleHalftone => "Circle Halftone",
            EffectKind::LineHalftone => "Line Halftone",
            EffectKind::CrossHatch => "Cross-Hatch",
            EffectKind::RgbSplitGrid => "RGB Split Grid",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EffectKind::RgbSplit => "Offsets red and blue channels. Mouse X sets the offset.",
            EffectKind::SlitScan => "Copies the center column to a moving scanline.",
            EffectKind::Pixelate => "Samples colors at larger intervals. Mouse X sets block size.",
            EffectKind::CircleHalftone => "Darker areas become larger black dots on white.",
            EffectKind::LineHalftone => "Line thickness follows darkness, like an engraving.",
            EffectKind::CrossHatch => "Layers perpendicular lines; denser where darker.",
            EffectKind::RgbSplitGrid => "Red, green and blue drawn as side-by-side sub-pixels.",
        }
    }
}

/// Linear remap of `v` from [in0, in1] to [out0, out1], unclamped.
pub fn map_range(v: f32, in0: f32, in1: f32, out0: f32, out1: f32) -> f32 {
    if in1 == in0 {
        return out0;
    }
    out0 + (v - in0) * (out1 - out0) / (in1 - in0)
}

/// `map_range` over the unit interval, floored to a usable step (>= 1).
fn grid_step(control: f32, lo: f32, hi: f32) -> usize {
    (map_range(control, 0.0, 1.0, lo, hi).floor() as usize).max(1)
}
