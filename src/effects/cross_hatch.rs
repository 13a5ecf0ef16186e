use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, Rgba, brightness};

use super::grid_step;

/// Pencil shading: up to three line layers per cell, added as the video
/// gets darker. `control_a` sets the spacing, 8..20 px.
/// Visual: thin black pencil lines on white paper.
pub struct CrossHatch;

impl Effect for CrossHatch {
    type State = ();

    fn initialize(&self, _size: CanvasSize) {}

    fn render(&self, ctx: &FrameContext<'_>, _state: &mut (), canvas: &mut Canvas) {
        canvas.background(Rgba::WHITE);
        canvas.stroke(Rgba::BLACK);
        canvas.stroke_weight(1.0);

        let step = grid_step(ctx.control_a, 8.0, 20.0);
        let s = step as f32;
        for y in (0..ctx.size.height).step_by(step) {
            for x in (0..ctx.size.width).step_by(step) {
                let bright = brightness(ctx.video.pixels[y * ctx.size.width + x]);
                let (fx, fy) = (x as f32, y as f32);
                if bright < 200.0 {
                    canvas.line(fx, fy, fx + s, fy + s);
                }
                if bright < 150.0 {
                    canvas.line(fx + s, fy, fx, fy + s);
                }
                if bright < 100.0 {
                    canvas.line(fx, fy, fx, fy + s);
                }
            }
        }
    }
}
