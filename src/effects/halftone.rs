use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, Rgba, brightness};

use super::{grid_step, map_range};

/// Black dots on white; darker video means a bigger dot.
/// `control_a` sets the grid, 6..20 px.
pub struct CircleHalftone;

impl Effect for CircleHalftone {
    type State = ();

    fn initialize(&self, _size: CanvasSize) {}

    fn render(&self, ctx: &FrameContext<'_>, _state: &mut (), canvas: &mut Canvas) {
        canvas.background(Rgba::WHITE);
        canvas.no_stroke();
        canvas.fill(Rgba::BLACK);

        let grid = grid_step(ctx.control_a, 6.0, 20.0);
        let half = grid as f32 / 2.0;
        for y in (0..ctx.size.height).step_by(grid) {
            for x in (0..ctx.size.width).step_by(grid) {
                let bright = brightness(ctx.video.pixels[y * ctx.size.width + x]);
                let diameter = map_range(bright, 0.0, 255.0, grid as f32, 0.0);
                canvas.ellipse(x as f32 + half, y as f32 + half, diameter);
            }
        }
    }
}
