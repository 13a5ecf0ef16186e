use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, Rgba};

use super::grid_step;

/// Square blocks colored by the video pixel at each block's corner.
/// `control_a` sets the block size, 4..40 px.
pub struct Pixelate;

impl Effect for Pixelate {
    type State = ();

    fn initialize(&self, _size: CanvasSize) {}

    fn render(&self, ctx: &FrameContext<'_>, _state: &mut (), canvas: &mut Canvas) {
        canvas.background(Rgba::BLACK);
        canvas.no_stroke();

        let grid = grid_step(ctx.control_a, 4.0, 40.0);
        for y in (0..ctx.size.height).step_by(grid) {
            for x in (0..ctx.size.width).step_by(grid) {
                let px = ctx.video.pixels[y * ctx.size.width + x];
                canvas.fill(Rgba::from_packed(px));
                canvas.rect(x as f32, y as f32, grid as f32, grid as f32);
            }
        }
    }
}
