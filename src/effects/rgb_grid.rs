use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, Rgba, unpack};

use super::grid_step;

/// Each cell becomes three side-by-side sub-pixels carrying the red, green
/// and blue of the sample. `control_a` sets the cell size, 3..30 px.
/// Visual: a close-up of a CRT phosphor mask.
pub struct RgbSplitGrid;

impl Effect for RgbSplitGrid {
    type State = ();

    fn initialize(&self, _size: CanvasSize) {}

    fn render(&self, ctx: &FrameContext<'_>, _state: &mut (), canvas: &mut Canvas) {
        canvas.background(Rgba::BLACK);
        canvas.no_stroke();

        let cell = grid_step(ctx.control_a, 3.0, 30.0);
        let (s, sub) = (cell as f32, cell as f32 / 3.0);
        for y in (0..ctx.size.height).step_by(cell) {
            for x in (0..ctx.size.width).step_by(cell) {
                let (r, g, b) = unpack(ctx.video.pixels[y * ctx.size.width + x]);
                let (fx, fy) = (x as f32, y as f32);
                canvas.fill(Rgba::rgb(r, 0, 0));
                canvas.rect(fx, fy, sub, s);
                canvas.fill(Rgba::rgb(0, g, 0));
                canvas.rect(fx + sub, fy, sub, s);
                canvas.fill(Rgba::rgb(0, 0, b));
                canvas.rect(fx + 2.0 * sub, fy, sub, s);
            }
        }
    }
}
