use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, pack, unpack};

use super::map_range;

/// Red sampled from the left, blue from the right, green in place.
/// `control_a` sets the offset, 0..50 px.
pub struct RgbSplit;

impl Effect for RgbSplit {
    type State = ();

    fn initialize(&self, _size: CanvasSize) {}

    fn render(&self, ctx: &FrameContext<'_>, _state: &mut (), canvas: &mut Canvas) {
        let (w, h) = (ctx.size.width, ctx.size.height);
        let offset = map_range(ctx.control_a, 0.0, 1.0, 0.0, 50.0).floor() as usize % w;
        let video = ctx.video;
        let out = canvas.frame_mut();

        for y in 0..h {
            let row = y * w;
            for x in 0..w {
                let (r, _, _) = unpack(video.pixels[row + (x + w - offset) % w]);
                let (_, g, _) = unpack(video.pixels[row + x]);
                let (_, _, b) = unpack(video.pixels[row + (x + offset) % w]);
                out.pixels[row + x] = pack(r, g, b);
            }
        }
    }
}
