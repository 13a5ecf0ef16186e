use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, Rgba};

/// Copies the center video column to a scanline that walks right one
/// pixel per tick, leaving a time-smeared image behind it.
pub struct SlitScan;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanState {
    pub scan_x: usize,
}

impl Effect for SlitScan {
    type State = ScanState;

    fn initialize(&self, _size: CanvasSize) -> ScanState {
        ScanState::default()
    }

    fn render(&self, ctx: &FrameContext<'_>, state: &mut ScanState, canvas: &mut Canvas) {
        let (w, h) = (ctx.size.width, ctx.size.height);
        let center = w / 2;
        for y in 0..h {
            canvas.set(state.scan_x, y, Rgba::from_packed(ctx.video.pixels[y * w + center]));
        }

        state.scan_x = (state.scan_x + 1) % w;

        // Red marker at the next write position.
        canvas.stroke(Rgba::rgb(255, 0, 0));
        let x = state.scan_x as f32;
        canvas.line(x, 0.0, x, h as f32);
    }
}
