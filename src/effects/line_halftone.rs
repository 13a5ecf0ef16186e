use crate::draw::Canvas;
use crate::effect::{Effect, FrameContext};
use crate::types::{CanvasSize, Rgba, brightness};

use super::{grid_step, map_range};

/// Engraving look: one diagonal stroke per cell, thicker where darker.
/// `control_a` sets the cell size, 5..20 px.
/// Visual: white paper ruled with black slashes that swell in the shadows.
pub struct LineHalftone;

impl Effect for LineHalftone {
    type State = ();

    fn initialize(&self, _size: CanvasSize) {}

    fn render(&self, ctx: &FrameContext<'_>, _state: &mut (), canvas: &mut Canvas) {
        canvas.background(Rgba::WHITE);
        canvas.stroke(Rgba::BLACK);

        let step = grid_step(ctx.control_a, 5.0, 20.0);
        let s = step as f32;
        for y in (0..ctx.size.height).step_by(step) {
            for x in (0..ctx.size.width).step_by(step) {
                let bright = brightness(ctx.video.pixels[y * ctx.size.width + x]);
                canvas.stroke_weight(map_range(bright, 0.0, 255.0, s, 0.0));
                let (fx, fy) = (x as f32, y as f32);
                canvas.line(fx, fy, fx + s, fy + s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::ctx;
    use crate::types::{FrameBuffer, pack};

    fn render(level: u8) -> Canvas {
        let video = FrameBuffer::filled(20, 20, pack(level, level, level));
        let mut canvas = Canvas::new(video.size());
        // a = 0 -> 5 px cells.
        LineHalftone.render(&ctx(&video, 0.0, 0.0), &mut (), &mut canvas);
        canvas
    }

    fn inked(canvas: &Canvas) -> usize {
        canvas.frame().pixels.iter().filter(|&&p| p == 0).count()
    }

    #[test]
    fn white_video_leaves_paper_blank() {
        assert_eq!(inked(&render(255)), 0);
    }

    #[test]
    fn darker_video_draws_heavier_lines() {
        let light = render(200);
        let dark = render(0);
        assert_eq!(light.get(2, 2), Some(Rgba::BLACK));
        assert!(inked(&dark) > inked(&light));
        assert_eq!(dark.get(3, 1), Some(Rgba::BLACK));
    }
}
