// Help overlay: dims the whole canvas and lists the controls in the middle.

use crate::draw::{AlignX, AlignY, Canvas};
use crate::types::Rgba;

pub const HELP_TEXT: &str =
    "Controls:\nMouse X/Y: Adjust Effect\n'S': Save Screenshot\n'H': Toggle Help\n'E': Exit";

const PANEL: Rgba = Rgba::BLACK.with_alpha(200);
const TEXT_SIZE: f32 = 16.0;

/// Whether the overlay is drawn on top of each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub help_visible: bool,
}

impl OverlayState {
    pub fn toggle(&mut self) {
        self.help_visible = !self.help_visible;
    }
}

/// Draw the overlay over everything already on `canvas`. Style is scoped
/// with push/pop.
/// Visual: the effect shows dimmed behind five centered white lines.
pub fn render(canvas: &mut Canvas) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    canvas.push();
    canvas.no_stroke();
    canvas.fill(PANEL);
    canvas.rect(0.0, 0.0, w, h);
    canvas.fill(Rgba::WHITE);
    canvas.text_size(TEXT_SIZE);
    canvas.text_align(AlignX::Center, AlignY::Center);
    canvas.text(HELP_TEXT, w / 2.0, h / 2.0);
    canvas.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Style;
    use crate::types::CanvasSize;

    fn white_canvas() -> Canvas {
        let mut c = Canvas::new(CanvasSize { width: 800, height: 600 });
        c.background(Rgba::WHITE);
        c
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut state = OverlayState::default();
        state.toggle();
        assert!(state.help_visible);
        state.toggle();
        assert_eq!(state, OverlayState::default());
    }

    #[test]
    fn dims_every_pixel_outside_the_text() {
        let mut c = white_canvas();
        render(&mut c);
        for px in &c.frame().pixels {
            let color = Rgba::from_packed(*px);
            assert!(
                color == Rgba::gray(55) || color == Rgba::WHITE,
                "unexpected pixel {color:?}"
            );
        }
        assert_eq!(c.get(0, 0), Some(Rgba::gray(55)));
        assert_eq!(c.get(799, 599), Some(Rgba::gray(55)));
    }

    #[test]
    fn text_is_centered() {
        let mut c = Canvas::new(CanvasSize { width: 800, height: 600 });
        render(&mut c);
        let lit: Vec<(usize, usize)> = (0..600)
            .flat_map(|y| (0..800).map(move |x| (x, y)))
            .filter(|&(x, y)| c.get(x, y) == Some(Rgba::WHITE))
            .collect();
        assert!(!lit.is_empty());
        let min_y = lit.iter().map(|p| p.1).min().unwrap_or(0);
        let max_y = lit.iter().map(|p| p.1).max().unwrap_or(0);
        let mid = (min_y + max_y) / 2;
        assert!((290..=310).contains(&mid), "text block centered at {mid}");
    }

    #[test]
    fn leaves_style_untouched() {
        let mut c = white_canvas();
        c.stroke(Rgba::rgb(255, 0, 0));
        let before = *c.style();
        render(&mut c);
        assert_eq!(*c.style(), before);
        assert_eq!(c.style_depth(), 0);
        assert_ne!(before, Style::blank_slate());
    }
}
