// Software canvas: the drawing surface effects paint on each tick.
// Pixels live in a FrameBuffer (0x00RRGGBB) so the window can show it
// as-is; shapes, lines and 5x7 bitmap text are rasterized here.

use log::debug;

use crate::types::{CanvasSize, FrameBuffer, Rgba, pack, unpack};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignX {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignY {
    Top,
    Center,
}

/// Drawing state consulted by every primitive. `push`/`pop` save and
/// restore it as a whole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_weight: f32,
    pub text_size: f32,
    pub align_x: AlignX,
    pub align_y: AlignY,
}

impl Style {
    /// What every effect starts from: white fill, no outline.
    pub fn blank_slate() -> Self {
        Self {
            fill: Some(Rgba::WHITE),
            stroke: None,
            stroke_weight: 1.0,
            text_size: 12.0,
            align_x: AlignX::Left,
            align_y: AlignY::Top,
        }
    }
}

pub struct Canvas {
    fb: FrameBuffer,
    style: Style,
    saved: Vec<Style>,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            fb: FrameBuffer::new(size.width, size.height),
            style: Style::blank_slate(),
            saved: Vec::new(),
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.fb.size()
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Direct pixel access for effects that work per pixel.
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    /// Replace pixels with another canvas of the same size. Style is untouched.
    pub fn copy_from(&mut self, other: &Canvas) {
        self.fb.pixels.copy_from_slice(&other.fb.pixels);
    }

    /* ---------- style ---------- */

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// How many `push` calls are still waiting for their `pop`.
    pub fn style_depth(&self) -> usize {
        self.saved.len()
    }

    pub fn reset_style(&mut self) {
        self.style = Style::blank_slate();
        self.saved.clear();
    }

    pub fn push(&mut self) {
        self.saved.push(self.style);
    }

    pub fn pop(&mut self) {
        match self.saved.pop() {
            Some(style) => self.style = style,
            None => debug!("pop() without matching push()"),
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.style.fill = Some(color);
    }

    pub fn stroke(&mut self, color: Rgba) {
        self.style.stroke = Some(color);
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke = None;
    }

    pub fn stroke_weight(&mut self, weight: f32) {
        self.style.stroke_weight = weight.max(0.0).min(MAX_STROKE_WEIGHT);
    }

    pub fn text_size(&mut self, size: f32) {
        self.style.text_size = size.max(1.0).min(MAX_TEXT_SIZE);
    }

    pub fn text_align(&mut self, x: AlignX, y: AlignY) {
        self.style.align_x = x;
        self.style.align_y = y;
    }

    /* ---------- pixels ---------- */

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        self.fb.get(x, y).map(Rgba::from_packed)
    }

    /// Opaque write, ignoring style.
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.fb.width && y < self.fb.height {
            self.fb.pixels[y * self.fb.width + x] = color.packed();
        }
    }

    /// Source-over blend of `color` at (x,y) if inside bounds.
    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.fb.width || y >= self.fb.height {
            return;
        }
        let idx = y * self.fb.width + x;
        self.fb.pixels[idx] = blend(self.fb.pixels[idx], color);
    }

    pub fn background(&mut self, color: Rgba) {
        if color.a == 255 {
            self.fb.pixels.fill(color.packed());
        } else {
            for px in &mut self.fb.pixels {
                *px = blend(*px, color);
            }
        }
    }

    /* ---------- shapes ---------- */

    /// Axis-aligned rectangle with its top-left corner at (x,y).
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if let Some(fill) = self.style.fill {
            let x0 = (x.round() as i32).max(0);
            let y0 = (y.round() as i32).max(0);
            let x1 = ((x + w).round() as i32).min(self.fb.width as i32);
            let y1 = ((y + h).round() as i32).min(self.fb.height as i32);
            for py in y0..y1 {
                for px in x0..x1 {
                    self.blend_pixel(px, py, fill);
                }
            }
        }
        if self.style.stroke.is_some() {
            self.line(x, y, x + w, y);
            self.line(x + w, y, x + w, y + h);
            self.line(x + w, y + h, x, y + h);
            self.line(x, y + h, x, y);
        }
    }

    /// Circle centered at (cx,cy) with diameter `d`.
    pub fn ellipse(&mut self, cx: f32, cy: f32, d: f32) {
        let r = d.abs() / 2.0;
        if r <= 0.0 {
            return;
        }
        let half_w = self.style.stroke_weight / 2.0;
        let reach = r + if self.style.stroke.is_some() { half_w } else { 0.0 };
        let bx0 = ((cx - reach).floor() as i32).max(0);
        let by0 = ((cy - reach).floor() as i32).max(0);
        let bx1 = ((cx + reach).ceil() as i32).min(self.fb.width as i32 - 1);
        let by1 = ((cy + reach).ceil() as i32).min(self.fb.height as i32 - 1);

        for py in by0..=by1 {
            for px in bx0..=bx1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if let Some(stroke) = self.style.stroke {
                    if (dist - r).abs() <= half_w {
                        self.blend_pixel(px, py, stroke);
                        continue;
                    }
                }
                if dist <= r {
                    if let Some(fill) = self.style.fill {
                        self.blend_pixel(px, py, fill);
                    }
                }
            }
        }
    }

    /// Line in the stroke color. Thin strokes use Bresenham; thicker ones
    /// stamp discs along the segment.
    /// Visual: any endpoints are fine; only the part crossing the canvas is drawn.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let Some(color) = self.style.stroke else { return };
        let weight = self.style.stroke_weight;
        if weight <= 0.0 {
            return;
        }
        let r = weight / 2.0;
        let margin = if weight <= 1.5 { 1.0 } else { r as f64 + 1.0 };
        let (w, h) = (self.fb.width as f64, self.fb.height as f64);
        let seg = [x0 as f64, y0 as f64, x1 as f64, y1 as f64];
        let Some([x0, y0, x1, y1]) = clip_segment(seg, w, h, margin) else { return };

        if weight <= 1.5 {
            let (ax, ay) = (x0.round() as i32, y0.round() as i32);
            self.bresenham(ax, ay, x1.round() as i32, y1.round() as i32, color);
            return;
        }

        let (x0, y0, x1, y1) = (x0 as f32, y0 as f32, x1 as f32, y1 as f32);
        let r2 = r * r;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let dist = (dx * dx + dy * dy).sqrt().max(1.0);
        let steps = dist.ceil() as i32;
        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (cx, cy) = (x0 + dx * t, y0 + dy * t);
            let key = (cx.round() as i32, cy.round() as i32);
            if last == Some(key) {
                continue;
            }
            last = Some(key);
            // Alpha strokes would double-blend where discs overlap; accept it.
            let (px0, px1) = (((cx - r).floor() as i32).max(0), (cx + r).ceil() as i32);
            let (py0, py1) = (((cy - r).floor() as i32).max(0), (cy + r).ceil() as i32);
            for py in py0..=py1.min(self.fb.height as i32 - 1) {
                for px in px0..=px1.min(self.fb.width as i32 - 1) {
                    let ddx = px as f32 + 0.5 - cx;
                    let ddy = py as f32 + 0.5 - cy;
                    if ddx * ddx + ddy * ddy <= r2 {
                        self.blend_pixel(px, py, color);
                    }
                }
            }
        }
    }

    fn bresenham(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let (mut x0, mut y0) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /* ---------- text ---------- */

    /// Draw `text` in the fill color. Lines split on '\n'; each line is
    /// aligned on its own, the whole block is aligned vertically.
    pub fn text(&mut self, text: &str, x: f32, y: f32) {
        let Some(color) = self.style.fill else { return };
        let scale = glyph_scale(self.style.text_size);
        let line_height =
            (self.style.text_size * 1.25).round().max((GLYPH_H * scale) as f32) as i32;
        let lines: Vec<&str> = text.split('\n').collect();
        let (x, y) = (x.clamp(-ANCHOR_LIMIT, ANCHOR_LIMIT), y.clamp(-ANCHOR_LIMIT, ANCHOR_LIMIT));

        let block_h = (lines.len() as i32 - 1) * line_height + GLYPH_H * scale;
        let top = match self.style.align_y {
            AlignY::Top => y.round() as i32,
            AlignY::Center => (y - block_h as f32 / 2.0).round() as i32,
        };

        for (i, line) in lines.iter().enumerate() {
            let width = text_width(line, scale);
            let left = match self.style.align_x {
                AlignX::Left => x.round() as i32,
                AlignX::Center => (x - width as f32 / 2.0).round() as i32,
            };
            let mut gx = left;
            for ch in line.chars() {
                if gx >= self.fb.width as i32 {
                    break;
                }
                self.draw_glyph(gx, top + i as i32 * line_height, ch, scale, color);
                gx += GLYPH_ADVANCE * scale;
            }
        }
    }

    fn draw_glyph(&mut self, x: i32, y: i32, ch: char, scale: i32, color: Rgba) {
        let Some(rows) = glyph5x7(ch) else { return };
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_W {
                if rowbits & (1 << (GLYPH_W - 1 - rx)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        self.blend_pixel(x + rx * scale + sx, y + ry as i32 * scale + sy, color);
                    }
                }
            }
        }
    }
}

/// Source-over blend of `color` onto packed pixel `dst`.
#[inline]
pub fn blend(dst: u32, color: Rgba) -> u32 {
    match color.a {
        255 => color.packed(),
        0 => dst,
        a => {
            let a = a as u32;
            let inv = 255 - a;
            let (dr, dg, db) = unpack(dst);
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
            pack(mix(color.r, dr), mix(color.g, dg), mix(color.b, db))
        }
    }
}

/// Liang-Barsky clip of `[x0, y0, x1, y1]` to the canvas grown by `margin`
/// on every side. None when the segment misses it or is not finite.
fn clip_segment(seg: [f64; 4], width: f64, height: f64, margin: f64) -> Option<[f64; 4]> {
    if !seg.iter().all(|v| v.is_finite()) {
        return None;
    }
    let [x0, y0, x1, y1] = seg;
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, x0 + margin),
        (dx, width + margin - x0),
        (-dy, y0 + margin),
        (dy, height + margin - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: fully outside or no constraint.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some([x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy])
}

/* ---------- 5x7 bitmap font ---------- */

const GLYPH_W: i32 = 5;
const GLYPH_H: i32 = 7;
const GLYPH_ADVANCE: i32 = 6; // 5 pixels glyph width + 1 pixel spacing
const MAX_TEXT_SIZE: f32 = 512.0;
const MAX_STROKE_WEIGHT: f32 = 1024.0;
const ANCHOR_LIMIT: f32 = 1.0e6;

/// Integer upscale for a requested text size; 8px per unit.
fn glyph_scale(text_size: f32) -> i32 {
    ((text_size / 8.0).round() as i32).max(1)
}

/// Pixel width of one line at `scale`.
pub fn text_width(line: &str, scale: i32) -> i32 {
    let n = line.chars().count() as i32;
    if n == 0 { 0 } else { (n * GLYPH_ADVANCE - 1) * scale }
}

/// Return a 5x7 glyph bitmap for printable ASCII we care about.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        'a' => g!(0b00000,0b00000,0b01110,0b00001,0b01111,0b10001,0b01111),
        'b' => g!(0b10000,0b10000,0b10110,0b11001,0b10001,0b10001,0b11110),
        'c' => g!(0b00000,0b00000,0b01110,0b10000,0b10000,0b10001,0b01110),
        'd' => g!(0b00001,0b00001,0b01101,0b10011,0b10001,0b10001,0b01111),
        'e' => g!(0b00000,0b00000,0b01110,0b10001,0b11111,0b10000,0b01110),
        'f' => g!(0b00110,0b01001,0b01000,0b11100,0b01000,0b01000,0b01000),
        'g' => g!(0b00000,0b01111,0b10001,0b10001,0b01111,0b00001,0b01110),
        'h' => g!(0b10000,0b10000,0b10110,0b11001,0b10001,0b10001,0b10001),
        'i' => g!(0b00100,0b00000,0b01100,0b00100,0b00100,0b00100,0b01110),
        'j' => g!(0b00010,0b00000,0b00110,0b00010,0b00010,0b10010,0b01100),
        'k' => g!(0b10000,0b10000,0b10010,0b10100,0b11000,0b10100,0b10010),
        'l' => g!(0b01100,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'm' => g!(0b00000,0b00000,0b11010,0b10101,0b10101,0b10001,0b10001),
        'n' => g!(0b00000,0b00000,0b10110,0b11001,0b10001,0b10001,0b10001),
        'o' => g!(0b00000,0b00000,0b01110,0b10001,0b10001,0b10001,0b01110),
        'p' => g!(0b00000,0b00000,0b11110,0b10001,0b11110,0b10000,0b10000),
        'q' => g!(0b00000,0b00000,0b01101,0b10011,0b01111,0b00001,0b00001),
        'r' => g!(0b00000,0b00000,0b10110,0b11001,0b10000,0b10000,0b10000),
        's' => g!(0b00000,0b00000,0b01110,0b10000,0b01110,0b00001,0b11110),
        't' => g!(0b01000,0b01000,0b11100,0b01000,0b01000,0b01001,0b00110),
        'u' => g!(0b00000,0b00000,0b10001,0b10001,0b10001,0b10011,0b01101),
        'v' => g!(0b00000,0b00000,0b10001,0b10001,0b10001,0b01010,0b00100),
        'w' => g!(0b00000,0b00000,0b10001,0b10001,0b10101,0b10101,0b01010),
        'x' => g!(0b00000,0b00000,0b10001,0b01010,0b00100,0b01010,0b10001),
        'y' => g!(0b00000,0b00000,0b10001,0b10001,0b01111,0b00001,0b01110),
        'z' => g!(0b00000,0b00000,0b11111,0b00010,0b00100,0b01000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}
