// The on-screen window and the raw input it reports.

use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I, Key::J, Key::K, Key::L,
    Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R, Key::S, Key::T, Key::U, Key::V, Key::W, Key::X,
    Key::Y, Key::Z,
];

/// Input gathered since the last window update.
#[derive(Debug, Default)]
pub struct InputSnapshot {
    /// Raw pointer position; may be outside the window.
    pub pointer: Option<(f32, f32)>,
    /// Newly pressed letter keys, uppercase while shift is held.
    pub keys: Vec<char>,
    /// Where the left button went down this frame, if it did.
    pub click: Option<(f32, f32)>,
}

pub struct Drawer {
    window: Window,
    left_was_down: bool,
}

impl Drawer {
    /// Open a fixed-size window paced at `target_fps`.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);
        Ok(Self { window, left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Process window events without drawing.
    pub fn pump(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn poll_input(&mut self) -> InputSnapshot {
        let pointer = self.window.get_mouse_pos(MouseMode::Pass);

        let shift =
            self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift);
        let keys = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(|key| key_char(key, shift))
            .collect();

        let left_down = self.window.get_mouse_down(MouseButton::Left);
        let click = if left_down && !self.left_was_down { pointer } else { None };
        self.left_was_down = left_down;

        InputSnapshot { pointer, keys, click }
    }
}

/// Letter for `key`, in `LETTERS` order from 'a'.
fn key_char(key: Key, shift: bool) -> Option<char> {
    let i = LETTERS.iter().position(|&k| k == key)?;
    let c = (b'a' + i as u8) as char;
    Some(if shift { c.to_ascii_uppercase() } else { c })
}
