//! The seam between the host and a generated effect.
//!
//! An effect is composed with the host at build time: `FrameHost` is
//! generic over `E: Effect`, so there is no runtime loading. The host owns
//! the loop and the canvas; the effect owns the pixels it draws and
//! whatever auxiliary state it declares.

use std::panic::{self, AssertUnwindSafe};

use crate::draw::Canvas;
use crate::types::{CanvasSize, FrameBuffer};

/// Everything an effect may read during one tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    /// Pointer X normalized to [0, 1].
    pub control_a: f32,
    /// Pointer Y normalized to [0, 1].
    pub control_b: f32,
    /// Latest camera frame, same size as the canvas.
    pub video: &'a FrameBuffer,
    pub size: CanvasSize,
    /// Ticks completed before this one.
    pub frame_count: u64,
}

pub trait Effect {
    /// Auxiliary state the effect keeps across ticks.
    type State;

    /// Called once, before the first tick.
    fn initialize(&self, size: CanvasSize) -> Self::State;

    /// Draw one frame. Must not assume anything about the canvas style
    /// beyond the blank slate the host resets to at startup.
    fn render(&self, ctx: &FrameContext<'_>, state: &mut Self::State, canvas: &mut Canvas);
}

/// Run `render`, turning a panic into `Err(message)` so the loop survives
/// one bad frame.
pub fn render_isolated<E: Effect>(
    effect: &E,
    ctx: &FrameContext<'_>,
    state: &mut E::State,
    canvas: &mut Canvas,
) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(|| effect.render(ctx, state, canvas))).map_err(|payload| {
        if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("effect panicked")
        }
    })
}
