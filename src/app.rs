// Wires camera, window and host together and runs until exit.

use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::camera::CameraCapture;
use crate::config::HostConfig;
use crate::draw::{AlignX, AlignY, Canvas};
use crate::effect::Effect;
use crate::error::Error;
use crate::host::FrameHost;
use crate::lifecycle::{Button, RunState, Trigger};
use crate::shutdown::HttpNotifier;
use crate::types::Rgba;
use crate::window::Drawer;

const BUTTON_W: f32 = 46.0;
const BUTTON_H: f32 = 20.0;

/// Save / Help / Exit along the top-left corner. Drawn on the presented
/// image only, so snapshots never contain them.
pub struct ButtonBar {
    buttons: Vec<(Button, f32, f32)>,
}

impl ButtonBar {
    pub fn standard() -> Self {
        let xs = [10.0, 60.0, 110.0];
        Self {
            buttons: Button::ALL.iter().zip(xs).map(|(&b, x)| (b, x, 10.0)).collect(),
        }
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<Button> {
        self.buttons
            .iter()
            .find(|&&(_, bx, by)| x >= bx && x < bx + BUTTON_W && y >= by && y < by + BUTTON_H)
            .map(|&(b, _, _)| b)
    }

    pub fn render(&self, canvas: &mut Canvas) {
        canvas.push();
        canvas.stroke_weight(1.0);
        canvas.text_size(8.0);
        canvas.text_align(AlignX::Center, AlignY::Center);
        for &(button, x, y) in &self.buttons {
            canvas.stroke(Rgba::gray(118));
            canvas.fill(Rgba::gray(239));
            canvas.rect(x, y, BUTTON_W, BUTTON_H);
            canvas.no_stroke();
            canvas.fill(Rgba::BLACK);
            canvas.text(button.label(), x + BUTTON_W / 2.0, y + BUTTON_H / 2.0);
        }
        canvas.pop();
    }
}

/// Frames per second, reported once per elapsed second.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self { window_start: now, frames: 0 }
    }

    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

/// Open camera and window, then tick `effect` until exit.
pub fn run<E: Effect>(config: HostConfig, effect: E) -> Result<(), Error> {
    config.validate()?;

    /* --- Camera + window setup ---
       Visual: window opens; the camera feed only shows through the effect. */
    let camera = CameraCapture::new(config.camera_index, config.width as u32, config.height as u32)
        .inspect_err(|e| error!("{e}"))?;
    let mut drawer = Drawer::new(&config.title, config.width, config.height, config.target_fps)
        .inspect_err(|e| error!("{e}"))?;

    /* --- Host and presentation buffers ---
       Visual: `screen` is what you see; the host canvas is what gets saved. */
    let notifier = HttpNotifier::new(config.shutdown_timeout);
    let mut host = FrameHost::new(config.clone(), camera, effect, notifier)?;
    let buttons = ButtonBar::standard();
    let mut screen = Canvas::new(config.size());
    let mut fps = FpsCounter::new(Instant::now());

    while drawer.is_open() {
        let input = drawer.poll_input();
        if let Some((x, y)) = input.pointer {
            host.set_pointer(x, y);
        }
        for key in input.keys {
            host.dispatch(Trigger::Key(key));
        }
        if let Some(button) = input.click.and_then(|(x, y)| buttons.hit(x, y)) {
            host.dispatch(Trigger::Button(button));
        }
        if host.run_state() == RunState::ShuttingDown {
            break;
        }

        host.tick();

        screen.copy_from(host.canvas());
        buttons.render(&mut screen);
        drawer.present(screen.frame())?;

        if let Some(rate) = fps.tick(Instant::now()) {
            debug!("FPS: {rate:.1} controls: {:?}", host.controls());
        }
    }

    /* --- Shutdown ---
       Visual: the last frame stays up until the notification settles. */
    if let Some(mut task) = host.take_shutdown_task() {
        while drawer.is_open() && task.poll().is_none() {
            drawer.pump();
        }
        debug!("shutdown notification settled: {:?}", task.wait());
    }

    info!("closing window after {} frames", host.frame_count());
    drop(drawer);
    Ok(())
}
