// The frame host: owns canvas, camera and effect, runs ticks and applies
// lifecycle actions. It knows nothing about windows; `app` feeds it input
// and presents its canvas.

use std::path::PathBuf;

use log::{debug, error, info, warn};

use crate::camera::VideoSource;
use crate::config::HostConfig;
use crate::control::{Controls, Pointer};
use crate::draw::Canvas;
use crate::effect::{self, Effect, FrameContext};
use crate::error::Error;
use crate::lifecycle::{self, Action, RunState, Trigger};
use crate::overlay::{self, OverlayState};
use crate::shutdown::{Notifier, ShutdownTask};
use crate::snapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// The effect panicked; the overlay (if visible) was still drawn.
    EffectFailed,
    /// Shutting down; nothing was drawn.
    Stopped,
}

pub struct FrameHost<E: Effect, V: VideoSource, N: Notifier> {
    config: HostConfig,
    canvas: Canvas,
    video: V,
    effect: E,
    state: E::State,
    notifier: N,
    pointer: Pointer,
    controls: Controls,
    overlay: OverlayState,
    run_state: RunState,
    frame_count: u64,
    shutdown: Option<ShutdownTask>,
}

impl<E: Effect, V: VideoSource, N: Notifier> FrameHost<E, V, N> {
    /// Set up the canvas and hand the effect its one `initialize` call.
    /// `video` must already deliver canvas-sized frames.
    pub fn new(config: HostConfig, video: V, effect: E, notifier: N) -> Result<Self, Error> {
        config.validate()?;
        let size = config.size();
        let video_size = video.frame().size();
        if video_size != size {
            return Err(Error::CameraInit(format!(
                "capture is {}x{}, canvas is {}x{}",
                video_size.width, video_size.height, size.width, size.height
            )));
        }

        let mut canvas = Canvas::new(size);
        canvas.reset_style();
        let state = effect.initialize(size);

        Ok(Self {
            config,
            canvas,
            video,
            effect,
            state,
            notifier,
            pointer: Pointer::default(),
            controls: Controls::default(),
            overlay: OverlayState::default(),
            run_state: RunState::Running,
            frame_count: 0,
            shutdown: None,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Record the raw pointer position; it's normalized on the next tick.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Pointer { x, y };
    }

    /// One frame: controls, effect, overlay. Does nothing once shutting down.
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state == RunState::ShuttingDown {
            return TickOutcome::Stopped;
        }

        let size = self.canvas.size();
        self.controls = Controls::from_pointer(self.pointer, size);

        if let Err(e) = self.video.refresh() {
            warn!("{e}; reusing previous frame");
        }

        let ctx = FrameContext {
            control_a: self.controls.a,
            control_b: self.controls.b,
            video: self.video.frame(),
            size,
            frame_count: self.frame_count,
        };

        let outcome =
            match effect::render_isolated(&self.effect, &ctx, &mut self.state, &mut self.canvas) {
                Ok(()) => {
                    if self.canvas.style_depth() > 0 {
                        debug!("effect left {} push() without pop()", self.canvas.style_depth());
                    }
                    TickOutcome::Rendered
                }
                Err(msg) => {
                    error!("effect panicked on frame {}, skipping: {msg}", ctx.frame_count);
                    self.canvas.reset_style();
                    TickOutcome::EffectFailed
                }
            };

        if self.overlay.help_visible {
            overlay::render(&mut self.canvas);
        }

        self.frame_count += 1;
        outcome
    }

    /// Look up `trigger` in the binding table and run its action.
    pub fn dispatch(&mut self, trigger: Trigger) -> Option<Action> {
        let action = lifecycle::resolve(trigger)?;
        debug!("{trigger:?} -> {action:?}");
        self.perform(action);
        Some(action)
    }

    pub fn perform(&mut self, action: Action) {
        match action {
            Action::Save => match self.save() {
                Ok(path) => info!("saved {}", path.display()),
                Err(e) => error!("save failed: {e}"),
            },
            Action::ToggleHelp => self.overlay.toggle(),
            Action::Exit => self.exit(),
        }
    }

    /// Write the current canvas to the configured PNG path.
    pub fn save(&self) -> Result<PathBuf, Error> {
        let path = self.config.output_path();
        snapshot::save_png(self.canvas.frame(), &path)?;
        Ok(path)
    }

    fn exit(&mut self) {
        if self.run_state == RunState::ShuttingDown {
            debug!("exit requested again; already shutting down");
            return;
        }
        info!("Exiting sketch...");
        self.run_state = RunState::ShuttingDown;
        self.video.pause();
        self.shutdown = Some(self.notifier.notify(&self.config.shutdown_url));
    }

    /// The in-flight shutdown notification, if exit has happened.
    pub fn take_shutdown_task(&mut self) -> Option<ShutdownTask> {
        self.shutdown.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Style;
    use crate::lifecycle::Button;
    use crate::shutdown::NotifyOutcome;
    use crate::types::{CanvasSize, FrameBuffer, Rgba};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tempfile::tempdir;

    const W: usize = 80;
    const H: usize = 60;

    struct FakeVideo {
        frame: FrameBuffer,
        fail_refresh: bool,
        pauses: Rc<Cell<usize>>,
    }

    impl FakeVideo {
        fn new(pauses: Rc<Cell<usize>>) -> Self {
            Self { frame: FrameBuffer::filled(W, H, 0x00_40_80_C0), fail_refresh: false, pauses }
        }
    }

    impl VideoSource for FakeVideo {
        fn refresh(&mut self) -> Result<(), Error> {
            if self.fail_refresh {
                return Err(Error::CameraFrame("no frame".into()));
            }
            Ok(())
        }
        fn frame(&self) -> &FrameBuffer {
            &self.frame
        }
        fn pause(&mut self) {
            self.pauses.set(self.pauses.get() + 1);
        }
    }

    struct FakeNotifier {
        calls: Rc<Cell<usize>>,
        outcome: NotifyOutcome,
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, endpoint: &str) -> ShutdownTask {
            assert!(endpoint.ends_with("/shutdown"));
            self.calls.set(self.calls.get() + 1);
            ShutdownTask::completed(self.outcome.clone())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Seen {
        a: f32,
        b: f32,
        tick_state: u32,
        frame_count: u64,
        video_px: u32,
    }

    /// Paints the whole canvas white and records what it was handed.
    #[derive(Default)]
    struct Recorder {
        inits: Rc<Cell<usize>>,
        seen: Rc<RefCell<Vec<Seen>>>,
        panic_on_first: bool,
    }

    impl Effect for Recorder {
        type State = u32;

        fn initialize(&self, size: CanvasSize) -> u32 {
            assert_eq!(size, CanvasSize { width: W, height: H });
            self.inits.set(self.inits.get() + 1);
            0
        }

        fn render(&self, ctx: &FrameContext<'_>, state: &mut u32, canvas: &mut Canvas) {
            if self.panic_on_first && ctx.frame_count == 0 {
                canvas.push();
                canvas.stroke(Rgba::rgb(255, 0, 0));
                panic!("bad generated effect");
            }
            *state += 1;
            self.seen.borrow_mut().push(Seen {
                a: ctx.control_a,
                b: ctx.control_b,
                tick_state: *state,
                frame_count: ctx.frame_count,
                video_px: ctx.video.pixels[0],
            });
            canvas.background(Rgba::WHITE);
        }
    }

    struct Harness {
        host: FrameHost<Recorder, FakeVideo, FakeNotifier>,
        seen: Rc<RefCell<Vec<Seen>>>,
        inits: Rc<Cell<usize>>,
        pauses: Rc<Cell<usize>>,
        notifications: Rc<Cell<usize>>,
        _dir: tempfile::TempDir,
        out_dir: PathBuf,
    }

    fn harness_with(effect: Recorder, outcome: NotifyOutcome) -> Harness {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_path_buf();
        let config = HostConfig {
            width: W,
            height: H,
            output_dir: out_dir.clone(),
            ..Default::default()
        };
        let pauses = Rc::new(Cell::new(0));
        let notifications = Rc::new(Cell::new(0));
        let seen = effect.seen.clone();
        let inits = effect.inits.clone();
        let host = FrameHost::new(
            config,
            FakeVideo::new(pauses.clone()),
            effect,
            FakeNotifier { calls: notifications.clone(), outcome },
        )
        .unwrap();
        Harness { host, seen, inits, pauses, notifications, _dir: dir, out_dir }
    }

    fn harness() -> Harness {
        harness_with(Recorder::default(), NotifyOutcome::Delivered(200))
    }

    #[test]
    fn initializes_effect_once_and_keeps_its_state() {
        let mut h = harness();
        assert_eq!(h.inits.get(), 1);
        assert_eq!(h.host.canvas().style(), &Style::blank_slate());
        for _ in 0..3 {
            assert_eq!(h.host.tick(), TickOutcome::Rendered);
        }
        let seen = h.seen.borrow();
        let states: Vec<u32> = seen.iter().map(|s| s.tick_state).collect();
        let frames: Vec<u64> = seen.iter().map(|s| s.frame_count).collect();
        assert_eq!(states, vec![1, 2, 3]);
        assert_eq!(frames, vec![0, 1, 2]);
        assert_eq!(h.inits.get(), 1);
        assert_eq!(seen[0].video_px, 0x00_40_80_C0);
    }

    #[test]
    fn pointer_at_center_gives_half_controls() {
        let mut h = harness();
        h.host.set_pointer(W as f32 / 2.0, H as f32 / 2.0);
        h.host.tick();
        let last = *h.seen.borrow().last().unwrap();
        assert_eq!((last.a, last.b), (0.5, 0.5));
        assert_eq!(h.host.controls(), Controls { a: 0.5, b: 0.5 });
    }

    #[test]
    fn pointer_outside_canvas_is_clamped_every_tick() {
        let mut h = harness();
        h.host.set_pointer(-120.0, 10_000.0);
        h.host.tick();
        h.host.set_pointer(W as f32, H as f32);
        h.host.tick();
        let seen = h.seen.borrow();
        assert_eq!((seen[0].a, seen[0].b), (0.0, 1.0));
        assert_eq!((seen[1].a, seen[1].b), (1.0, 1.0));
    }

    #[test]
    fn overlay_is_drawn_after_the_effect() {
        let mut h = harness();
        h.host.tick();
        assert_eq!(h.host.canvas().get(0, 0), Some(Rgba::WHITE));

        h.host.dispatch(Trigger::Button(Button::Help));
        h.host.tick();
        // The effect painted white; the dim panel went on top of it.
        assert_eq!(h.host.canvas().get(0, 0), Some(Rgba::gray(55)));
        assert_eq!(h.host.canvas().get(W - 1, H - 1), Some(Rgba::gray(55)));
        assert_eq!(h.host.canvas().style_depth(), 0);
    }

    #[test]
    fn help_key_toggles_on_next_tick_in_either_case() {
        let mut h = harness();
        assert!(!h.host.overlay.help_visible);

        assert_eq!(h.host.dispatch(Trigger::Key('H')), Some(Action::ToggleHelp));
        h.host.tick();
        assert!(h.host.overlay.help_visible);
        assert_eq!(h.host.canvas().get(0, 0), Some(Rgba::gray(55)));

        h.host.dispatch(Trigger::Key('h'));
        h.host.tick();
        assert!(!h.host.overlay.help_visible);
        assert_eq!(h.host.canvas().get(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn exit_stops_ticks_and_fires_once() {
        let mut h = harness();
        h.host.tick();
        let before = h.host.canvas().frame().clone();

        assert_eq!(h.host.dispatch(Trigger::Key('E')), Some(Action::Exit));
        assert_eq!(h.host.run_state(), RunState::ShuttingDown);
        h.host.dispatch(Trigger::Key('e'));
        h.host.dispatch(Trigger::Button(Button::Exit));

        assert_eq!(h.pauses.get(), 1);
        assert_eq!(h.notifications.get(), 1);
        assert_eq!(h.host.tick(), TickOutcome::Stopped);
        assert_eq!(h.host.tick(), TickOutcome::Stopped);
        assert_eq!(h.seen.borrow().len(), 1);
        assert_eq!(h.host.frame_count(), 1);
        assert_eq!(h.host.canvas().frame(), &before);

        let task = h.host.take_shutdown_task().unwrap();
        assert_eq!(task.wait(), NotifyOutcome::Delivered(200));
        assert!(h.host.take_shutdown_task().is_none());
    }

    #[test]
    fn exit_is_final_even_when_notification_fails() {
        let mut h = harness_with(
            Recorder::default(),
            NotifyOutcome::Failed("connection refused".into()),
        );
        h.host.dispatch(Trigger::Button(Button::Exit));
        assert_eq!(h.host.tick(), TickOutcome::Stopped);
        let task = h.host.take_shutdown_task().unwrap();
        assert!(matches!(task.wait(), NotifyOutcome::Failed(_)));
        assert_eq!(h.host.run_state(), RunState::ShuttingDown);
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn shortcuts_work_while_overlay_is_shown() {
        let mut h = harness();
        h.host.dispatch(Trigger::Key('h'));
        h.host.tick();
        assert_eq!(h.host.dispatch(Trigger::Key('S')), Some(Action::Save));
        assert!(h.out_dir.join("pixelsynth_output.png").exists());
        h.host.dispatch(Trigger::Key('E'));
        assert_eq!(h.host.run_state(), RunState::ShuttingDown);
    }

    #[test]
    fn save_writes_one_png_and_changes_no_state() {
        let mut h = harness();
        h.host.dispatch(Trigger::Key('h'));
        h.host.tick();

        h.host.dispatch(Trigger::Button(Button::Save));

        let files: Vec<_> = std::fs::read_dir(&h.out_dir).unwrap().collect();
        assert_eq!(files.len(), 1);
        let path = h.out_dir.join("pixelsynth_output.png");
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (W as u32, H as u32));
        assert_eq!(img.get_pixel(0, 0).0, [55, 55, 55]);

        assert!(h.host.overlay.help_visible);
        assert_eq!(h.host.run_state(), RunState::Running);
        assert_eq!(h.host.tick(), TickOutcome::Rendered);
    }

    #[test]
    fn button_and_key_save_to_the_same_file() {
        let mut h = harness();
        h.host.tick();
        let by_button = {
            h.host.dispatch(Trigger::Button(Button::Save));
            h.host.save().unwrap()
        };
        h.host.dispatch(Trigger::Key('s'));
        assert_eq!(by_button, h.out_dir.join("pixelsynth_output.png"));
        assert_eq!(std::fs::read_dir(&h.out_dir).unwrap().count(), 1);
    }

    #[test]
    fn unbound_trigger_does_nothing() {
        let mut h = harness();
        assert_eq!(h.host.dispatch(Trigger::Key('x')), None);
        assert!(!h.host.overlay.help_visible);
        assert_eq!(h.host.run_state(), RunState::Running);
    }

    #[test]
    fn panicking_effect_skips_one_frame_only() {
        let effect = Recorder { panic_on_first: true, ..Default::default() };
        let mut h = harness_with(effect, NotifyOutcome::Delivered(200));
        h.host.dispatch(Trigger::Key('h'));

        assert_eq!(h.host.tick(), TickOutcome::EffectFailed);
        // Overlay still drawn, style stack reset.
        assert_eq!(h.host.canvas().style_depth(), 0);
        assert_eq!(h.host.canvas().style(), &Style::blank_slate());

        assert_eq!(h.host.tick(), TickOutcome::Rendered);
        assert_eq!(h.seen.borrow().len(), 1);
    }

    #[test]
    fn failed_frame_grab_keeps_ticking() {
        let mut h = harness();
        h.host.video.fail_refresh = true;
        assert_eq!(h.host.tick(), TickOutcome::Rendered);
        assert_eq!(h.seen.borrow()[0].video_px, 0x00_40_80_C0);
    }

    #[test]
    fn rejects_capture_of_wrong_size() {
        let config = HostConfig { width: W + 1, height: H, ..Default::default() };
        let result = FrameHost::new(
            config,
            FakeVideo::new(Rc::new(Cell::new(0))),
            Recorder::default(),
            FakeNotifier { calls: Rc::new(Cell::new(0)), outcome: NotifyOutcome::Delivered(200) },
        );
        assert!(matches!(result, Err(Error::CameraInit(_))));
    }
}
