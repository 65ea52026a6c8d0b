//! Top-level application loop.
//!
//! `App` owns the mode [`Interpreter`], the shared photo registry, the
//! `SceneState` and the upload queue.  It feeds every hand sample to the
//! interpreter and drives the visualizer each frame.

use std::sync::mpsc::{self, Sender, TryRecvError};

use tracing::{debug, info, warn};
use tree_mode::{
    AppMode, FocusSelector, Gesture, HandSample, Interpreter, ItemRegistry, ModeState, Outcome,
};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::gesture::{spawn_gesture_source, InputEvent, SimInput};
use crate::scene::SceneState;
use crate::upload::{spawn_uploader, PhotoQueue, UploadRequest, Uploader};
use crate::visualizer::Visualizer;

/// Scatter seed when the configuration leaves it open.
const DEFAULT_SCENE_SEED: u64 = 0x7EE5;

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    interpreter: Interpreter<Box<dyn FocusSelector>>,
    registry:    ItemRegistry,
    scene:       SceneState,
    queue:       PhotoQueue,
    upload_tx:   Sender<UploadRequest>,
    pub status:  String,
}

impl App {
    pub fn new(
        cfg: &AppConfig,
        registry: ItemRegistry,
        queue: PhotoQueue,
        upload_tx: Sender<UploadRequest>,
    ) -> Self {
        let selector = cfg.selector.build(cfg.seed);
        let scene = SceneState::new(cfg.ornament_count, cfg.seed.unwrap_or(DEFAULT_SCENE_SEED));
        App {
            interpreter: Interpreter::new(selector),
            registry,
            scene,
            queue,
            upload_tx,
            status: "Ready — open your palm to scatter the tree".to_string(),
        }
    }

    // ── process one hand sample ───────────────────────────────────────────

    pub fn handle_sample(&mut self, sample: HandSample) -> Outcome {
        let items = self.registry.snapshot();
        let outcome = self.interpreter.feed(sample, &items);
        if let Outcome::Changed { to, .. } = &outcome {
            self.status = describe(to, sample.gesture, self.focus_label().as_deref());
        }
        outcome
    }

    /// Send the next queued photo to the uploader.
    pub fn request_upload(&mut self) {
        match self.queue.pop_next() {
            Some(path) => {
                debug!(path = %path.display(), "upload requested");
                self.status = format!("Uploading {}", path.display());
                if self.upload_tx.send(UploadRequest { paths: vec![path] }).is_err() {
                    warn!("uploader thread is gone");
                }
            }
            None => self.status = "No more photos queued".to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.interpreter.reset();
        self.status = "Reset — back to the tree".to_string();
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        let items = self.registry.snapshot();
        self.scene.tick(self.interpreter.state(), &items);
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn state(&self)  -> &ModeState   { self.interpreter.state() }
    pub fn mode(&self)   -> AppMode      { self.interpreter.mode() }
    pub fn sample(&self) -> &HandSample  { self.interpreter.last_sample() }
    pub fn scene(&self)  -> &SceneState  { &self.scene }
    pub fn pending(&self) -> usize       { self.queue.len() }

    /// Label of the focused photo, if any.
    pub fn focus_label(&self) -> Option<String> {
        let id = self.interpreter.focus()?;
        self.registry
            .snapshot()
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.label.clone())
    }
}

fn describe(state: &ModeState, gesture: Gesture, focus: Option<&str>) -> String {
    match state.mode() {
        AppMode::Tree  => format!("{} — ornaments gather into the tree", gesture.label()),
        AppMode::Cloud => format!("{} — ornaments scatter into the cloud", gesture.label()),
        AppMode::Focus => format!("PINCH — focusing {}", focus.unwrap_or("photo")),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the
/// visualizer, the gesture source (simulation by default, hardware with
/// `--features leap`), the uploader thread, and drives the event/render
/// loop.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let registry = ItemRegistry::new();
    let mut queue = PhotoQueue::from_paths(&cfg.photos)?;
    let mut uploader = match cfg.seed {
        Some(seed) => Uploader::seeded(registry.clone(), seed),
        None       => Uploader::new(registry.clone()),
    };
    if cfg.preload && !queue.is_empty() {
        uploader.upload(&queue.drain_all())?;
    }
    info!(photos = registry.len(), queued = queue.len(), "starting session");
    let upload_tx = spawn_uploader(uploader);

    // ── Gesture source ────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    #[cfg(not(feature = "leap"))]
    let gesture_rx = spawn_gesture_source(crate::gesture::SimGestureSource::new(sim_rx));
    #[cfg(feature = "leap")]
    let gesture_rx = {
        drop(sim_rx);
        spawn_gesture_source(crate::gesture::LeapGestureSource)
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx, cfg.frame_ms)?;

    let mut app = App::new(&cfg, registry, queue, upload_tx);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input; the simulator gets its frame from here
        let ui = match vis.poll_input() {
            Some(ui) => ui,
            None     => break,
        };
        if ui.upload { app.request_upload(); }
        if ui.reset  { app.reset(); }

        // 2. Drain hand samples in arrival order
        loop {
            match gesture_rx.try_recv() {
                Ok(InputEvent::Hand(sample))    => { app.handle_sample(sample); }
                Ok(InputEvent::Quit)            => return Ok(()),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        // 3. Per-frame animation
        app.tick();

        // 4. Render
        let focus = app.focus_label();
        vis.render(
            app.scene(),
            app.state(),
            app.sample(),
            focus.as_deref(),
            app.pending(),
            &app.status,
        );
    }

    info!("session ended");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorKind;
    use std::sync::mpsc::Receiver;
    use tree_mode::{FocusableItem, ItemId};

    fn make_app() -> (App, ItemRegistry, Receiver<UploadRequest>) {
        let cfg = AppConfig {
            ornament_count: 30,
            selector:       SelectorKind::Cycle,
            seed:           Some(1),
            ..AppConfig::default()
        };
        let registry = ItemRegistry::new();
        let (tx, rx) = mpsc::channel();
        let app = App::new(&cfg, registry.clone(), PhotoQueue::default(), tx);
        (app, registry, rx)
    }

    fn palm() -> HandSample { HandSample::gesture(Gesture::OpenPalm) }
    fn fist() -> HandSample { HandSample::gesture(Gesture::ClosedFist) }

    #[test]
    fn starts_in_tree() {
        let (app, _, _) = make_app();
        assert_eq!(app.mode(), AppMode::Tree);
        assert_eq!(app.sample(), &HandSample::idle());
    }

    #[test]
    fn palm_scatters_and_fist_gathers() {
        let (mut app, _, _) = make_app();
        assert!(app.handle_sample(palm()).is_changed());
        assert_eq!(app.mode(), AppMode::Cloud);
        assert!(app.status.contains("cloud"));
        app.handle_sample(fist());
        assert_eq!(app.mode(), AppMode::Tree);
    }

    #[test]
    fn pinch_focuses_uploaded_photo() {
        let (mut app, registry, _) = make_app();
        registry.append([FocusableItem::new("p1", "star.png")]).unwrap();
        app.handle_sample(palm());
        app.handle_sample(HandSample::pinch());
        assert_eq!(app.state(), &ModeState::focus(ItemId::from("p1")));
        assert_eq!(app.focus_label().as_deref(), Some("star.png"));
        assert!(app.status.contains("star.png"));
    }

    #[test]
    fn pinch_without_photos_keeps_cloud() {
        let (mut app, _, _) = make_app();
        app.handle_sample(palm());
        for _ in 0..5 {
            assert_eq!(app.handle_sample(HandSample::pinch()), Outcome::Unchanged);
        }
        assert_eq!(app.mode(), AppMode::Cloud);
    }

    #[test]
    fn photos_uploaded_mid_session_become_focusable() {
        let (mut app, registry, _) = make_app();
        app.handle_sample(palm());
        app.handle_sample(HandSample::pinch());
        assert_eq!(app.mode(), AppMode::Cloud);

        registry.append([FocusableItem::new("late", "late.jpg")]).unwrap();
        app.handle_sample(HandSample::pinch());
        assert_eq!(app.mode(), AppMode::Focus);
    }

    #[test]
    fn tick_syncs_scene_photos() {
        let (mut app, registry, _) = make_app();
        registry.append([FocusableItem::new("a", "a.png"), FocusableItem::new("b", "b.png")])
            .unwrap();
        app.tick();
        assert_eq!(app.scene().photos.len(), 2);
    }

    #[test]
    fn upload_request_sends_next_queued_photo() {
        let dir = tempfile::TempDir::new().unwrap();
        let photo = dir.path().join("gift.png");
        std::fs::write(&photo, b"x").unwrap();

        let cfg = AppConfig { ornament_count: 10, ..AppConfig::default() };
        let (tx, rx) = mpsc::channel();
        let queue = PhotoQueue::from_paths(&[photo.clone()]).unwrap();
        let mut app = App::new(&cfg, ItemRegistry::new(), queue, tx);

        app.request_upload();
        assert_eq!(rx.try_recv().unwrap(), UploadRequest { paths: vec![photo] });
        assert_eq!(app.pending(), 0);

        app.request_upload();
        assert!(rx.try_recv().is_err());
        assert!(app.status.contains("No more photos"));
    }

    #[test]
    fn reset_returns_to_tree() {
        let (mut app, registry, _) = make_app();
        registry.append([FocusableItem::new("a", "a.png")]).unwrap();
        app.handle_sample(palm());
        app.handle_sample(HandSample::pinch());
        app.reset();
        assert_eq!(app.state(), &ModeState::tree());
        assert!(app.focus_label().is_none());
    }

    #[test]
    fn unrelated_gesture_leaves_status() {
        let (mut app, _, _) = make_app();
        let before = app.status.clone();
        app.handle_sample(HandSample::gesture(Gesture::Victory));
        assert_eq!(app.status, before);
    }
}
