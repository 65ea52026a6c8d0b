//! Hand classification — both from LeapMotion hardware and keyboard/mouse
//! simulation.
//!
//! The public interface is [`InputEvent`] delivered over a `mpsc` channel,
//! one [`HandSample`] per capture frame.  Consumers don't need to know
//! whether samples came from real hardware or the simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::warn;
use tree_mode::{Gesture, HandSample};

// ════════════════════════════════════════════════════════════════════════════
// InputEvent
// ════════════════════════════════════════════════════════════════════════════

/// What a gesture source emits.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// One classified frame.
    Hand(HandSample),

    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`InputEvent`]s over a channel.
pub trait GestureSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<InputEvent>);
}

/// Spawn a gesture source on its own thread and return the receiving end.
pub fn spawn_gesture_source<G: GestureSource>(source: G) -> Receiver<InputEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapGestureSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

// Thresholds (empirically tuned)
const FIST_GRAB: f32 = 0.9;
const PALM_GRAB: f32 = 0.1;
const PINCH:     f32 = 0.8;
// Interaction box, mm above the device
const BOX_X: (f32, f32) = (-200.0, 200.0);
const BOX_Y: (f32, f32) = (100.0, 400.0);

/// Raw readings for one tracked hand, millimetres and unit vectors as
/// LeapC reports them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandReading {
    pub grab:   f32,
    pub pinch:  f32,
    pub palm:   (f32, f32),
    pub normal: (f32, f32),
}

/// Classify the first tracked hand of a frame.
///
/// * **No hand**: the idle sample.
/// * **Closed fist**: grab strength ≥ 0.9.
/// * **Open palm**: grab strength ≤ 0.1.
/// * **Pinch**: pinch strength ≥ 0.8, independent of the pose.
/// * **Cursor**: palm x/y mapped from a fixed interaction box onto [0, 1]
///   and clamped, y growing downward like screen coordinates.
/// * **Rotation**: palm roll from the palm normal's x/y.
pub fn classify_hand(hand: Option<HandReading>) -> HandSample {
    let Some(hand) = hand else { return HandSample::idle() };
    let gesture = if hand.grab >= FIST_GRAB {
        Gesture::ClosedFist
    } else if hand.grab <= PALM_GRAB {
        Gesture::OpenPalm
    } else {
        Gesture::None
    };
    let rotation = hand.normal.0.atan2(-hand.normal.1);
    HandSample {
        gesture,
        cursor_x:    normalise(hand.palm.0, BOX_X),
        cursor_y:    1.0 - normalise(hand.palm.1, BOX_Y),
        is_pinching: hand.pinch >= PINCH,
        rotation:    if rotation.is_finite() { rotation } else { 0.0 },
    }
}

fn normalise(v: f32, (lo, hi): (f32, f32)) -> f32 {
    if !v.is_finite() { return 0.5; }
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Gesture source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Only the first tracked hand is used, classified by [`classify_hand`];
/// a frame without hands yields the idle sample.
#[cfg(feature = "leap")]
pub struct LeapGestureSource;

#[cfg(feature = "leap")]
impl GestureSource for LeapGestureSource {
    fn run(self: Box<Self>, tx: Sender<InputEvent>) {
        use leaprs::{Connection, ConnectionConfig, EventRef};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                warn!(error = ?e, "failed to create LeapC connection");
                return;
            }
        };
        if let Err(e) = connection.open() {
            warn!(error = ?e, "failed to open LeapMotion device");
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let EventRef::Tracking(frame) = msg.event() {
                let hands = frame.hands();
                let sample = classify_hand(hands.first().map(|hand| {
                    let palm   = hand.palm();
                    let pos    = palm.position();
                    let normal = palm.normal();
                    HandReading {
                        grab:   hand.grab_strength,
                        pinch:  hand.pinch_strength,
                        palm:   (pos.x, pos.y),
                        normal: (normal.x, normal.y),
                    }
                }));
                if tx.send(InputEvent::Hand(sample)).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimGestureSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Simulated pose keys (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    Fist,       // F
    Palm,       // O
    PointUp,    // I
    ThumbUp,    // Up
    ThumbDown,  // Down
    Victory,    // V
    LoveYou,    // L
}

impl SimKey {
    /// When several pose keys are held, the first one in this list wins.
    pub const PRECEDENCE: [SimKey; 7] = [
        SimKey::Fist,
        SimKey::Palm,
        SimKey::PointUp,
        SimKey::ThumbUp,
        SimKey::ThumbDown,
        SimKey::Victory,
        SimKey::LoveYou,
    ];

    pub fn gesture(self) -> Gesture {
        match self {
            SimKey::Fist      => Gesture::ClosedFist,
            SimKey::Palm      => Gesture::OpenPalm,
            SimKey::PointUp   => Gesture::PointingUp,
            SimKey::ThumbUp   => Gesture::ThumbUp,
            SimKey::ThumbDown => Gesture::ThumbDown,
            SimKey::Victory   => Gesture::Victory,
            SimKey::LoveYou   => Gesture::ILoveYou,
        }
    }
}

/// Window input state for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimFrame {
    /// Pose keys currently held.
    pub held:   Vec<SimKey>,
    /// Pinch key or left mouse button down.
    pub pinch:  bool,
    /// Mouse position normalised to the scene area, if the mouse is over it.
    pub cursor: Option<(f32, f32)>,
    /// Roll change this frame, radians.
    pub roll:   f32,
}

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    Frame(SimFrame),
    Quit,
}

/// Gesture source driven by [`SimInput`] events (from the visualizer's
/// window).
///
/// The visualizer sends one `SimInput::Frame` per rendered frame; this
/// source classifies it into a `HandSample`, remembering the last cursor
/// position and the accumulated roll.
pub struct SimGestureSource {
    rx:       Receiver<SimInput>,
    cursor:   (f32, f32),
    rotation: f32,
}

impl SimGestureSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimGestureSource { rx, cursor: (0.5, 0.5), rotation: 0.0 }
    }

    /// Turn one window frame into a hand sample.
    pub fn classify(&mut self, frame: &SimFrame) -> Option<HandSample> {
        if let Some((x, y)) = frame.cursor {
            self.cursor = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        }
        self.rotation += frame.roll;

        let gesture = SimKey::PRECEDENCE
            .iter()
            .find(|k| frame.held.contains(k))
            .map(|k| k.gesture())
            .unwrap_or(Gesture::None);

        match HandSample::new(gesture, self.cursor.0, self.cursor.1, frame.pinch, self.rotation) {
            Ok(s)  => Some(s),
            Err(e) => {
                warn!(error = %e, "dropping simulated frame");
                None
            }
        }
    }
}

impl GestureSource for SimGestureSource {
    fn run(mut self: Box<Self>, tx: Sender<InputEvent>) {
        while let Ok(input) = self.rx.recv() {
            let event = match input {
                SimInput::Frame(frame) => match self.classify(&frame) {
                    Some(sample) => InputEvent::Hand(sample),
                    None         => continue,
                },
                SimInput::Quit => {
                    let _ = tx.send(InputEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
