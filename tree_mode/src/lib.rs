//! # tree_mode
//!
//! Turns a stream of classified hand samples into the holiday tree's
//! display mode and focused photo.
//!
//! ## Gesture → Mode mapping
//!
//! | Sample | From | To |
//! |---|---|---|
//! | `ClosedFist` | any | TREE, focus cleared |
//! | `OpenPalm` | TREE / FOCUS | CLOUD, focus cleared |
//! | `OpenPalm` | CLOUD | unchanged |
//! | pinching, photos present | CLOUD | FOCUS on a selected photo |
//! | anything else | any | unchanged |
//!
//! Rows are checked top to bottom.  A pinch that is held after entering
//! FOCUS no longer matches, which is what keeps the selection stable while
//! the fingers stay together.
//!
//! ## Example
//!
//! ```
//! use tree_mode::{AppMode, CycleSelector, FocusableItem, Gesture, HandSample, Interpreter};
//!
//! let photos = vec![FocusableItem::new("a1b2c3d4e", "snow.jpg")];
//! let mut session = Interpreter::new(CycleSelector::new());
//!
//! session.feed(HandSample::gesture(Gesture::OpenPalm), &photos);
//! session.feed(HandSample::pinch(), &photos);
//! assert_eq!(session.mode(), AppMode::Focus);
//!
//! session.feed(HandSample::gesture(Gesture::ClosedFist), &photos);
//! assert_eq!(session.mode(), AppMode::Tree);
//! ```

pub mod sample;
pub mod mode;
pub mod item;
pub mod select;
pub mod interpreter;

pub use sample::{Cursor, Gesture, HandSample, SampleError};
pub use mode::{AppMode, ModeState};
pub use item::{FocusableItem, ItemId, ItemRegistry, ItemSnapshot, RegistryError};
pub use select::{CycleSelector, FocusSelector, RandomSelector};
pub use interpreter::{transition, Interpreter, Outcome};
