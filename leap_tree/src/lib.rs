//! # leap_tree
//!
//! Hand-gesture controller for the holiday tree: ornaments gather into a
//! tree or scatter into a cloud, and a pinch brings an uploaded photo into
//! focus.  The mode logic lives in [`tree_mode`]; this crate supplies hand
//! input, photo uploads, the scene animation and a software-rendered window.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Mode before | Action |
//! |---|---|---|
//! | Closed fist | any | Ornaments gather into the tree, focus dropped |
//! | Open palm | TREE / FOCUS | Ornaments scatter into the cloud, focus dropped |
//! | Pinch | CLOUD, photos uploaded | A photo moves to the centre (FOCUS) |
//! | Anything else | any | Nothing changes |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard and mouse stand in for the hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation shortcuts
//!
//! | Key | Meaning |
//! |---|---|
//! | `F` / hold | Closed fist |
//! | `O` / hold | Open palm |
//! | `P` or left mouse / hold | Pinch |
//! | `I`, `Up`, `Down`, `V`, `L` | Pointing up, thumb up, thumb down, victory, I-love-you |
//! | mouse | Hand cursor |
//! | `,` / `.` | Roll the hand |
//! | `U` | Upload the next queued photo |
//! | `R` | Reset to the tree |
//! | `Q` | Quit |

pub mod gesture;
pub mod upload;
pub mod scene;
pub mod visualizer;
pub mod config;
pub mod error;
pub mod app;
