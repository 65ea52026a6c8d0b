//! The mode interpreter: one classified sample in, one `(mode, focus)` out.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. `ClosedFist` → TREE, focus cleared, from any mode.
//! 2. `OpenPalm` → CLOUD, focus cleared, unless already in CLOUD.  FOCUS is
//!    not CLOUD, so an open palm always drops an active focus.
//! 3. Pinching while in CLOUD with at least one candidate → FOCUS on the
//!    item the selector picks.  The mode guard is the only debounce: a
//!    pinch held into FOCUS no longer matches, so nothing is reselected.
//! 4. Anything else leaves the state untouched.

use tracing::{debug, trace};

use crate::item::{FocusableItem, ItemId};
use crate::mode::{AppMode, ModeState};
use crate::sample::{Gesture, HandSample};
use crate::select::{FocusSelector, RandomSelector};

// ════════════════════════════════════════════════════════════════════════════
// transition — the pure rule table
// ════════════════════════════════════════════════════════════════════════════

/// Compute the state that follows `previous` after `sample`.
///
/// Total over well-formed samples; never panics and performs no I/O.
pub fn transition<S>(
    sample: &HandSample,
    previous: &ModeState,
    items: &[FocusableItem],
    selector: &mut S,
) -> ModeState
where
    S: FocusSelector + ?Sized,
{
    match sample.gesture {
        Gesture::ClosedFist => return ModeState::tree(),
        Gesture::OpenPalm => {
            return if previous.is(AppMode::Cloud) {
                previous.clone()
            } else {
                ModeState::cloud()
            };
        }
        _ => {}
    }

    let pinch_to_focus = sample.is_pinching
        && previous.is(AppMode::Cloud)
        && !items.is_empty()
        && !previous.is(AppMode::Focus);

    if pinch_to_focus {
        if let Some(item) = selector.select(items, sample.cursor()) {
            return ModeState::focus(item.id.clone());
        }
    } else if sample.is_pinching && previous.is(AppMode::Cloud) {
        trace!("pinch in CLOUD with no photos; staying in CLOUD");
    }

    previous.clone()
}

// ════════════════════════════════════════════════════════════════════════════
// Outcome
// ════════════════════════════════════════════════════════════════════════════

/// Result of feeding one sample to an [`Interpreter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed { from: ModeState, to: ModeState },
}

impl Outcome {
    pub fn is_changed(&self) -> bool { matches!(self, Outcome::Changed { .. }) }
}

// ════════════════════════════════════════════════════════════════════════════
// Interpreter — session state around `transition`
// ════════════════════════════════════════════════════════════════════════════

/// One session's interpreter: current state, last sample and the focus
/// selection strategy.
#[derive(Debug)]
pub struct Interpreter<S = RandomSelector> {
    state:       ModeState,
    last_sample: HandSample,
    selector:    S,
}

impl<S: FocusSelector> Interpreter<S> {
    /// Start in TREE with no focus.
    pub fn new(selector: S) -> Self {
        Interpreter {
            state:       ModeState::tree(),
            last_sample: HandSample::idle(),
            selector,
        }
    }

    /// Apply one sample against the current candidate set.
    pub fn feed(&mut self, sample: HandSample, items: &[FocusableItem]) -> Outcome {
        self.last_sample = sample;
        let next = transition(&sample, &self.state, items, &mut self.selector);
        if next == self.state {
            return Outcome::Unchanged;
        }

        debug!(
            from = %self.state,
            to = %next,
            gesture = %sample.gesture,
            pinching = sample.is_pinching,
            "mode transition"
        );
        let from = std::mem::replace(&mut self.state, next);
        Outcome::Changed { from, to: self.state.clone() }
    }

    /// Back to TREE with an idle sample; the selector is kept.
    pub fn reset(&mut self) {
        self.state = ModeState::tree();
        self.last_sample = HandSample::idle();
    }

    pub fn state(&self) -> &ModeState { &self.state }

    pub fn mode(&self) -> AppMode { self.state.mode() }

    pub fn focus(&self) -> Option<&ItemId> { self.state.focused() }

    pub fn last_sample(&self) -> &HandSample { &self.last_sample }

    pub fn selector_mut(&mut self) -> &mut S { &mut self.selector }
}

impl Default for Interpreter<RandomSelector> {
    fn default() -> Self { Interpreter::new(RandomSelector::from_entropy()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::CycleSelector;
    use crate::sample::Cursor;
    use proptest::prelude::*;

    fn photos(ids: &[&str]) -> Vec<FocusableItem> {
        ids.iter().map(|id| FocusableItem::new(*id, format!("{id}.jpg"))).collect()
    }

    fn fist()  -> HandSample { HandSample::gesture(Gesture::ClosedFist) }
    fn palm()  -> HandSample { HandSample::gesture(Gesture::OpenPalm) }
    fn pinch() -> HandSample { HandSample::pinch() }

    fn focused_on(id: &str) -> ModeState { ModeState::focus(ItemId::from(id)) }

    /// Declines every selection.
    struct Never;
    impl FocusSelector for Never {
        fn select<'a>(&mut self, _: &'a [FocusableItem], _: Cursor) -> Option<&'a FocusableItem> {
            None
        }
    }

    // ── rule 1 ───────────────────────────────────────────────────────────

    #[test]
    fn fist_returns_to_tree_from_any_mode() {
        let items = photos(&["a"]);
        let mut sel = CycleSelector::new();
        for prev in [ModeState::tree(), ModeState::cloud(), focused_on("a")] {
            assert_eq!(transition(&fist(), &prev, &items, &mut sel), ModeState::tree());
        }
    }

    #[test]
    fn fist_beats_pinch() {
        let mut sample = fist();
        sample.is_pinching = true;
        let next = transition(&sample, &ModeState::cloud(), &photos(&["a"]), &mut CycleSelector::new());
        assert_eq!(next, ModeState::tree());
    }

    #[test]
    fn repeated_fist_is_idempotent() {
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &[]);
        assert!(it.feed(fist(), &[]).is_changed());
        for _ in 0..5 {
            assert_eq!(it.feed(fist(), &[]), Outcome::Unchanged);
            assert_eq!(it.state(), &ModeState::tree());
        }
    }

    // ── rule 2 ───────────────────────────────────────────────────────────

    #[test]
    fn palm_from_tree_enters_cloud() {
        let next = transition(&palm(), &ModeState::tree(), &[], &mut CycleSelector::new());
        assert_eq!(next, ModeState::cloud());
    }

    #[test]
    fn palm_in_cloud_is_noop() {
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &[]);
        assert_eq!(it.feed(palm(), &[]), Outcome::Unchanged);
        assert_eq!(it.state(), &ModeState::cloud());
    }

    #[test]
    fn palm_leaves_focus_and_clears_it() {
        let next = transition(&palm(), &focused_on("a"), &photos(&["a"]), &mut CycleSelector::new());
        assert_eq!(next, ModeState::cloud());
        assert!(next.focused().is_none());
    }

    #[test]
    fn palm_beats_pinch() {
        let mut sample = palm();
        sample.is_pinching = true;
        let next = transition(&sample, &ModeState::cloud(), &photos(&["a"]), &mut CycleSelector::new());
        assert_eq!(next, ModeState::cloud());
    }

    // ── rule 3 ───────────────────────────────────────────────────────────

    #[test]
    fn pinch_in_cloud_focuses_selected_item() {
        let items = photos(&["a", "b", "c"]);
        let next = transition(&pinch(), &ModeState::cloud(), &items, &mut CycleSelector::new());
        assert_eq!(next, focused_on("a"));
    }

    #[test]
    fn pinch_without_items_stays_in_cloud() {
        let mut it = Interpreter::new(RandomSelector::seeded(5));
        it.feed(palm(), &[]);
        for _ in 0..10 {
            assert_eq!(it.feed(pinch(), &[]), Outcome::Unchanged);
            assert_eq!(it.state(), &ModeState::cloud());
        }
    }

    #[test]
    fn pinch_in_tree_does_nothing() {
        let mut it = Interpreter::new(CycleSelector::new());
        assert_eq!(it.feed(pinch(), &photos(&["a"])), Outcome::Unchanged);
        assert_eq!(it.feed(pinch(), &[]), Outcome::Unchanged);
        assert_eq!(it.state(), &ModeState::tree());
    }

    #[test]
    fn held_pinch_does_not_reselect() {
        let items = photos(&["a", "b", "c"]);
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &items);
        it.feed(pinch(), &items);
        let first = it.focus().cloned();
        assert_eq!(first, Some(ItemId::from("a")));
        for _ in 0..10 {
            assert_eq!(it.feed(pinch(), &items), Outcome::Unchanged);
            assert_eq!(it.focus().cloned(), first);
        }
    }

    #[test]
    fn declining_selector_keeps_cloud() {
        let next = transition(&pinch(), &ModeState::cloud(), &photos(&["a"]), &mut Never);
        assert_eq!(next, ModeState::cloud());
    }

    #[test]
    fn releasing_pinch_keeps_focus() {
        let items = photos(&["a"]);
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &items);
        it.feed(pinch(), &items);
        assert_eq!(it.feed(HandSample::idle(), &items), Outcome::Unchanged);
        assert_eq!(it.state(), &focused_on("a"));
    }

    // ── rule 4 ───────────────────────────────────────────────────────────

    #[test]
    fn other_gestures_pass_through() {
        let items = photos(&["a"]);
        let others = [
            Gesture::None,
            Gesture::PointingUp,
            Gesture::ThumbUp,
            Gesture::ThumbDown,
            Gesture::Victory,
            Gesture::ILoveYou,
        ];
        for prev in [ModeState::tree(), ModeState::cloud(), focused_on("a")] {
            for g in others {
                let next = transition(&HandSample::gesture(g), &prev, &items, &mut CycleSelector::new());
                assert_eq!(next, prev);
            }
        }
    }

    // ── scenarios ────────────────────────────────────────────────────────

    #[test]
    fn palm_then_pinch_focuses_one_of_the_photos() {
        let items = photos(&["A", "B", "C"]);
        let mut it = Interpreter::<RandomSelector>::default();
        it.feed(palm(), &items);
        let outcome = it.feed(pinch(), &items);
        assert!(matches!(
            outcome,
            Outcome::Changed { ref from, .. } if *from == ModeState::cloud()
        ));
        assert_eq!(it.mode(), AppMode::Focus);
        let id = it.focus().unwrap();
        assert!(items.iter().any(|i| &i.id == id));
    }

    #[test]
    fn palm_then_fist_ends_in_tree() {
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &[]);
        it.feed(fist(), &[]);
        assert_eq!(it.state(), &ModeState::tree());
    }

    #[test]
    fn pinch_held_while_first_photo_arrives_focuses_it() {
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &[]);
        it.feed(pinch(), &[]);
        assert_eq!(it.mode(), AppMode::Cloud);
        it.feed(pinch(), &photos(&["late"]));
        assert_eq!(it.state(), &focused_on("late"));
    }

    #[test]
    fn feed_records_last_sample_even_without_change() {
        let mut it = Interpreter::new(CycleSelector::new());
        let mut s = HandSample::gesture(Gesture::Victory);
        s.cursor_x = 0.25;
        assert_eq!(it.feed(s, &[]), Outcome::Unchanged);
        assert_eq!(it.last_sample(), &s);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let items = photos(&["a"]);
        let mut it = Interpreter::new(CycleSelector::new());
        it.feed(palm(), &items);
        it.feed(pinch(), &items);
        it.reset();
        assert_eq!(it.state(), &ModeState::tree());
        assert_eq!(it.last_sample(), &HandSample::idle());
    }

    // ── properties ───────────────────────────────────────────────────────

    fn arb_sample() -> impl Strategy<Value = HandSample> {
        (0..Gesture::ALL.len(), any::<bool>(), 0.0f32..=1.0, 0.0f32..=1.0).prop_map(
            |(g, is_pinching, x, y)| HandSample {
                gesture: Gesture::ALL[g],
                cursor_x: x,
                cursor_y: y,
                is_pinching,
                rotation: 0.0,
            },
        )
    }

    /// Each step sees a prefix of the photo list, so the collection grows
    /// over the session the way uploads do.
    fn arb_session() -> impl Strategy<Value = Vec<(HandSample, usize)>> {
        prop::collection::vec((arb_sample(), 0usize..=4), 0..60)
    }

    proptest! {
        #[test]
        fn focus_iff_valid_target(session in arb_session(), seed in any::<u64>()) {
            let all = photos(&["p0", "p1", "p2", "p3"]);
            let mut it = Interpreter::new(RandomSelector::seeded(seed));
            let mut visible = 0usize;
            for (sample, grow) in session {
                visible = (visible + grow).min(all.len());
                let items = &all[..visible];
                let outcome = it.feed(sample, items);

                prop_assert_eq!(it.mode() == AppMode::Focus, it.focus().is_some());
                if let Outcome::Changed { to, .. } = &outcome {
                    if let Some(id) = to.focused() {
                        prop_assert!(items.iter().any(|i| &i.id == id));
                    }
                }
            }
        }

        #[test]
        fn fist_always_yields_tree(session in arb_session()) {
            let all = photos(&["a", "b"]);
            let mut it = Interpreter::new(CycleSelector::new());
            for (sample, n) in session {
                it.feed(sample, &all[..n.min(all.len())]);
            }
            it.feed(fist(), &all);
            prop_assert_eq!(it.state(), &ModeState::tree());
        }

        #[test]
        fn identical_samples_settle_after_one_step(sample in arb_sample(), prev in 0usize..3) {
            let items = photos(&["a", "b", "c"]);
            let start = [ModeState::tree(), ModeState::cloud(), focused_on("b")][prev].clone();
            let mut sel = RandomSelector::seeded(11);
            let once = transition(&sample, &start, &items, &mut sel);
            let twice = transition(&sample, &once, &items, &mut sel);
            prop_assert_eq!(once, twice);
        }
    }
}
