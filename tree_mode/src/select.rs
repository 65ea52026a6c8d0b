//! Focus selection strategies.
//!
//! When a pinch lands in CLOUD mode the interpreter asks a
//! [`FocusSelector`] which candidate to bring forward.  The shipped
//! strategies ignore the cursor; a nearest-to-cursor strategy needs
//! projected on-screen positions, which only the renderer owns, and
//! would slot in behind the same trait.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::item::FocusableItem;
use crate::sample::Cursor;

/// Picks one item out of a candidate set.
pub trait FocusSelector {
    /// Returns `None` only when the strategy declines; for an empty slice
    /// it must return `None`.
    fn select<'a>(
        &mut self,
        candidates: &'a [FocusableItem],
        cursor: Cursor,
    ) -> Option<&'a FocusableItem>;
}

impl<S: FocusSelector + ?Sized> FocusSelector for &mut S {
    fn select<'a>(&mut self, candidates: &'a [FocusableItem], cursor: Cursor) -> Option<&'a FocusableItem> {
        (**self).select(candidates, cursor)
    }
}

impl<S: FocusSelector + ?Sized> FocusSelector for Box<S> {
    fn select<'a>(&mut self, candidates: &'a [FocusableItem], cursor: Cursor) -> Option<&'a FocusableItem> {
        (**self).select(candidates, cursor)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RandomSelector
// ════════════════════════════════════════════════════════════════════════════

/// Uniform random draw over the candidates.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn from_entropy() -> Self {
        RandomSelector { rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence of draws.
    pub fn seeded(seed: u64) -> Self {
        RandomSelector { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomSelector {
    fn default() -> Self { RandomSelector::from_entropy() }
}

impl FocusSelector for RandomSelector {
    fn select<'a>(&mut self, candidates: &'a [FocusableItem], _cursor: Cursor) -> Option<&'a FocusableItem> {
        if candidates.is_empty() {
            return None;
        }
        candidates.get(self.rng.gen_range(0..candidates.len()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CycleSelector
// ════════════════════════════════════════════════════════════════════════════

/// Round robin: each selection takes the next candidate, wrapping.
///
/// The position is kept modulo the current length, so a collection that
/// grew since the last pick simply continues from where it left off.
#[derive(Debug, Clone, Default)]
pub struct CycleSelector {
    next: usize,
}

impl CycleSelector {
    pub fn new() -> Self { CycleSelector::default() }
}

impl FocusSelector for CycleSelector {
    fn select<'a>(&mut self, candidates: &'a [FocusableItem], _cursor: Cursor) -> Option<&'a FocusableItem> {
        if candidates.is_empty() {
            return None;
        }
        let idx = self.next % candidates.len();
        self.next = idx + 1;
        candidates.get(idx)
    }
}
