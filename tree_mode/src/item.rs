//! Focusable items and the append-only registry they live in.
//!
//! The registry is written by an uploader thread and read by the frame
//! loop.  Every append publishes a fresh immutable snapshot, so a reader
//! holding an [`ItemSnapshot`] never sees a half-grown collection.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rand::Rng;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// ItemId
// ════════════════════════════════════════════════════════════════════════════

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Opaque item identifier.  Cloning is a reference-count bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Arc<str>);

impl ItemId {
    /// Nine random base-36 characters.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let token: String = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        ItemId(token.into())
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self { ItemId(s.into()) }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self { ItemId(s.into()) }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FocusableItem
// ════════════════════════════════════════════════════════════════════════════

/// Something the user can pinch to bring into focus (an uploaded photo).
///
/// Layout belongs to the renderer; the interpreter only needs the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusableItem {
    pub id:    ItemId,
    pub label: String,
}

impl FocusableItem {
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        FocusableItem { id: id.into(), label: label.into() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ItemRegistry
// ════════════════════════════════════════════════════════════════════════════

/// Immutable view of the registry at one point in time.
pub type ItemSnapshot = Arc<[FocusableItem]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("item id {0} is already registered")]
    DuplicateId(ItemId),
}

/// Shared, append-only, ordered collection of focusable items.
///
/// Clones share the same underlying collection.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    current: Arc<RwLock<ItemSnapshot>>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        ItemRegistry { current: Arc::new(RwLock::new(empty_snapshot())) }
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> ItemSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize { self.snapshot().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.snapshot().iter().any(|item| &item.id == id)
    }

    /// Append a batch and publish it as a single snapshot.
    ///
    /// Either the whole batch becomes visible or none of it does.  Returns
    /// the collection length after the append.
    pub fn append<I>(&self, batch: I) -> Result<usize, RegistryError>
    where
        I: IntoIterator<Item = FocusableItem>,
    {
        let batch: Vec<FocusableItem> = batch.into_iter().collect();
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if batch.is_empty() {
            return Ok(current.len());
        }

        {
            let mut seen: HashSet<&ItemId> = current.iter().map(|item| &item.id).collect();
            for item in &batch {
                if !seen.insert(&item.id) {
                    return Err(RegistryError::DuplicateId(item.id.clone()));
                }
            }
        }

        let next: Vec<FocusableItem> = current.iter().cloned().chain(batch).collect();
        *current = next.into();
        Ok(current.len())
    }
}

impl Default for ItemRegistry {
    fn default() -> Self { ItemRegistry::new() }
}

fn empty_snapshot() -> ItemSnapshot {
    Vec::new().into()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
