//! Application mode and the `(mode, focus)` pair handed to the renderer.

use std::fmt;

use crate::item::ItemId;

/// What the scene is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppMode {
    /// Ornaments assembled into the tree.
    #[default]
    Tree,
    /// Ornaments dispersed into a cloud.
    Cloud,
    /// One photo foregrounded.
    Focus,
}

impl AppMode {
    pub fn name(self) -> &'static str {
        match self {
            AppMode::Tree  => "TREE",
            AppMode::Cloud => "CLOUD",
            AppMode::Focus => "FOCUS",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current mode plus the focused item.
///
/// The fields are private: `Focus` always carries an id and the other two
/// modes never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ModeState {
    mode:  AppMode,
    focus: Option<ItemId>,
}

impl ModeState {
    pub fn tree() -> Self {
        ModeState { mode: AppMode::Tree, focus: None }
    }

    pub fn cloud() -> Self {
        ModeState { mode: AppMode::Cloud, focus: None }
    }

    pub fn focus(id: ItemId) -> Self {
        ModeState { mode: AppMode::Focus, focus: Some(id) }
    }

    pub fn mode(&self) -> AppMode { self.mode }

    pub fn focused(&self) -> Option<&ItemId> { self.focus.as_ref() }

    pub fn is(&self, mode: AppMode) -> bool { self.mode == mode }
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.focus {
            Some(id) => write!(f, "{} [{}]", self.mode, id),
            None     => write!(f, "{}", self.mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_tree_without_focus() {
        let s = ModeState::default();
        assert_eq!(s, ModeState::tree());
        assert!(s.focused().is_none());
    }

    #[test]
    fn focus_carries_id() {
        let s = ModeState::focus(ItemId::from("abc"));
        assert!(s.is(AppMode::Focus));
        assert_eq!(s.focused().map(ItemId::as_str), Some("abc"));
        assert_eq!(s.to_string(), "FOCUS [abc]");
    }

    #[test]
    fn display_names() {
        assert_eq!(ModeState::cloud().to_string(), "CLOUD");
        assert_eq!(AppMode::Tree.to_string(), "TREE");
    }
}
