//! Scene layout and animation state.
//!
//! Ornaments and photos each have a home in the tree layout and in the
//! cloud layout.  Every frame they ease toward whichever layout the current
//! [`ModeState`] asks for; the focused photo instead moves to the centre
//! and grows.
//!
//! Coordinates are in scene units: x and y both roughly in [-1, 1], y up.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tree_mode::{AppMode, FocusableItem, ItemId, ModeState};

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

pub const GOLD:  u32 = 0xFFFFD700;
pub const RED:   u32 = 0xFFBB2528;
pub const GREEN: u32 = 0xFF2F5A2F;
pub const WHITE: u32 = 0xFFFFFFFF;

const PALETTE: [u32; 4] = [GOLD, RED, GREEN, WHITE];

/// Fraction of the remaining distance covered each frame.
const EASE: f32 = 0.08;
const GOLDEN_ANGLE: f32 = 2.399_963;
const TREE_BASE_Y: f32 = -0.85;
const TREE_HEIGHT: f32 = 1.6;
const TREE_RADIUS: f32 = 0.7;
const CLOUD_RADIUS: f32 = 0.95;
const PHOTO_RING: f32 = 0.6;
const PHOTO_SCALE: f32 = 1.0;
const FOCUS_SCALE: f32 = 4.0;

// ════════════════════════════════════════════════════════════════════════════
// Vec2
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self { Vec2 { x, y } }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Point `i` of `count` on a spiral wound around a cone, seen from the side.
/// Returns the position and a depth in [-1, 1] (positive = toward viewer).
pub fn tree_position(i: usize, count: usize) -> (Vec2, f32) {
    let t     = i as f32 / count.max(1) as f32;
    let angle = i as f32 * GOLDEN_ANGLE;
    let r     = TREE_RADIUS * (1.0 - t);
    (Vec2::new(r * angle.cos(), TREE_BASE_Y + TREE_HEIGHT * t), angle.sin())
}

/// Uniform point in a disc of `radius`.
pub fn cloud_position<R: Rng>(rng: &mut R, radius: f32) -> Vec2 {
    let r = radius * rng.gen::<f32>().sqrt();
    let a = rng.gen::<f32>() * std::f32::consts::TAU;
    Vec2::new(r * a.cos(), r * a.sin())
}

// ════════════════════════════════════════════════════════════════════════════
// Ornament
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Ornament {
    pub color:     u32,
    pub tree_pos:  Vec2,
    pub cloud_pos: Vec2,
    /// Current animated position.
    pub pos:       Vec2,
    pub depth:     f32,
}

// ════════════════════════════════════════════════════════════════════════════
// PhotoSprite
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct PhotoSprite {
    pub id:        ItemId,
    pub label:     String,
    pub tree_pos:  Vec2,
    pub cloud_pos: Vec2,
    pub pos:       Vec2,
    pub scale:     f32,
    pub focused:   bool,
}

// ════════════════════════════════════════════════════════════════════════════
// SceneState
// ════════════════════════════════════════════════════════════════════════════

/// Everything the visualizer draws, minus the HUD.
#[derive(Debug)]
pub struct SceneState {
    pub ornaments: Vec<Ornament>,
    pub photos:    Vec<PhotoSprite>,
    ornament_count: usize,
}

impl SceneState {
    /// Lay out `count` ornaments.  Start positions are scattered so the
    /// tree assembles itself on launch.
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let ornaments = (0..count)
            .map(|i| {
                let (tree_pos, depth) = tree_position(i, count);
                Ornament {
                    color:     PALETTE[rng.gen_range(0..PALETTE.len())],
                    tree_pos,
                    cloud_pos: cloud_position(&mut rng, CLOUD_RADIUS),
                    pos:       cloud_position(&mut rng, CLOUD_RADIUS * 1.2),
                    depth,
                }
            })
            .collect();
        SceneState { ornaments, photos: Vec::new(), ornament_count: count }
    }

    /// Add sprites for items that appeared since the last call.  Items are
    /// append-only, so the sprite list is always a prefix of `items`.
    pub fn sync_photos(&mut self, items: &[FocusableItem]) {
        for (index, item) in items.iter().enumerate().skip(self.photos.len()) {
            let (tree_pos, cloud_pos) = photo_slots(index, self.ornament_count);
            self.photos.push(PhotoSprite {
                id:        item.id.clone(),
                label:     item.label.clone(),
                tree_pos,
                cloud_pos,
                pos:       cloud_pos,
                scale:     PHOTO_SCALE,
                focused:   false,
            });
        }
    }

    /// Advance the animation one frame toward the layout `state` asks for.
    pub fn tick(&mut self, state: &ModeState, items: &[FocusableItem]) {
        self.sync_photos(items);

        let use_tree = state.is(AppMode::Tree);
        for o in &mut self.ornaments {
            let target = if use_tree { o.tree_pos } else { o.cloud_pos };
            o.pos = o.pos.lerp(target, EASE);
        }

        let focus = state.focused();
        for p in &mut self.photos {
            p.focused = focus == Some(&p.id);
            let (target, scale) = if p.focused {
                (Vec2::ZERO, FOCUS_SCALE)
            } else if use_tree {
                (p.tree_pos, PHOTO_SCALE)
            } else {
                (p.cloud_pos, PHOTO_SCALE)
            };
            p.pos   = p.pos.lerp(target, EASE);
            p.scale += (scale - p.scale) * EASE;
        }
    }

    pub fn focused_photo(&self) -> Option<&PhotoSprite> {
        self.photos.iter().find(|p| p.focused)
    }
}

/// Tree slot in the lower half of the tree, cloud slot on a ring.
fn photo_slots(index: usize, ornaments: usize) -> (Vec2, Vec2) {
    let half = (ornaments / 2).max(1);
    let slot = (index * 37 + 11) % half;
    let (tree, _) = tree_position(slot, ornaments);
    let a = index as f32 * GOLDEN_ANGLE;
    let cloud = Vec2::new(PHOTO_RING * a.cos(), PHOTO_RING * a.sin());
    (tree, cloud)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(scene: &mut SceneState, state: &ModeState, items: &[FocusableItem]) {
        for _ in 0..300 { scene.tick(state, items); }
    }

    fn photos(ids: &[&str]) -> Vec<FocusableItem> {
        ids.iter().map(|id| FocusableItem::new(*id, format!("{id}.png"))).collect()
    }

    #[test]
    fn tree_positions_narrow_toward_top() {
        let (bottom, _) = tree_position(0, 100);
        let (top, _)    = tree_position(99, 100);
        assert!(top.y > bottom.y);
        assert!(top.x.abs() < TREE_RADIUS * 0.05);
    }

    #[test]
    fn cloud_positions_inside_radius() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            assert!(cloud_position(&mut rng, 0.5).distance(Vec2::ZERO) <= 0.5 + 1e-5);
        }
    }

    #[test]
    fn ornaments_assemble_in_tree_mode() {
        let mut scene = SceneState::new(50, 1);
        settle(&mut scene, &ModeState::tree(), &[]);
        for o in &scene.ornaments {
            assert!(o.pos.distance(o.tree_pos) < 1e-3);
        }
    }

    #[test]
    fn ornaments_scatter_in_cloud_mode() {
        let mut scene = SceneState::new(50, 1);
        settle(&mut scene, &ModeState::cloud(), &[]);
        for o in &scene.ornaments {
            assert!(o.pos.distance(o.cloud_pos) < 1e-3);
        }
    }

    #[test]
    fn photos_appear_as_items_grow() {
        let mut scene = SceneState::new(10, 1);
        let all = photos(&["a", "b", "c"]);
        scene.tick(&ModeState::tree(), &all[..1]);
        assert_eq!(scene.photos.len(), 1);
        scene.tick(&ModeState::tree(), &all);
        assert_eq!(scene.photos.len(), 3);
        assert_eq!(scene.photos[2].id, ItemId::from("c"));
    }

    #[test]
    fn focused_photo_moves_to_centre_and_grows() {
        let mut scene = SceneState::new(10, 1);
        let all = photos(&["a", "b"]);
        let state = ModeState::focus(ItemId::from("b"));
        settle(&mut scene, &state, &all);

        let f = scene.focused_photo().unwrap();
        assert_eq!(f.id, ItemId::from("b"));
        assert!(f.pos.distance(Vec2::ZERO) < 1e-3);
        assert!((f.scale - FOCUS_SCALE).abs() < 1e-3);
        assert!(!scene.photos[0].focused);
    }

    #[test]
    fn leaving_focus_unfocuses() {
        let mut scene = SceneState::new(10, 1);
        let all = photos(&["a"]);
        scene.tick(&ModeState::focus(ItemId::from("a")), &all);
        scene.tick(&ModeState::cloud(), &all);
        assert!(scene.focused_photo().is_none());
    }

    #[test]
    fn repeated_state_keeps_progress() {
        let mut scene = SceneState::new(20, 9);
        let state = ModeState::tree();
        scene.tick(&state, &[]);
        let d1 = scene.ornaments[3].pos.distance(scene.ornaments[3].tree_pos);
        scene.tick(&state, &[]);
        let d2 = scene.ornaments[3].pos.distance(scene.ornaments[3].tree_pos);
        assert!(d2 < d1);
    }
}
