//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ MODE  gesture  pinch                               photos: n │
//! │                                                              │
//! │                 ornaments (tree or cloud)                    │
//! │                 photo tiles, focused photo in the centre     │
//! │                 hand cursor                                  │
//! │                                                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │ status bar                                                   │
//! │ key legend                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tree_mode::{AppMode, HandSample, ModeState};

use crate::error::AppError;
use crate::gesture::{SimFrame, SimInput, SimKey};
use crate::scene::{PhotoSprite, SceneState, Vec2, GOLD};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 1000;
pub const WIN_H:       usize = 700;
const SCENE_H:         usize = WIN_H - 56;
const STATUS_Y:        usize = SCENE_H;
/// Pixels per scene unit.
const SCENE_SCALE:     f32   = 300.0;
const ORNAMENT_PX:     usize = 5;
const PHOTO_PX:        f32   = 28.0;
const ROLL_STEP:       f32   = 0.05;
const BG_COLOR:        u32   = 0xFF050505;
const TEXT_BG:         u32   = 0xFF1A0B0B;
const PHOTO_FILL:      u32   = 0xFF3A3A4A;
const FOCUS_FRAME:     u32   = GOLD;
const CURSOR_COLOR:    u32   = 0xFFAADDFF;

/// Which non-gesture actions the window asked for this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiInput {
    pub upload: bool,
    pub reset:  bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
}

/// Frames per second for a frame interval, at least one.
fn target_fps(frame_ms: u64) -> usize {
    (1000 / frame_ms.max(1)).max(1) as usize
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, frame_ms: u64) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Leap Tree — Gesture Holiday Tree",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.set_target_fps(target_fps(frame_ms));

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Read the window's keys and mouse, forward a [`SimFrame`] to the
    /// simulated classifier and return the app-level actions.
    ///
    /// `None` means the window is closing.
    pub fn poll_input(&mut self) -> Option<UiInput> {
        if !self.window.is_open() { return None; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return None;
        }

        let down = |k: Key| self.window.is_key_down(k);
        let pose_keys = [
            (Key::F,    SimKey::Fist),
            (Key::O,    SimKey::Palm),
            (Key::I,    SimKey::PointUp),
            (Key::Up,   SimKey::ThumbUp),
            (Key::Down, SimKey::ThumbDown),
            (Key::V,    SimKey::Victory),
            (Key::L,    SimKey::LoveYou),
        ];
        let held: Vec<SimKey> = pose_keys
            .iter()
            .filter(|(k, _)| down(*k))
            .map(|(_, s)| *s)
            .collect();

        let pinch = down(Key::P) || self.window.get_mouse_down(MouseButton::Left);

        let mut roll = 0.0;
        if down(Key::Comma)  { roll -= ROLL_STEP; }
        if down(Key::Period) { roll += ROLL_STEP; }

        let cursor = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .filter(|&(_, y)| (y as usize) < SCENE_H)
            .map(|(x, y)| (x / WIN_W as f32, y / SCENE_H as f32));

        let _ = self.sim_tx.send(SimInput::Frame(SimFrame { held, pinch, cursor, roll }));

        Some(UiInput {
            upload: self.window.is_key_pressed(Key::U, KeyRepeat::No),
            reset:  self.window.is_key_pressed(Key::R, KeyRepeat::No),
        })
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        scene:       &SceneState,
        state:       &ModeState,
        sample:      &HandSample,
        focus_label: Option<&str>,
        pending:     usize,
        status:      &str,
    ) {
        // Clear
        self.buf.fill(BG_COLOR);

        // ── Ornaments, back to front ──────────────────────────────────────
        for o in scene.ornaments.iter().filter(|o| o.depth < 0.0) {
            self.draw_ornament(o.pos, o.color, o.depth);
        }
        for p in scene.photos.iter().filter(|p| !p.focused) {
            self.draw_photo(p);
        }
        for o in scene.ornaments.iter().filter(|o| o.depth >= 0.0) {
            self.draw_ornament(o.pos, o.color, o.depth);
        }

        // ── Focused photo on top ──────────────────────────────────────────
        if let Some(p) = scene.focused_photo() {
            self.draw_photo(p);
        }

        // ── Hand cursor ───────────────────────────────────────────────────
        self.draw_cursor(sample);

        // ── HUD ───────────────────────────────────────────────────────────
        let mode_color = match state.mode() {
            AppMode::Tree  => 0xFF55CC55,
            AppMode::Cloud => 0xFFAADDFF,
            AppMode::Focus => GOLD,
        };
        self.draw_label(state.mode().name(), 10, 10, mode_color);
        let hand = format!(
            "gesture: {}  pinch: {}  roll: {:.2}",
            sample.gesture.label(),
            if sample.is_pinching { "yes" } else { "no" },
            sample.rotation,
        );
        self.draw_label(&hand, 10, 22, 0xFFEEEEEE);
        if let Some(label) = focus_label {
            self.draw_label(&format!("focus: {}", label), 10, 34, GOLD);
        }
        let counts = format!("photos: {}  queued: {}", scene.photos.len(), pending);
        self.draw_label(&counts, WIN_W - 4 * counts.len() - 10, 10, 0xFFEEEEEE);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y + 12, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "F=fist  O=open palm  P/mouse=pinch  I V L Up Down=other poses  ,/.=roll  U=upload  R=reset  Q=quit",
            10, WIN_H - 16, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Scene primitives ──────────────────────────────────────────────────

    fn draw_ornament(&mut self, pos: Vec2, color: u32, depth: f32) {
        let (x, y) = to_screen(pos);
        // Far side of the tree is dimmer.
        let color = blend(color, BG_COLOR, (0.5 - depth * 0.5) * 0.6);
        let half = ORNAMENT_PX as isize / 2;
        self.fill_rect_signed(x - half, y - half, ORNAMENT_PX, ORNAMENT_PX, color);
    }

    fn draw_photo(&mut self, photo: &PhotoSprite) {
        let (cx, cy) = to_screen(photo.pos);
        let size = (PHOTO_PX * photo.scale) as usize;
        let half = size as isize / 2;
        let (x, y) = (cx - half, cy - half);
        self.fill_rect_signed(x, y, size, size, PHOTO_FILL);
        if x >= 0 && y >= 0 {
            let frame = if photo.focused { FOCUS_FRAME } else { 0xFFEEEEEE };
            self.draw_border(x as usize, y as usize, size, size, frame);
            if photo.focused || size > 40 {
                self.draw_label(&photo.label, x as usize + 4, y as usize + 4, 0xFFEEEEEE);
            }
        }
    }

    fn draw_cursor(&mut self, sample: &HandSample) {
        let x = (sample.cursor_x * (WIN_W - 1) as f32) as usize;
        let y = (sample.cursor_y * (SCENE_H - 1) as f32) as usize;
        for d in 0..=8usize {
            self.set_pixel(x + d, y, CURSOR_COLOR);
            self.set_pixel(x.saturating_sub(d), y, CURSOR_COLOR);
            self.set_pixel(x, y + d, CURSOR_COLOR);
            self.set_pixel(x, y.saturating_sub(d), CURSOR_COLOR);
        }
        if sample.is_pinching {
            self.draw_diamond(x, y, 5, CURSOR_COLOR);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect_signed(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w as isize).max(0) as usize;
        let y1 = (y + h as isize).max(0) as usize;
        if x1 > x0 && y1 > y0 {
            self.fill_rect(x0, y0, x1 - x0, (y1 - y0).min(SCENE_H.saturating_sub(y0)), color);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            if y < WIN_H           { self.buf[y           * WIN_W + col] = color; }
            if y+h-1 < WIN_H       { self.buf[(y+h-1)     * WIN_W + col] = color; }
        }
        for row in y..(y+h).min(WIN_H) {
            if x < WIN_W           { self.buf[row * WIN_W + x    ] = color; }
            if x+w-1 < WIN_W       { self.buf[row * WIN_W + x+w-1] = color; }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

/// Scene units → window pixels, y flipped.
fn to_screen(p: Vec2) -> (isize, isize) {
    let cx = WIN_W as f32 / 2.0;
    let cy = SCENE_H as f32 / 2.0;
    ((cx + p.x * SCENE_SCALE) as isize, (cy - p.y * SCENE_SCALE) as isize)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_interval_to_fps() {
        assert_eq!(target_fps(16), 62);
        assert_eq!(target_fps(1000), 1);
        assert_eq!(target_fps(5000), 1);
        assert_eq!(target_fps(0), 1000);
    }

    #[test]
    fn scene_origin_is_window_centre() {
        assert_eq!(to_screen(Vec2::ZERO), ((WIN_W / 2) as isize, (SCENE_H / 2) as isize));
    }

    #[test]
    fn scene_y_points_up() {
        let (_, up) = to_screen(Vec2::new(0.0, 0.5));
        assert!(up < (SCENE_H / 2) as isize);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFFFF0000, 0xFF0000FF, 0.0), 0xFFFF0000);
        assert_eq!(blend(0xFFFF0000, 0xFF0000FF, 1.0), 0xFF0000FF);
    }
}
