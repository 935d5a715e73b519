//! Presentation seam
//!
//! The engine pushes everything visible through this trait and reads layout
//! only through `layout()`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a rendered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Play-area geometry, in play-area pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Play area width and height
    pub play_size: Vec2,
    pub cannon_size: Vec2,
    /// Cannon top edge; bullets start here
    pub cannon_top: f32,
}

impl Layout {
    /// Largest cannon x that keeps the cannon inside the play area
    pub fn max_cannon_x(&self) -> f32 {
        (self.play_size.x - self.cannon_size.x).max(0.0)
    }
}

/// Display surface and HUD
pub trait Presenter {
    fn layout(&self) -> Layout;

    fn move_cannon(&mut self, x: f32);

    fn render_bullet(&mut self, pos: Vec2, size: Vec2) -> VisualHandle;
    fn render_ball(&mut self, pos: Vec2, radius: f32, hue: u16) -> VisualHandle;
    fn move_visual(&mut self, handle: VisualHandle, pos: Vec2);
    /// Detach a visual. Unknown handles are ignored.
    fn remove_visual(&mut self, handle: VisualHandle);

    fn update_score(&mut self, coins: u64);
    fn update_lives(&mut self, lives: u8);
    fn show_high_score_banner(&mut self);
    fn hide_high_score_banner(&mut self);
    fn set_paused(&mut self, paused: bool);
    /// Terminal notification; the engine resets the session right after
    fn show_game_over(&mut self, coins: u64);
}
