//! Headless presenter
//!
//! Keeps the latest position of every visual and a log of HUD updates, so the
//! engine can run without a display.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::{Layout, Presenter, VisualHandle};

/// Default play area: 400 x 600 with a 50 x 50 cannon resting on the bottom
pub const DEFAULT_LAYOUT: Layout = Layout {
    play_size: Vec2::new(400.0, 600.0),
    cannon_size: Vec2::new(50.0, 50.0),
    cannon_top: 550.0,
};

#[derive(Debug, Clone)]
pub struct HeadlessPresenter {
    pub layout: Layout,
    pub cannon_x: f32,
    /// Live visuals and their current positions
    pub visuals: HashMap<VisualHandle, Vec2>,
    /// Every handle detached, in order
    pub removed: Vec<VisualHandle>,
    /// Every score shown, in order
    pub scores: Vec<u64>,
    /// Every lives count shown, in order
    pub lives: Vec<u8>,
    pub banner_visible: bool,
    pub banners_shown: u32,
    pub paused: bool,
    /// Final coin count of every game over
    pub game_overs: Vec<u64>,
    next_handle: u32,
}

impl Default for HeadlessPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT)
    }
}

impl HeadlessPresenter {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            cannon_x: 0.0,
            visuals: HashMap::new(),
            removed: Vec::new(),
            scores: Vec::new(),
            lives: Vec::new(),
            banner_visible: false,
            banners_shown: 0,
            paused: false,
            game_overs: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn visual_pos(&self, handle: VisualHandle) -> Option<Vec2> {
        self.visuals.get(&handle).copied()
    }

    fn attach(&mut self, pos: Vec2) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.visuals.insert(handle, pos);
        handle
    }
}

impl Presenter for HeadlessPresenter {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn move_cannon(&mut self, x: f32) {
        self.cannon_x = x;
    }

    fn render_bullet(&mut self, pos: Vec2, _size: Vec2) -> VisualHandle {
        self.attach(pos)
    }

    fn render_ball(&mut self, pos: Vec2, _radius: f32, _hue: u16) -> VisualHandle {
        self.attach(pos)
    }

    fn move_visual(&mut self, handle: VisualHandle, pos: Vec2) {
        if let Some(p) = self.visuals.get_mut(&handle) {
            *p = pos;
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.removed.push(handle);
        }
    }

    fn update_score(&mut self, coins: u64) {
        self.scores.push(coins);
    }

    fn update_lives(&mut self, lives: u8) {
        self.lives.push(lives);
    }

    fn show_high_score_banner(&mut self) {
        self.banner_visible = true;
        self.banners_shown += 1;
    }

    fn hide_high_score_banner(&mut self) {
        self.banner_visible = false;
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn show_game_over(&mut self, coins: u64) {
        self.game_overs.push(coins);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_tracking() {
        let mut presenter = HeadlessPresenter::default();
        let a = presenter.render_bullet(Vec2::new(1.0, 2.0), Vec2::new(5.0, 15.0));
        let b = presenter.render_ball(Vec2::new(3.0, 4.0), 20.0, 0);
        assert_ne!(a, b);

        presenter.move_visual(a, Vec2::new(1.0, -8.0));
        assert_eq!(presenter.visual_pos(a), Some(Vec2::new(1.0, -8.0)));

        presenter.remove_visual(a);
        presenter.remove_visual(a);
        assert_eq!(presenter.removed, vec![a]);
        assert_eq!(presenter.visual_count(), 1);

        // Moving a detached visual does not resurrect it
        presenter.move_visual(a, Vec2::ZERO);
        assert_eq!(presenter.visual_pos(a), None);
    }
}
