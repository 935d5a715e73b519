//! Game state and core simulation types
//!
//! The State Store: entity collections plus the session counters. Mutation
//! only, no timing or game rules.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::presenter::{Presenter, VisualHandle};
use super::timer::Interval;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Timers running, collisions checked
    #[default]
    Running,
    /// Every timer cancelled, entities frozen in place
    Paused,
}

/// Things that happened during a tick, for the caller to log or assert on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired { id: u32 },
    BallSpawned { id: u32, radius: f32 },
    /// Bullet left through the top without hitting anything
    BulletExpired { id: u32 },
    Hit { bullet: u32, ball: u32 },
    CoinScored { coins: u64 },
    NewHighScore { score: u64 },
    LifeLost { lives: u8 },
    GameOver { coins: u64 },
    Paused,
    Resumed,
}

/// A bullet rising from the cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Top-left corner; x never changes after firing
    pub pos: Vec2,
    pub size: Vec2,
    /// Advance task
    pub task: Interval,
    pub visual: VisualHandle,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// A falling ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Top-left corner of the ball's bounding square
    pub pos: Vec2,
    pub radius: f32,
    /// Colour hue in degrees
    pub hue: u16,
    /// Advance task
    pub task: Interval,
    pub visual: VisualHandle,
}

impl Ball {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::splat(self.radius * 2.0))
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Active bullets (firing order)
    pub bullets: Vec<Bullet>,
    /// Active balls (spawn order)
    pub balls: Vec<Ball>,
    /// Coins earned this session
    pub coins: u64,
    /// Ball fall per ball tick
    pub ball_speed: f32,
    pub lives: u8,
    pub phase: GamePhase,
    /// Cannon left edge in play-area coordinates
    pub cannon_x: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh session state
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            bullets: Vec::new(),
            balls: Vec::new(),
            coins: 0,
            ball_speed: tuning.initial_ball_speed,
            lives: tuning.initial_lives,
            phase: GamePhase::Running,
            cannon_x: 0.0,
            next_id: 1,
        }
    }

    /// Return the counters to their starting values. Entity IDs keep counting
    /// so events from consecutive sessions never share an ID.
    pub fn restart(&mut self, tuning: &Tuning) {
        self.coins = 0;
        self.ball_speed = tuning.initial_ball_speed;
        self.lives = tuning.initial_lives;
        self.phase = GamePhase::Running;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    pub fn add_ball(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    pub fn bullet(&self, id: u32) -> Option<&Bullet> {
        self.bullets.iter().find(|b| b.id == id)
    }

    pub fn bullet_mut(&mut self, id: u32) -> Option<&mut Bullet> {
        self.bullets.iter_mut().find(|b| b.id == id)
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: u32) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Remove a bullet: cancel its task, detach its visual, then drop it from
    /// the collection. Absent IDs are a no-op.
    pub fn remove_bullet(&mut self, id: u32, presenter: &mut dyn Presenter) -> Option<Bullet> {
        let index = self.bullets.iter().position(|b| b.id == id)?;
        let bullet = &mut self.bullets[index];
        bullet.task.cancel();
        presenter.remove_visual(bullet.visual);
        Some(self.bullets.remove(index))
    }

    /// Remove a ball: cancel its task, detach its visual, then drop it from
    /// the collection. Absent IDs are a no-op.
    pub fn remove_ball(&mut self, id: u32, presenter: &mut dyn Presenter) -> Option<Ball> {
        let index = self.balls.iter().position(|b| b.id == id)?;
        let ball = &mut self.balls[index];
        ball.task.cancel();
        presenter.remove_visual(ball.visual);
        Some(self.balls.remove(index))
    }

    /// Remove every entity through the regular removal path
    pub fn clear_entities(&mut self, presenter: &mut dyn Presenter) {
        let bullet_ids: Vec<u32> = self.bullets.iter().map(|b| b.id).collect();
        for id in bullet_ids {
            self.remove_bullet(id, presenter);
        }
        let ball_ids: Vec<u32> = self.balls.iter().map(|b| b.id).collect();
        for id in ball_ids {
            self.remove_ball(id, presenter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPresenter;

    fn bullet(state: &mut GameState, presenter: &mut HeadlessPresenter) -> u32 {
        let id = state.next_entity_id();
        let pos = Vec2::new(10.0, 500.0);
        let size = Vec2::new(5.0, 15.0);
        let visual = presenter.render_bullet(pos, size);
        state.add_bullet(Bullet {
            id,
            pos,
            size,
            task: Interval::started(20.0, 0.0),
            visual,
        });
        id
    }

    fn ball(state: &mut GameState, presenter: &mut HeadlessPresenter) -> u32 {
        let id = state.next_entity_id();
        let pos = Vec2::new(100.0, 0.0);
        let visual = presenter.render_ball(pos, 20.0, 90);
        state.add_ball(Ball {
            id,
            pos,
            radius: 20.0,
            hue: 90,
            task: Interval::started(16.0, 0.0),
            visual,
        });
        id
    }

    #[test]
    fn test_remove_bullet_cancels_and_detaches() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::new(&Tuning::default());
        let id = bullet(&mut state, &mut presenter);
        assert_eq!(presenter.visual_count(), 1);

        let removed = state.remove_bullet(id, &mut presenter).unwrap();
        assert!(!removed.task.is_running());
        assert!(state.bullet(id).is_none());
        assert_eq!(presenter.visual_count(), 0);
        assert_eq!(presenter.removed, vec![removed.visual]);

        // Second removal is a no-op
        assert!(state.remove_bullet(id, &mut presenter).is_none());
        assert_eq!(presenter.removed.len(), 1);
    }

    #[test]
    fn test_remove_ball_is_idempotent() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::new(&Tuning::default());
        let keep = ball(&mut state, &mut presenter);
        let id = ball(&mut state, &mut presenter);

        let removed = state.remove_ball(id, &mut presenter).unwrap();
        assert!(!removed.task.is_running());
        assert!(state.remove_ball(id, &mut presenter).is_none());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].id, keep);
        assert!(state.balls[0].task.is_running());
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::new(&Tuning::default());
        let a = bullet(&mut state, &mut presenter);
        let b = ball(&mut state, &mut presenter);
        assert_ne!(a, b);
        // A ball id never removes a bullet
        assert!(state.remove_bullet(b, &mut presenter).is_none());
    }

    #[test]
    fn test_clear_entities() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::new(&Tuning::default());
        bullet(&mut state, &mut presenter);
        ball(&mut state, &mut presenter);
        ball(&mut state, &mut presenter);

        state.clear_entities(&mut presenter);
        assert!(state.bullets.is_empty());
        assert!(state.balls.is_empty());
        assert_eq!(presenter.visual_count(), 0);
    }

    #[test]
    fn test_ball_bounds() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::new(&Tuning::default());
        let id = ball(&mut state, &mut presenter);
        let bounds = state.ball(id).unwrap().bounds();
        assert_eq!(bounds.min, Vec2::new(100.0, 0.0));
        assert_eq!(bounds.max, Vec2::new(140.0, 40.0));
    }
}
