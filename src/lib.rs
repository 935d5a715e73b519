//! Coin Cannon - shoot the falling balls, collect the coins
//!
//! Core modules:
//! - `sim`: Simulation (timers, entities, collisions, game state)
//! - `platform`: Presenter implementations (browser DOM, headless)
//! - `persistence`: Key/value storage behind the high score
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use sim::{Engine, GameEvent, GamePhase, GameState, Presenter};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Bullet advance period (ms)
    pub const BULLET_PERIOD_MS: f64 = 20.0;
    /// Bullet rise per tick (px)
    pub const BULLET_STEP: f32 = 10.0;
    /// A bullet at or above this offset leaves the play area
    pub const BULLET_EXIT_Y: f32 = -20.0;
    /// Bullet bounding box
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;

    /// Ball advance period (ms)
    pub const BALL_PERIOD_MS: f64 = 16.0;
    /// Ball spawn period (ms)
    pub const SPAWN_PERIOD_MS: f64 = 1500.0;
    /// Ball radius range [min, max)
    pub const BALL_RADIUS_MIN: f32 = 15.0;
    pub const BALL_RADIUS_MAX: f32 = 50.0;
    /// Horizontal margin kept free on both sides of a spawned ball
    pub const SPAWN_MARGIN: f32 = 20.0;

    /// Starting fall speed (px per ball tick)
    pub const INITIAL_BALL_SPEED: f32 = 2.0;
    /// Difficulty step period (ms)
    pub const DIFFICULTY_PERIOD_MS: f64 = 2000.0;
    /// Fall speed added per difficulty step
    pub const SPEED_INCREMENT: f32 = 0.5;

    pub const INITIAL_LIVES: u8 = 3;

    /// How long the high score banner stays up (ms)
    pub const BANNER_DURATION_MS: f64 = 3000.0;

    /// Longest frame the scheduler will simulate at once (ms)
    pub const MAX_FRAME_MS: f64 = 250.0;
    /// Shortest timer period accepted from tuning (ms)
    pub const MIN_PERIOD_MS: f64 = 1.0;
}
