//! Game balance and timing
//!
//! Persisted separately from the high score in LocalStorage. Every field falls
//! back to its default when missing from the stored JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bullets ===
    pub bullet_period_ms: f64,
    pub bullet_step: f32,
    pub bullet_exit_y: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,

    // === Balls ===
    pub ball_period_ms: f64,
    pub spawn_period_ms: f64,
    pub ball_radius_min: f32,
    pub ball_radius_max: f32,
    pub spawn_margin: f32,

    // === Difficulty ===
    pub initial_ball_speed: f32,
    pub difficulty_period_ms: f64,
    pub speed_increment: f32,

    // === Session ===
    pub initial_lives: u8,
    pub banner_duration_ms: f64,
    pub max_frame_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullet_period_ms: BULLET_PERIOD_MS,
            bullet_step: BULLET_STEP,
            bullet_exit_y: BULLET_EXIT_Y,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,

            ball_period_ms: BALL_PERIOD_MS,
            spawn_period_ms: SPAWN_PERIOD_MS,
            ball_radius_min: BALL_RADIUS_MIN,
            ball_radius_max: BALL_RADIUS_MAX,
            spawn_margin: SPAWN_MARGIN,

            initial_ball_speed: INITIAL_BALL_SPEED,
            difficulty_period_ms: DIFFICULTY_PERIOD_MS,
            speed_increment: SPEED_INCREMENT,

            initial_lives: INITIAL_LIVES,
            banner_duration_ms: BANNER_DURATION_MS,
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Bullet bounding box size
    pub fn bullet_size(&self) -> Vec2 {
        Vec2::new(self.bullet_width, self.bullet_height)
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        self.bullet_period_ms = self.bullet_period_ms.max(MIN_PERIOD_MS);
        self.ball_period_ms = self.ball_period_ms.max(MIN_PERIOD_MS);
        self.spawn_period_ms = self.spawn_period_ms.max(MIN_PERIOD_MS);
        self.difficulty_period_ms = self.difficulty_period_ms.max(MIN_PERIOD_MS);
        self.max_frame_ms = self.max_frame_ms.max(MIN_PERIOD_MS);
        self.speed_increment = self.speed_increment.max(0.0);
        self.initial_ball_speed = self.initial_ball_speed.max(0.0);
        self.initial_lives = self.initial_lives.max(1);
        if self.ball_radius_max <= self.ball_radius_min {
            self.ball_radius_max = self.ball_radius_min + 1.0;
        }
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "coin_cannon_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "initial_lives": 5 }"#).unwrap();
        assert_eq!(tuning.initial_lives, 5);
        assert_eq!(tuning.spawn_period_ms, SPAWN_PERIOD_MS);
        assert_eq!(tuning.bullet_size(), Vec2::new(5.0, 15.0));
    }

    #[test]
    fn test_zero_periods_are_clamped() {
        let tuning = Tuning::from_json(r#"{ "bullet_period_ms": 0, "ball_period_ms": -4 }"#).unwrap();
        assert_eq!(tuning.bullet_period_ms, MIN_PERIOD_MS);
        assert_eq!(tuning.ball_period_ms, MIN_PERIOD_MS);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
