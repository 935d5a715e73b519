//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM:
//! - Time advances only through `Engine::advance`
//! - Seeded RNG only
//! - Stable iteration order (firing/spawn order)
//! - Display and storage reached through the `Presenter` and `KeyValueStore` traits

pub mod collision;
pub mod engine;
pub mod presenter;
pub mod state;
pub mod timer;

pub use collision::{Aabb, Hit, find_hits};
pub use engine::Engine;
pub use presenter::{Layout, Presenter, VisualHandle};
pub use state::{Ball, Bullet, GameEvent, GamePhase, GameState};
pub use timer::{Interval, Timeout};
