//! Simulation engine
//!
//! `Engine` owns the clock, every timer handle and the State Store. Time only
//! moves through [`Engine::advance`], which fires due timers in expiry order,
//! so tests drive the whole game by calling it with explicit frame times.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Aabb, find_hits};
use super::presenter::Presenter;
use super::state::{Ball, Bullet, GameEvent, GamePhase, GameState};
use super::timer::{Interval, Timeout};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::tuning::Tuning;

/// Timer owners, in tie-break order for timers due at the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Spawn,
    Difficulty,
    Banner,
    Bullet(u32),
    Ball(u32),
}

/// The simulation engine
pub struct Engine<P, S> {
    state: GameState,
    tuning: Tuning,
    presenter: P,
    store: S,
    high_score: HighScore,
    rng: Pcg32,
    /// Simulation clock (ms)
    now_ms: f64,
    spawn_timer: Interval,
    difficulty_timer: Interval,
    banner_timer: Timeout,
    events: Vec<GameEvent>,
}

impl<P: Presenter, S: KeyValueStore> Engine<P, S> {
    /// Start a session: load the high score, reset the HUD and start the
    /// spawn and difficulty timers.
    pub fn new(presenter: P, store: S, tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let high_score = HighScore::load(&store);
        let spawn_timer = Interval::started(tuning.spawn_period_ms, 0.0);
        let difficulty_timer = Interval::started(tuning.difficulty_period_ms, 0.0);

        let mut engine = Self {
            state: GameState::new(&tuning),
            tuning,
            presenter,
            store,
            high_score,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0.0,
            spawn_timer,
            difficulty_timer,
            banner_timer: Timeout::default(),
            events: Vec::new(),
        };

        let layout = engine.presenter.layout();
        engine.state.cannon_x = layout.max_cannon_x() / 2.0;
        engine.presenter.move_cannon(engine.state.cannon_x);
        engine.sync_hud();

        log::info!("Session started with seed: {}", seed);
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    /// Simulation clock (ms since session start)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Commands ===

    /// Track the pointer. `x` is relative to the play area's left edge; the
    /// cannon centres on it, clamped inside the play area.
    pub fn pointer_moved(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        let layout = self.presenter.layout();
        let cannon_x = (x - layout.cannon_size.x / 2.0).clamp(0.0, layout.max_cannon_x());
        self.state.cannon_x = cannon_x;
        self.presenter.move_cannon(cannon_x);
    }

    /// Fire a bullet from the top of the cannon. Ignored while paused.
    pub fn fire(&mut self) -> Option<u32> {
        if self.state.is_paused() {
            log::debug!("Fire ignored while paused");
            return None;
        }

        let layout = self.presenter.layout();
        let size = self.tuning.bullet_size();
        let pos = Vec2::new(
            self.state.cannon_x + layout.cannon_size.x / 2.0 - size.x / 2.0,
            layout.cannon_top,
        );

        let id = self.state.next_entity_id();
        let visual = self.presenter.render_bullet(pos, size);
        self.state.add_bullet(Bullet {
            id,
            pos,
            size,
            task: Interval::started(self.tuning.bullet_period_ms, self.now_ms),
            visual,
        });
        self.events.push(GameEvent::BulletFired { id });
        Some(id)
    }

    /// Toggle between Running and Paused, returning the new phase.
    ///
    /// Pausing cancels every timer but the banner and leaves entities where
    /// they are. Resuming restarts each timer from the current clock, so
    /// entities continue from their frozen positions.
    pub fn toggle_pause(&mut self) -> GamePhase {
        match self.state.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
        }
        self.state.phase
    }

    /// Advance the clock by `dt_ms`, firing every timer that comes due in
    /// expiry order. Frames longer than `max_frame_ms` are clamped.
    pub fn advance(&mut self, dt_ms: f64) {
        // Also rejects NaN
        if !(dt_ms > 0.0) {
            return;
        }
        let horizon = self.now_ms + dt_ms.min(self.tuning.max_frame_ms);

        while let Some((due, task)) = self.next_due(horizon) {
            self.now_ms = self.now_ms.max(due);
            self.run(task);
        }
        self.now_ms = horizon;
    }

    // === Timed operations ===

    /// Spawn a ball at a random position along the top edge
    pub fn spawn_ball(&mut self) -> u32 {
        let width = self.presenter.layout().play_size.x;
        let margin = self.tuning.spawn_margin;
        let radius = self
            .rng
            .random_range(self.tuning.ball_radius_min..self.tuning.ball_radius_max);
        let span = (width - radius * 2.0 - margin * 2.0).max(0.0);
        let x = margin + self.rng.random::<f32>() * span;
        let hue = self.rng.random_range(0..360u16);

        self.spawn_ball_at(Vec2::new(x, 0.0), radius, hue)
    }

    /// Spawn a ball with an explicit top-left position and radius
    pub fn spawn_ball_at(&mut self, pos: Vec2, radius: f32, hue: u16) -> u32 {
        let id = self.state.next_entity_id();
        let visual = self.presenter.render_ball(pos, radius, hue);
        let task = if self.state.is_paused() {
            Interval::new(self.tuning.ball_period_ms)
        } else {
            Interval::started(self.tuning.ball_period_ms, self.now_ms)
        };
        self.state.add_ball(Ball {
            id,
            pos,
            radius,
            hue,
            task,
            visual,
        });

        log::debug!("Spawned ball {} (r = {:.1}) at x = {:.1}", id, radius, pos.x);
        self.events.push(GameEvent::BallSpawned { id, radius });
        id
    }

    /// Speed balls up by one step. No-op while paused.
    pub fn increase_difficulty(&mut self) {
        if self.state.is_paused() {
            return;
        }
        self.state.ball_speed += self.tuning.speed_increment;
        log::debug!("Ball speed now {:.1}", self.state.ball_speed);
    }

    /// Sweep every bullet/ball pair. Returns the number of resolved hits.
    ///
    /// Each bullet takes the first ball it overlaps; a ball claimed by an
    /// earlier bullet in the same sweep is not available to later ones.
    pub fn check_collisions(&mut self) -> usize {
        if self.state.is_paused() {
            return 0;
        }

        let bullets: Vec<(u32, Aabb)> = self
            .state
            .bullets
            .iter()
            .map(|b| (b.id, b.bounds()))
            .collect();
        let balls: Vec<(u32, Aabb)> = self
            .state
            .balls
            .iter()
            .map(|b| (b.id, b.bounds()))
            .collect();

        let hits = find_hits(&bullets, &balls);
        for hit in &hits {
            self.state.remove_ball(hit.ball, &mut self.presenter);
            self.state.remove_bullet(hit.bullet, &mut self.presenter);
            self.events.push(GameEvent::Hit {
                bullet: hit.bullet,
                ball: hit.ball,
            });
            self.score_coin();
        }
        hits.len()
    }

    /// Take one life. The last one ends the session and starts a new one.
    pub fn lose_life(&mut self) {
        if self.state.lives == 0 {
            return;
        }
        self.state.lives -= 1;
        let lives = self.state.lives;
        self.presenter.update_lives(lives);
        self.events.push(GameEvent::LifeLost { lives });
        log::info!("Ball escaped, {} lives left", lives);

        if lives == 0 {
            self.game_over();
        }
    }

    /// Full in-process restart: every entity removed, counters back to their
    /// starting values, timers started fresh, HUD refreshed.
    pub fn reset(&mut self) {
        self.state.clear_entities(&mut self.presenter);
        self.state.restart(&self.tuning);

        self.spawn_timer.start(self.now_ms);
        self.difficulty_timer.start(self.now_ms);

        self.sync_hud();
    }

    // === Internals ===

    fn pause(&mut self) {
        self.state.phase = GamePhase::Paused;
        self.spawn_timer.cancel();
        self.difficulty_timer.cancel();
        for bullet in &mut self.state.bullets {
            bullet.task.cancel();
        }
        for ball in &mut self.state.balls {
            ball.task.cancel();
        }

        self.presenter.set_paused(true);
        self.events.push(GameEvent::Paused);
        log::info!("Paused");
    }

    fn resume(&mut self) {
        let now = self.now_ms;
        self.state.phase = GamePhase::Running;
        self.spawn_timer.start(now);
        self.difficulty_timer.start(now);
        for bullet in &mut self.state.bullets {
            bullet.task.start(now);
        }
        for ball in &mut self.state.balls {
            ball.task.start(now);
        }

        self.presenter.set_paused(false);
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed");
    }

    /// Earliest timer due at or before `horizon`
    fn next_due(&self, horizon: f64) -> Option<(f64, Task)> {
        let timers = [
            (self.spawn_timer.due_at(), Task::Spawn),
            (self.difficulty_timer.due_at(), Task::Difficulty),
            (self.banner_timer.due_at(), Task::Banner),
        ];
        let bullets = self
            .state
            .bullets
            .iter()
            .map(|b| (b.task.due_at(), Task::Bullet(b.id)));
        let balls = self
            .state
            .balls
            .iter()
            .map(|b| (b.task.due_at(), Task::Ball(b.id)));

        let mut best: Option<(f64, Task)> = None;
        for (due, task) in timers.into_iter().chain(bullets).chain(balls) {
            let Some(due) = due else { continue };
            if due > horizon {
                continue;
            }
            // Strict comparison keeps the tie-break order
            if best.is_none_or(|(best_due, _)| due < best_due) {
                best = Some((due, task));
            }
        }
        best
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Spawn => {
                self.spawn_timer.reschedule();
                self.spawn_ball();
            }
            Task::Difficulty => {
                self.difficulty_timer.reschedule();
                self.increase_difficulty();
            }
            Task::Banner => {
                self.banner_timer.cancel();
                self.presenter.hide_high_score_banner();
            }
            Task::Bullet(id) => {
                if let Some(bullet) = self.state.bullet_mut(id) {
                    bullet.task.reschedule();
                }
                self.advance_bullet(id);
            }
            Task::Ball(id) => {
                if let Some(ball) = self.state.ball_mut(id) {
                    ball.task.reschedule();
                }
                self.advance_ball(id);
            }
        }
    }

    /// One bullet tick: leave through the top, or rise and sweep
    fn advance_bullet(&mut self, id: u32) {
        let exit_y = self.tuning.bullet_exit_y;
        let step = self.tuning.bullet_step;

        let Some(bullet) = self.state.bullet_mut(id) else {
            return;
        };
        if bullet.pos.y <= exit_y {
            self.state.remove_bullet(id, &mut self.presenter);
            self.events.push(GameEvent::BulletExpired { id });
            return;
        }

        bullet.pos.y -= step;
        let (visual, pos) = (bullet.visual, bullet.pos);
        self.presenter.move_visual(visual, pos);
        self.check_collisions();
    }

    /// One ball tick: fall, and cost a life once below the play area
    fn advance_ball(&mut self, id: u32) {
        let speed = self.state.ball_speed;
        let height = self.presenter.layout().play_size.y;

        let Some(ball) = self.state.ball_mut(id) else {
            return;
        };
        ball.pos.y += speed;
        let (visual, pos) = (ball.visual, ball.pos);
        self.presenter.move_visual(visual, pos);

        if pos.y > height {
            self.state.remove_ball(id, &mut self.presenter);
            self.lose_life();
        }
    }

    fn score_coin(&mut self) {
        self.state.coins += 1;
        let coins = self.state.coins;
        self.presenter.update_score(coins);
        self.events.push(GameEvent::CoinScored { coins });

        if self.high_score.record(coins, &mut self.store) {
            log::info!("New high score: {}", coins);
            self.presenter.show_high_score_banner();
            self.banner_timer
                .arm(self.now_ms, self.tuning.banner_duration_ms);
            self.events.push(GameEvent::NewHighScore { score: coins });
        }
    }

    fn game_over(&mut self) {
        let coins = self.state.coins;
        log::info!("Game over with {} coins (best {})", coins, self.high_score.best);
        self.events.push(GameEvent::GameOver { coins });
        self.presenter.show_game_over(coins);
        self.reset();
    }

    fn sync_hud(&mut self) {
        self.presenter.update_score(self.state.coins);
        self.presenter.update_lives(self.state.lives);
        self.presenter.set_paused(self.state.is_paused());
    }
}
