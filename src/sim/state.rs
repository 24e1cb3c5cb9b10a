//! Game state and core simulation types
//!
//! Positions are viewport pixels with y growing downward. Asteroids and
//! coins are anchored at their top-left corner, the ship at its center.

use glam::Vec2;

use super::rng::RangeRng;
use crate::consts::*;
use crate::highscores::BestScore;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ship was hit; waiting for a tap to restart
    GameOver,
}

/// Something that happened during a tick, for the session to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ship hit an asteroid
    Collision,
    /// Ship picked up a coin
    CoinCollected,
    /// An asteroid left the bottom edge and went back to the top
    ObstacleRecycled,
    /// Final score beat the best score
    NewBest(u64),
    /// Session ended with this score
    GameOver { score: u64 },
}

/// Drawable area size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Dimensions are clamped to at least 1 pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn center(&self) -> Vec2 {
        // Integer halving, matching how the host reports the view center
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }

    #[inline]
    pub fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    #[inline]
    pub fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    /// Center of the sprite
    pub pos: Vec2,
}

/// A falling asteroid. Recycled to the top instead of destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
}

impl Obstacle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// A falling coin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    /// Top-left corner
    pub pos: Vec2,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub score: u64,
    pub best: BestScore,
    /// Fall speed of asteroids and coins, pixels per tick
    pub speed: f32,
    pub ship: Ship,
    /// Always exactly `OBSTACLE_COUNT` once seeded
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    /// Simulation tick counter for the current session
    pub time_ticks: u64,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session: ship centered, asteroids seeded above the screen
    pub fn new(viewport: Viewport, best: BestScore, rng: &mut impl RangeRng) -> Self {
        let mut state = Self {
            viewport,
            phase: GamePhase::Playing,
            score: 0,
            best,
            speed: INITIAL_SPEED,
            ship: Ship {
                pos: viewport.center(),
            },
            obstacles: Vec::with_capacity(OBSTACLE_COUNT),
            coins: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
        };
        state.seed_obstacles(rng);
        state
    }

    /// Put everything back to the start of a session. Best score is kept.
    pub fn reset(&mut self, rng: &mut impl RangeRng) {
        self.obstacles.clear();
        self.coins.clear();
        self.score = 0;
        self.speed = INITIAL_SPEED;
        self.phase = GamePhase::Playing;
        self.ship.pos = self.viewport.center();
        self.time_ticks = 0;
        self.events.clear();
        self.seed_obstacles(rng);
    }

    /// Place one asteroid at each starting height with a random column
    pub fn seed_obstacles(&mut self, rng: &mut impl RangeRng) {
        self.obstacles.clear();
        for y in OBSTACLE_START_Y {
            let x = self.random_obstacle_x(rng);
            self.obstacles.push(Obstacle::new(x, y));
        }
    }

    /// Random asteroid column in `[0, width - 200)`
    pub fn random_obstacle_x(&self, rng: &mut impl RangeRng) -> f32 {
        rng.span(0, self.viewport.width_i32() - OBSTACLE_SIZE as i32) as f32
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Move the ship to an absolute position (ignored once the game is over)
    pub fn move_ship(&mut self, pos: Vec2) {
        if self.phase == GamePhase::Playing && pos.is_finite() {
            self.ship.pos = pos;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    #[test]
    fn test_new_state_seeds_four_obstacles() {
        let mut rng = seeded(1);
        let state = GameState::new(Viewport::new(1000, 2000), BestScore::new(9), &mut rng);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.obstacles.len(), OBSTACLE_COUNT);
        let ys: Vec<f32> = state.obstacles.iter().map(|o| o.pos.y).collect();
        assert_eq!(ys, vec![-100.0, -300.0, -500.0, -700.0]);
        for o in &state.obstacles {
            assert!(o.pos.x >= 0.0 && o.pos.x < 800.0);
        }
        assert_eq!(state.ship.pos, Vec2::new(500.0, 1000.0));
        assert_eq!(state.speed, INITIAL_SPEED);
        assert_eq!(state.best.get(), 9);
    }

    #[test]
    fn test_viewport_clamps_to_one_pixel() {
        let v = Viewport::new(0, 0);
        assert_eq!(v.width, 1);
        assert_eq!(v.height, 1);
    }

    #[test]
    fn test_move_ship_ignored_after_game_over() {
        let mut rng = seeded(1);
        let mut state = GameState::new(Viewport::new(1000, 2000), BestScore::default(), &mut rng);

        state.move_ship(Vec2::new(10.0, 20.0));
        assert_eq!(state.ship.pos, Vec2::new(10.0, 20.0));

        state.phase = GamePhase::GameOver;
        state.move_ship(Vec2::new(99.0, 99.0));
        assert_eq!(state.ship.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_move_ship_rejects_non_finite() {
        let mut rng = seeded(1);
        let mut state = GameState::new(Viewport::new(1000, 2000), BestScore::default(), &mut rng);
        state.move_ship(Vec2::new(f32::NAN, 3.0));
        assert_eq!(state.ship.pos, Vec2::new(500.0, 1000.0));
    }
}
