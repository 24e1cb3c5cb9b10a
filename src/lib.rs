//! Star Dodge - an arcade dodge-and-collect game
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, per-tick update)
//! - `spawner`: Periodic coin spawning on its own timer thread
//! - `session`: Playing/GameOver state machine and side effects
//! - `driver`: The dedicated update+render loop thread
//! - `platform`: Host lifecycle, pointer input, drawing surfaces
//! - `renderer`: Per-frame drawable list
//! - `persistence`: Best score storage

pub mod audio;
pub mod driver;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod spawner;

pub use driver::{GameLoop, LoopError};
pub use highscores::BestScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Ship sprite half-extent (drawn as a 200x200 box around its center)
    pub const SHIP_HALF_EXTENT: f32 = 100.0;
    /// Horizontal reach of the ship hit box past its x coordinate
    pub const SHIP_HIT_REACH_X: f32 = 50.0;
    /// Vertical reach of the ship hit box past its y coordinate
    pub const SHIP_HIT_REACH_Y: f32 = 100.0;

    /// Asteroid sprite size (square)
    pub const OBSTACLE_SIZE: f32 = 200.0;
    /// Asteroid hit box width
    pub const OBSTACLE_HIT_WIDTH: f32 = 200.0;
    /// Asteroid hit box depth below its y coordinate
    pub const OBSTACLE_HIT_DEPTH: f32 = 100.0;
    /// Asteroids alive at any time during a session
    pub const OBSTACLE_COUNT: usize = 4;
    /// Starting heights of the asteroids, all above the screen
    pub const OBSTACLE_START_Y: [f32; OBSTACLE_COUNT] = [-100.0, -300.0, -500.0, -700.0];
    /// Height an asteroid is moved back to after leaving the screen
    pub const OBSTACLE_RESPAWN_Y: f32 = -100.0;

    /// Coin sprite size (square)
    pub const COIN_SIZE: f32 = 120.0;
    /// Coin hit box width (narrower than the sprite)
    pub const COIN_HIT_WIDTH: f32 = 100.0;
    /// Coin hit box depth below its y coordinate
    pub const COIN_HIT_DEPTH: f32 = 100.0;

    /// Fall speed at session start (pixels per tick)
    pub const INITIAL_SPEED: f32 = 35.0;
    /// Speed added by the difficulty step
    pub const SPEED_STEP: f32 = 2.0;
    /// Difficulty only steps while speed is below this
    pub const SPEED_CEILING: f32 = 20.0;
    /// Difficulty steps on positive multiples of this score
    pub const SPEED_STEP_SCORE: u64 = 10;

    /// Points for an asteroid leaving the screen
    pub const RECYCLE_POINTS: u64 = 1;
    /// Points for a collected coin
    pub const COIN_POINTS: u64 = 5;

    /// Wall-clock time between coin batches
    pub const SPAWN_INTERVAL_MS: u64 = 3000;
    /// Coins per batch (inclusive)
    pub const SPAWN_MIN_COINS: i32 = 1;
    pub const SPAWN_MAX_COINS: i32 = 4;
    /// Coins spawn at least this far left of the right edge and above the top edge
    pub const COIN_SPAWN_MARGIN: i32 = 100;
}
