//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of threads,
//! audio and rendering:
//! - One call to `tick` per loop iteration
//! - Randomness only through an injected `RangeRng`
//! - Side effects reported as `GameEvent`s

pub mod collision;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{ship_hits_coin, ship_hits_obstacle};
pub use rng::{RangeRng, seeded};
pub use state::{Coin, GameEvent, GamePhase, GameState, Obstacle, Ship, Viewport};
pub use tick::tick;
