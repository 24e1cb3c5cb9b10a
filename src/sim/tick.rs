//! Per-iteration simulation tick
//!
//! Order matters: the collision scan runs against last tick's positions,
//! then asteroids and coins advance, then difficulty is checked.

use super::collision::{ship_hits_coin, ship_hits_obstacle};
use super::rng::RangeRng;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the game state by one tick. No-op once the game is over.
pub fn tick(state: &mut GameState, rng: &mut impl RangeRng) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    let ship = state.ship.pos;
    if state
        .obstacles
        .iter()
        .any(|o| ship_hits_obstacle(ship, o.pos))
    {
        // Nothing moves on the tick the ship is hit
        end_session(state);
        return;
    }

    advance_obstacles(state, rng);
    advance_coins(state);
    scale_difficulty(state);
}

/// Transition to GameOver and settle the best score
fn end_session(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::Collision);

    let score = state.score;
    if state.best.record(score) {
        state.push_event(GameEvent::NewBest(score));
    }
    state.push_event(GameEvent::GameOver { score });
    log::info!(
        "Game over at tick {}: score {}, best {}",
        state.time_ticks,
        score,
        state.best.get()
    );
}

/// Move asteroids down; anything past the bottom goes back to the top for a point
fn advance_obstacles(state: &mut GameState, rng: &mut impl RangeRng) {
    let height = state.viewport.height as f32;
    let speed = state.speed;
    let mut recycled = 0;

    for i in 0..state.obstacles.len() {
        let mut pos = state.obstacles[i].pos;
        pos.y += speed;
        if pos.y > height {
            pos.y = OBSTACLE_RESPAWN_Y;
            pos.x = state.random_obstacle_x(rng);
            recycled += 1;
        }
        state.obstacles[i].pos = pos;
    }

    for _ in 0..recycled {
        state.score += RECYCLE_POINTS;
        state.push_event(GameEvent::ObstacleRecycled);
    }
}

/// Move coins down, dropping missed ones and collecting those the ship touches
fn advance_coins(state: &mut GameState) {
    let height = state.viewport.height as f32;
    let speed = state.speed;
    let ship = state.ship.pos;
    let mut collected = 0;

    state.coins.retain_mut(|coin| {
        coin.pos.y += speed;
        if coin.pos.y > height {
            false
        } else if ship_hits_coin(ship, coin.pos) {
            collected += 1;
            false
        } else {
            true
        }
    });

    for _ in 0..collected {
        state.score += COIN_POINTS;
        state.push_event(GameEvent::CoinCollected);
    }
}

/// Speed up on positive multiples of ten while below the ceiling.
///
/// Speed starts at 35, above the ceiling of 20, so this never fires in
/// practice. Kept as-is until the intended thresholds are settled.
fn scale_difficulty(state: &mut GameState) {
    if state.score > 0 && state.score % SPEED_STEP_SCORE == 0 && state.speed < SPEED_CEILING {
        state.speed += SPEED_STEP;
        log::debug!("Speed up to {}", state.speed);
    }
}
