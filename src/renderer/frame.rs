//! Per-frame drawable list
//!
//! Copies what a frame needs out of the game state so the surface can draw
//! without holding on to simulation data.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{GamePhase, GameState};

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Ship,
    Asteroid,
    Coin,
}

/// Screen-space rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `anchor` is the baseline start
    Left,
    /// `anchor.x` is the horizontal center of the line
    Center,
}

/// A line of HUD text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub anchor: Vec2,
    pub align: TextAlign,
}

/// Everything to draw for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Drawn in order: ship, asteroids, coins
    pub sprites: Vec<Sprite>,
    /// Score lines while playing, game over prompt otherwise
    pub hud: Vec<TextLine>,
    pub score: u64,
    pub best_score: u64,
    pub game_over: bool,
}

impl Frame {
    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind).count()
    }
}

/// HUD placement (pixels)
const HUD_LEFT: f32 = 50.0;
const HUD_SCORE_Y: f32 = 100.0;
const HUD_BEST_Y: f32 = 200.0;
const HUD_PROMPT_GAP: f32 = 100.0;

/// Build the drawable list for the current state
pub fn build_frame(state: &GameState) -> Frame {
    let mut sprites = Vec::with_capacity(1 + state.obstacles.len() + state.coins.len());

    let half = Vec2::splat(SHIP_HALF_EXTENT);
    sprites.push(Sprite {
        kind: SpriteKind::Ship,
        bounds: Rect::new(state.ship.pos - half, half * 2.0),
    });

    for obstacle in &state.obstacles {
        sprites.push(Sprite {
            kind: SpriteKind::Asteroid,
            bounds: Rect::new(obstacle.pos, Vec2::splat(OBSTACLE_SIZE)),
        });
    }

    for coin in &state.coins {
        sprites.push(Sprite {
            kind: SpriteKind::Coin,
            bounds: Rect::new(coin.pos, Vec2::splat(COIN_SIZE)),
        });
    }

    let game_over = state.phase == GamePhase::GameOver;
    let hud = if game_over {
        let center_x = state.viewport.width as f32 / 2.0;
        let center_y = state.viewport.height as f32 / 2.0;
        vec![
            TextLine {
                text: "Game Over".to_string(),
                anchor: Vec2::new(center_x, center_y),
                align: TextAlign::Center,
            },
            TextLine {
                text: "Tap to Restart".to_string(),
                anchor: Vec2::new(center_x, center_y + HUD_PROMPT_GAP),
                align: TextAlign::Center,
            },
        ]
    } else {
        vec![
            TextLine {
                text: format!("Score: {}", state.score),
                anchor: Vec2::new(HUD_LEFT, HUD_SCORE_Y),
                align: TextAlign::Left,
            },
            TextLine {
                text: format!("Best Score: {}", state.best.get()),
                anchor: Vec2::new(HUD_LEFT, HUD_BEST_Y),
                align: TextAlign::Left,
            },
        ]
    };

    Frame {
        sprites,
        hud,
        score: state.score,
        best_score: state.best.get(),
        game_over,
    }
}
