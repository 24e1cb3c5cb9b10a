//! Star Dodge entry point
//!
//! Runs a complete session headlessly: a simulated display, an autopilot
//! feeding pointer input, and the real loop and spawner threads.
//!
//! Environment:
//! - `STAR_DODGE_FRAMES`: frames to run (default 600)
//! - `STAR_DODGE_SETTINGS`: settings file (default `star_dodge_settings.json`)

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec2;

use star_dodge::audio::LogAudio;
use star_dodge::consts::{OBSTACLE_HIT_WIDTH, SHIP_HALF_EXTENT, SHIP_HIT_REACH_X};
use star_dodge::persistence::JsonFileStore;
use star_dodge::platform::{HeadlessSurface, Host, HostInput};
use star_dodge::renderer::{Frame, SpriteKind};
use star_dodge::sim::Viewport;
use star_dodge::{Session, Settings};

const DEFAULT_FRAMES: u64 = 600;
/// Simulated display refresh (~60 Hz)
const REFRESH: Duration = Duration::from_millis(16);
/// Candidate ship columns the autopilot considers
const LANE_STEP: f32 = 40.0;
/// How far above the ship the autopilot looks for asteroids
const LOOKAHEAD: f32 = 700.0;

fn main() {
    env_logger::init();
    log::info!("Star Dodge (headless) starting...");

    let settings_path = std::env::var_os("STAR_DODGE_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("star_dodge_settings.json"));
    let settings = Settings::load(&settings_path);
    let frames = std::env::var("STAR_DODGE_FRAMES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let viewport = Viewport::new(1080, 1920);
    let input = Arc::new(HostInput::new());
    let store = JsonFileStore::new(&settings.best_score_path);
    log::info!("Best score file: {}", store.path().display());
    let session = Session::new(
        &settings,
        viewport,
        Box::new(store),
        Box::new(LogAudio),
        Arc::clone(&input),
    );
    let mut host = Host::new(session);

    let (surface, monitor) = HeadlessSurface::new(Some(REFRESH));
    if let Err(e) = host.surface_created(surface, viewport) {
        log::error!("Could not start the game loop: {}", e);
        std::process::exit(1);
    }

    let mut games = 1u32;
    let mut was_over = false;
    let mut last_report = 0u64;
    while monitor.frames() < frames {
        thread::sleep(REFRESH / 2);
        let Some(frame) = monitor.latest() else {
            continue;
        };

        if frame.game_over {
            if !was_over {
                log::info!("Game {} over with {} points", games, frame.score);
                games += 1;
            }
            let center = Vec2::new(viewport.width as f32, viewport.height as f32) / 2.0;
            host.pointer_down(center.x, center.y);
        } else {
            let target = steer(&frame, viewport);
            host.pointer_moved(target.x, target.y);
        }
        was_over = frame.game_over;

        let shown = monitor.frames();
        if shown >= last_report + 120 {
            last_report = shown;
            log::info!(
                "frame {}: score {}, best {}, coins on screen {}",
                shown,
                frame.score,
                frame.best_score,
                frame.count(SpriteKind::Coin)
            );
        }
    }

    if let Err(e) = host.surface_destroyed() {
        log::error!("Game loop did not shut down cleanly: {}", e);
    }

    if let Some(session) = host.session() {
        let state = session.state();
        println!(
            "Played {} frames over {} game(s): score {}, best {}",
            monitor.frames(),
            games,
            state.score,
            state.best.get()
        );
    }
}

/// Pick a pointer position that keeps the ship out of falling asteroids,
/// drifting toward coins when the way is clear.
fn steer(frame: &Frame, viewport: Viewport) -> Vec2 {
    let Some(ship) = frame.sprites.iter().find(|s| s.kind == SpriteKind::Ship) else {
        return Vec2::ZERO;
    };
    let ship_pos = ship.bounds.min + Vec2::splat(SHIP_HALF_EXTENT);
    let cruise_y = viewport.height as f32 * 0.75;

    let danger = |x: f32| -> f32 {
        frame
            .sprites
            .iter()
            .filter(|s| s.kind == SpriteKind::Asteroid)
            .filter(|s| {
                s.bounds.max().y > ship_pos.y - LOOKAHEAD
                    && s.bounds.min.y < ship_pos.y + SHIP_HALF_EXTENT
            })
            .filter(|s| {
                x + SHIP_HIT_REACH_X + LANE_STEP > s.bounds.min.x
                    && x < s.bounds.min.x + OBSTACLE_HIT_WIDTH + LANE_STEP
            })
            .map(|s| s.bounds.max().y)
            .fold(0.0, f32::max)
    };
    let coin_x = frame
        .sprites
        .iter()
        .filter(|s| s.kind == SpriteKind::Coin && s.bounds.min.y > 0.0)
        .map(|s| s.bounds.min.x)
        .min_by(|a, b| (a - ship_pos.x).abs().total_cmp(&(b - ship_pos.x).abs()));
    let goal_x = coin_x.unwrap_or(ship_pos.x);

    let lanes = (viewport.width as f32 / LANE_STEP) as u32;
    let best = (0..=lanes)
        .map(|i| i as f32 * LANE_STEP)
        .min_by(|a, b| {
            let score = |x: f32| danger(x) * 10.0 + (x - goal_x).abs();
            score(*a).total_cmp(&score(*b))
        })
        .unwrap_or(ship_pos.x);

    // Move a bounded step per frame, like a finger dragging across the screen
    let step = (best - ship_pos.x).clamp(-LANE_STEP * 2.0, LANE_STEP * 2.0);
    Vec2::new(ship_pos.x + step, cruise_y)
}
