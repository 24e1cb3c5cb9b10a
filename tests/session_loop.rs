//! End-to-end runs of a session on its loop thread

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use star_dodge::audio::{AudioBackend, SoundEffect};
use star_dodge::persistence::MemoryStore;
use star_dodge::platform::{HeadlessSurface, Host, HostInput, SurfaceMonitor};
use star_dodge::renderer::{Frame, SpriteKind};
use star_dodge::sim::Viewport;
use star_dodge::{Session, Settings};

#[derive(Debug, Clone, PartialEq)]
enum Played {
    Effect(SoundEffect),
    MusicStart,
    MusicStop,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Played>>>);

impl Recorder {
    fn played(&self) -> Vec<Played> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, item: &Played) -> usize {
        self.played().iter().filter(|p| *p == item).count()
    }
}

impl AudioBackend for Recorder {
    fn play_one_shot(&mut self, effect: SoundEffect, _volume: f32) {
        self.0.lock().unwrap().push(Played::Effect(effect));
    }

    fn start_music(&mut self, _volume: f32) {
        self.0.lock().unwrap().push(Played::MusicStart);
    }

    fn stop_music(&mut self) {
        self.0.lock().unwrap().push(Played::MusicStop);
    }
}

const VIEWPORT: Viewport = Viewport {
    width: 1000,
    height: 2000,
};

fn host(spawn_interval_ms: u64, store: MemoryStore, audio: Recorder) -> Host {
    let settings = Settings {
        seed: Some(42),
        spawn_interval_ms,
        ..Default::default()
    };
    Host::new(Session::new(
        &settings,
        VIEWPORT,
        Box::new(store),
        Box::new(audio),
        Arc::new(HostInput::new()),
    ))
}

/// Poll the latest frame until `done` holds, or give up after 10 seconds
fn wait_for(monitor: &SurfaceMonitor, mut done: impl FnMut(&Frame) -> bool) -> Option<Frame> {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if let Some(frame) = monitor.latest() {
            if done(&frame) {
                return Some(frame);
            }
        }
        thread::sleep(Duration::from_millis(1));
    }
    None
}

#[test]
fn crash_persists_best_and_tap_restarts() {
    let store = MemoryStore::default();
    let audio = Recorder::default();
    let mut host = host(60_000, store.clone(), audio.clone());
    let (surface, monitor) = HeadlessSurface::new(Some(Duration::from_millis(1)));
    host.surface_created(surface, VIEWPORT).unwrap();

    // Keep clear of every asteroid column until something has been recycled
    host.pointer_moved(-10_000.0, 1000.0);
    wait_for(&monitor, |f| f.score >= 1).expect("no asteroid was recycled");

    // Then park the ship in the column of an asteroid that is still high up
    let mut column = None;
    let over = wait_for(&monitor, |f| {
        if f.game_over {
            return true;
        }
        if column.is_none() {
            column = f
                .sprites
                .iter()
                .find(|s| s.kind == SpriteKind::Asteroid && s.bounds.min.y < 1000.0)
                .map(|a| a.bounds.min.x + 100.0);
            if let Some(x) = column {
                host.pointer_moved(x, 1800.0);
            }
        }
        false
    })
    .expect("ship never collided");

    assert!(over.score >= 1);
    assert_eq!(over.best_score, over.score);
    assert_eq!(over.hud[0].text, "Game Over");
    assert_eq!(store.best(), over.score);
    assert_eq!(store.writes(), 1);
    assert_eq!(audio.count(&Played::Effect(SoundEffect::Collision)), 1);
    // Background track is still looping on the Game Over screen
    assert_eq!(audio.count(&Played::MusicStop), 0);

    host.pointer_down(500.0, 1000.0);
    let resumed = wait_for(&monitor, |f| !f.game_over).expect("tap did not restart");
    assert_eq!(resumed.best_score, over.score);
    assert_eq!(resumed.count(SpriteKind::Asteroid), 4);
    assert_eq!(resumed.count(SpriteKind::Coin), 0);
    // Restart rewinds the track: stop, then start from the beginning
    assert_eq!(
        audio.played(),
        vec![
            Played::MusicStart,
            Played::Effect(SoundEffect::Collision),
            Played::MusicStop,
            Played::MusicStart,
        ]
    );

    host.surface_destroyed().unwrap();
    assert!(!host.is_running());
    let session = host.session().unwrap();
    assert!(!session.is_music_playing());
    assert!(!session.spawner_running());
}

#[test]
fn spawned_coins_reach_the_screen() {
    let mut host = host(20, MemoryStore::default(), Recorder::default());
    let (surface, monitor) = HeadlessSurface::new(Some(Duration::from_millis(1)));
    host.surface_created(surface, VIEWPORT).unwrap();
    host.pointer_moved(-10_000.0, 1000.0);

    let frame = wait_for(&monitor, |f| f.count(SpriteKind::Coin) > 0).expect("no coins arrived");
    for coin in frame.sprites.iter().filter(|s| s.kind == SpriteKind::Coin) {
        assert!(coin.bounds.min.x >= 0.0 && coin.bounds.min.x < 900.0);
    }

    host.surface_destroyed().unwrap();
}

#[test]
fn resize_while_running_reaches_the_loop() {
    let mut host = host(60_000, MemoryStore::default(), Recorder::default());
    let (surface, monitor) = HeadlessSurface::new(Some(Duration::from_millis(1)));
    host.surface_created(surface, VIEWPORT).unwrap();
    host.pointer_moved(-10_000.0, 1000.0);
    wait_for(&monitor, |_| true).expect("loop never presented");

    host.surface_changed(Viewport::new(720, 1280));
    // Two more presents guarantee one full update ran after the change
    let seen = monitor.frames();
    let deadline = Instant::now() + Duration::from_secs(10);
    while monitor.frames() < seen + 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }

    host.surface_destroyed().unwrap();
    let session = host.session().unwrap();
    assert_eq!(session.state().viewport, Viewport::new(720, 1280));
}
