//! Session controller
//!
//! Owns the game state and everything with side effects around it: the best
//! score store, audio, and the coin spawner. Runs on the loop thread; other
//! threads talk to it only through `HostInput` and the spawn channel.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use rand_pcg::Pcg32;

use crate::audio::{AudioBackend, AudioManager, SoundEffect};
use crate::highscores::BestScore;
use crate::persistence::ScoreStore;
use crate::platform::HostInput;
use crate::renderer::{Frame, build_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, RangeRng, Viewport, seeded, tick};
use crate::spawner::{CoinBatch, SpawnContext, Spawner};

pub struct Session {
    state: GameState,
    rng: Pcg32,
    store: Box<dyn ScoreStore>,
    audio: AudioManager,
    input: Arc<HostInput>,

    spawn_ctx: Arc<SpawnContext>,
    spawn_interval: Duration,
    spawner: Option<Spawner>,
    coin_tx: Sender<CoinBatch>,
    coin_rx: Receiver<CoinBatch>,
    /// Bumped on every restart; batches from older spawners are dropped
    generation: u64,
    /// Not started yet; the first start lays out for the real surface size
    fresh: bool,
}

impl Session {
    /// Build a session in `Playing` with asteroids seeded. Nothing runs until `start`.
    pub fn new(
        settings: &Settings,
        viewport: Viewport,
        store: Box<dyn ScoreStore>,
        audio: Box<dyn AudioBackend>,
        input: Arc<HostInput>,
    ) -> Self {
        let best = match store.load_best() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not read best score, starting from 0: {}", e);
                0
            }
        };

        let mut rng = seeded(settings.resolve_seed());
        let state = GameState::new(viewport, BestScore::new(best), &mut rng);
        let (coin_tx, coin_rx) = mpsc::channel();

        Self {
            state,
            rng,
            store,
            audio: AudioManager::new(audio, settings),
            input,
            spawn_ctx: Arc::new(SpawnContext::new(viewport)),
            spawn_interval: settings.spawn_interval(),
            spawner: None,
            coin_tx,
            coin_rx,
            generation: 0,
            fresh: true,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn input(&self) -> &Arc<HostInput> {
        &self.input
    }

    pub fn is_music_playing(&self) -> bool {
        self.audio.is_music_playing()
    }

    pub fn spawner_running(&self) -> bool {
        self.spawner.as_ref().is_some_and(|s| !s.is_finished())
    }

    /// Surface became available: loop the music and arm the spawner.
    ///
    /// The first start re-centers the ship and re-seeds asteroids for the
    /// current viewport; later starts (after a pause) resume where play left off.
    pub fn start(&mut self) {
        if self.fresh {
            self.state.reset(&mut self.rng);
            self.fresh = false;
        }
        log::info!(
            "Session start ({}x{}, best {})",
            self.state.viewport.width,
            self.state.viewport.height,
            self.state.best.get()
        );
        self.audio.start_music();
        self.rearm_spawner();
    }

    /// Surface gone or host paused: cancel the spawner and silence the music
    pub fn shutdown(&mut self) {
        if let Some(mut spawner) = self.spawner.take() {
            spawner.cancel();
        }
        self.audio.stop_music();
        log::info!("Session stopped (score {})", self.state.score);
    }

    /// GameOver → Playing with everything back at its starting position
    pub fn restart(&mut self) {
        self.state.reset(&mut self.rng);
        self.spawn_ctx.set_game_over(false);
        self.audio.start_music();
        self.rearm_spawner();
        log::info!("Session restarted (best {})", self.state.best.get());
    }

    /// Host reported a new surface size
    pub fn resize(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
        self.spawn_ctx.set_viewport(viewport);
    }

    /// One loop iteration's update: input, pending coins, tick, side effects
    pub fn update(&mut self) {
        self.apply_input();
        self.receive_coins();
        tick(&mut self.state, &mut self.rng);
        self.handle_events();
        self.spawn_ctx.set_game_over(self.state.is_game_over());
    }

    /// Drawable list for the current state
    pub fn frame(&self) -> Frame {
        build_frame(&self.state)
    }

    fn rearm_spawner(&mut self) {
        if let Some(mut old) = self.spawner.take() {
            old.cancel();
        }
        // Drop anything the old timer sent before it stopped
        while self.coin_rx.try_recv().is_ok() {}

        self.generation += 1;
        let rng = seeded(self.rng.uniform(0, i32::MAX) as u64 ^ self.generation);
        match Spawner::start(
            self.generation,
            self.spawn_interval,
            Arc::clone(&self.spawn_ctx),
            rng,
            self.coin_tx.clone(),
        ) {
            Ok(spawner) => self.spawner = Some(spawner),
            Err(e) => log::error!("Failed to start coin spawner: {}", e),
        }
    }

    fn apply_input(&mut self) {
        if let Some(viewport) = self.input.take_resize() {
            self.resize(viewport);
        }

        let tapped = self.input.take_tap();
        let pointer = self.input.take_pointer();

        match self.state.phase {
            GamePhase::GameOver => {
                if tapped {
                    self.restart();
                }
            }
            GamePhase::Playing => {
                if let Some(pos) = pointer {
                    self.state.move_ship(pos);
                }
            }
        }
    }

    fn receive_coins(&mut self) {
        loop {
            match self.coin_rx.try_recv() {
                Ok(batch) => {
                    if batch.generation != self.generation || self.state.is_game_over() {
                        log::debug!("Dropping stale coin batch (gen {})", batch.generation);
                        continue;
                    }
                    self.state.coins.extend(batch.coins);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Collision => self.audio.play(SoundEffect::Collision),
                GameEvent::CoinCollected => self.audio.play(SoundEffect::CoinPickup),
                GameEvent::NewBest(best) => {
                    if let Err(e) = self.store.save_best(best) {
                        log::warn!("Failed to save best score {}: {}", best, e);
                    }
                }
                // The track keeps looping through GameOver; restart rewinds it
                GameEvent::GameOver { .. } | GameEvent::ObstacleRecycled => {}
            }
        }
    }
}
