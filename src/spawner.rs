//! Periodic coin spawning
//!
//! A timer thread wakes every interval (wall clock, independent of the
//! tick rate) and sends a batch of coins to the loop thread over a channel.
//! The loop thread is the only one that ever touches the coin list.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::{Coin, RangeRng, Viewport};

/// Coins produced by one timer firing
#[derive(Debug, Clone)]
pub struct CoinBatch {
    /// Session generation the spawner was started for
    pub generation: u64,
    pub coins: Vec<Coin>,
}

/// Generate 1-4 coins above the visible area.
///
/// x is in `[0, width - 100)`, y in `[-height, -100)`.
pub fn spawn_batch(rng: &mut impl RangeRng, viewport: Viewport) -> Vec<Coin> {
    let count = rng.uniform(SPAWN_MIN_COINS, SPAWN_MAX_COINS);
    let width = viewport.width_i32();
    let height = viewport.height_i32();
    (0..count)
        .map(|_| {
            let x = rng.span(0, width - COIN_SPAWN_MARGIN);
            let y = rng.span(-height, -COIN_SPAWN_MARGIN);
            Coin::new(x as f32, y as f32)
        })
        .collect()
}

/// State the spawner reads at fire time, published by the loop thread
#[derive(Debug)]
pub struct SpawnContext {
    game_over: AtomicBool,
    width: AtomicU32,
    height: AtomicU32,
}

impl SpawnContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            game_over: AtomicBool::new(false),
            width: AtomicU32::new(viewport.width),
            height: AtomicU32::new(viewport.height),
        }
    }

    pub fn set_game_over(&self, game_over: bool) {
        self.game_over.store(game_over, Ordering::Release);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::Acquire)
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.width.store(viewport.width, Ordering::Release);
        self.height.store(viewport.height, Ordering::Release);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width.load(Ordering::Acquire),
            self.height.load(Ordering::Acquire),
        )
    }
}

/// Handle to a running spawner timer. Cancelled on drop.
pub struct Spawner {
    generation: u64,
    cancel: Option<SyncSender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spawner {
    /// Arm the timer. The first batch arrives one full interval from now.
    pub fn start(
        generation: u64,
        interval: Duration,
        ctx: Arc<SpawnContext>,
        mut rng: Pcg32,
        out: Sender<CoinBatch>,
    ) -> io::Result<Self> {
        let (cancel_tx, cancel_rx) = mpsc::sync_channel::<()>(1);

        let handle = thread::Builder::new()
            .name(format!("coin-spawner-{generation}"))
            .spawn(move || {
                loop {
                    match cancel_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    // Checked when the timer fires, not ahead of time
                    if ctx.is_game_over() {
                        log::debug!("Spawner {generation}: game over, stopping");
                        break;
                    }

                    let coins = spawn_batch(&mut rng, ctx.viewport());
                    log::debug!("Spawner {generation}: {} coins", coins.len());
                    if out.send(CoinBatch { generation, coins }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            generation,
            cancel: Some(cancel_tx),
            handle: Some(handle),
        })
    }

    /// True once the timer thread has exited (cancelled or self-stopped)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the timer and wait for its thread. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // Full or disconnected both mean the thread is already on its way out
            let _ = cancel.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Spawner {} thread panicked", self.generation);
            }
        }
    }
}

impl Drop for Spawner {
    fn drop(&mut self) {
        self.cancel();
    }
}
