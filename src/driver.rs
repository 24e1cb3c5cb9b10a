//! Game loop driver
//!
//! A dedicated thread runs lock → update → present as fast as the surface
//! allows, with no frame cap of its own. The owner stops it with a flag that
//! is checked once per iteration and waits for it with a bounded, retried
//! join. The session travels into the thread and comes back out on join.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::platform::Surface;
use crate::session::Session;

/// How long each join attempt waits before logging and retrying
const JOIN_RETRY: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum LoopError {
    /// A loop is already running for this surface
    AlreadyRunning,
    /// The OS refused to create the loop thread
    Spawn(io::Error),
    /// The loop thread panicked; its session is lost
    Panicked,
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::AlreadyRunning => write!(f, "game loop already running"),
            LoopError::Spawn(e) => write!(f, "failed to spawn game loop thread: {e}"),
            LoopError::Panicked => write!(f, "game loop thread panicked"),
        }
    }
}

impl std::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoopError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

/// Failed start. The session is handed back untouched.
pub struct StartError {
    pub error: LoopError,
    pub session: Session,
}

impl fmt::Debug for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartError").field("error", &self.error).finish()
    }
}

/// Handle to a running loop thread
pub struct GameLoop {
    running: Arc<AtomicBool>,
    /// Disconnects when the loop thread exits, including by panic
    exited: Receiver<()>,
    handle: Option<JoinHandle<Option<Session>>>,
}

impl GameLoop {
    /// Spawn the loop thread. `Session::start` should already have been called.
    pub fn start<S: Surface + 'static>(
        session: Session,
        mut surface: S,
    ) -> Result<Self, StartError> {
        let running = Arc::new(AtomicBool::new(true));
        let (session_tx, session_rx) = mpsc::channel::<Session>();
        let (exit_tx, exited) = mpsc::channel::<()>();

        let flag = Arc::clone(&running);
        let spawned = thread::Builder::new()
            .name("game-loop".to_string())
            .spawn(move || {
                let _exit_guard = exit_tx;
                let mut session = session_rx.recv().ok()?;
                log::info!("Game loop running");

                let mut frames: u64 = 0;
                while flag.load(Ordering::Acquire) {
                    if !surface.acquire() {
                        log::trace!("Surface unavailable, skipping iteration");
                        continue;
                    }
                    session.update();
                    surface.present(&session.frame());
                    frames += 1;
                }

                session.shutdown();
                log::info!("Game loop exited after {} frames", frames);
                Some(session)
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                return Err(StartError {
                    error: LoopError::Spawn(e),
                    session,
                });
            }
        };

        if let Err(mpsc::SendError(session)) = session_tx.send(session) {
            // Receiver only goes away if the thread died before reading
            let _ = handle.join();
            return Err(StartError {
                error: LoopError::Panicked,
                session,
            });
        }

        Ok(Self {
            running,
            exited,
            handle: Some(handle),
        })
    }

    /// Ask the loop to exit after its current iteration
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the loop and wait for it to exit, returning the session.
    ///
    /// Waits in bounded slices and retries until the thread is gone; the
    /// wait is never abandoned.
    pub fn join(mut self) -> Result<Session, LoopError> {
        self.stop();
        self.wait_for_exit();
        let handle = self.handle.take().ok_or(LoopError::Panicked)?;
        match handle.join() {
            Ok(Some(session)) => Ok(session),
            Ok(None) | Err(_) => Err(LoopError::Panicked),
        }
    }

    fn wait_for_exit(&self) {
        let mut attempts: u32 = 0;
        loop {
            match self.exited.recv_timeout(JOIN_RETRY) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    attempts += 1;
                    log::debug!("Waiting for game loop to exit (attempt {})", attempts);
                }
            }
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.stop();
            self.wait_for_exit();
            if handle.join().is_err() {
                log::warn!("Game loop thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::persistence::MemoryStore;
    use crate::platform::{HeadlessSurface, HostInput};
    use crate::renderer::Frame;
    use crate::settings::Settings;
    use crate::sim::Viewport;
    use std::time::Instant;

    fn session() -> Session {
        let settings = Settings {
            seed: Some(5),
            ..Default::default()
        };
        Session::new(
            &settings,
            Viewport::new(1000, 2000),
            Box::new(MemoryStore::default()),
            Box::new(NullAudio),
            Arc::new(HostInput::new()),
        )
    }

    fn wait_for_frames(monitor: &crate::platform::SurfaceMonitor, n: u64) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while monitor.frames() < n && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_loop_runs_until_joined() {
        let (surface, monitor) = HeadlessSurface::new(Some(Duration::from_millis(1)));
        let game_loop = GameLoop::start(session(), surface).unwrap();
        wait_for_frames(&monitor, 3);
        assert!(game_loop.is_running());

        let session = game_loop.join().unwrap();
        let frames = monitor.frames();
        assert!(frames >= 3);
        assert!(session.state().time_ticks >= 3);

        // Nothing is presented after join returns
        thread::sleep(Duration::from_millis(20));
        assert_eq!(monitor.frames(), frames);
    }

    struct FlakySurface {
        calls: u32,
        presented: Arc<std::sync::atomic::AtomicU32>,
    }

    impl Surface for FlakySurface {
        fn acquire(&mut self) -> bool {
            self.calls += 1;
            thread::sleep(Duration::from_millis(1));
            self.calls % 2 == 0
        }

        fn present(&mut self, _frame: &Frame) {
            self.presented.fetch_add(1, Ordering::AcqRel);
        }
    }

    #[test]
    fn test_unavailable_surface_skips_iteration() {
        let presented = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let surface = FlakySurface {
            calls: 0,
            presented: Arc::clone(&presented),
        };
        let mut session = session();
        // Park the ship left of every asteroid column so the game never ends
        session.state_mut().ship.pos = glam::Vec2::new(-10_000.0, 0.0);
        let game_loop = GameLoop::start(session, surface).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while presented.load(Ordering::Acquire) < 4 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        let session = game_loop.join().unwrap();
        // Only iterations with a surface tick the simulation
        assert_eq!(session.state().time_ticks, presented.load(Ordering::Acquire) as u64);
    }

    struct SlowSurface {
        presented: Arc<std::sync::atomic::AtomicU32>,
    }

    impl Surface for SlowSurface {
        fn acquire(&mut self) -> bool {
            // Several join slices long
            thread::sleep(Duration::from_millis(350));
            true
        }

        fn present(&mut self, _frame: &Frame) {
            self.presented.fetch_add(1, Ordering::AcqRel);
        }
    }

    #[test]
    fn test_join_outlasts_slow_iteration() {
        let presented = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let surface = SlowSurface {
            presented: Arc::clone(&presented),
        };
        let mut session = session();
        session.state_mut().ship.pos = glam::Vec2::new(-10_000.0, 0.0);
        let game_loop = GameLoop::start(session, surface).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while presented.load(Ordering::Acquire) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }

        // The loop is now asleep in the next acquire, well past one wait slice
        let started = Instant::now();
        let session = game_loop.join().unwrap();
        assert!(started.elapsed() >= JOIN_RETRY);

        let frames = presented.load(Ordering::Acquire);
        assert_eq!(session.state().time_ticks, frames as u64);
        thread::sleep(Duration::from_millis(400));
        assert_eq!(presented.load(Ordering::Acquire), frames);
    }

    struct PanickingSurface;

    impl Surface for PanickingSurface {
        fn acquire(&mut self) -> bool {
            panic!("surface lost");
        }

        fn present(&mut self, _frame: &Frame) {}
    }

    #[test]
    fn test_panicking_loop_reports_error() {
        let game_loop = GameLoop::start(session(), PanickingSurface).unwrap();
        assert!(matches!(game_loop.join(), Err(LoopError::Panicked)));
    }
}
