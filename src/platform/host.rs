//! Host lifecycle glue
//!
//! Maps the host's surface and visibility callbacks onto the session and
//! its loop thread. At most one loop runs per surface lifetime.

use std::sync::Arc;

use crate::driver::{GameLoop, LoopError};
use crate::session::Session;
use crate::sim::Viewport;

use super::input::HostInput;
use super::surface::Surface;

enum Slot {
    /// Session waiting for a surface
    Idle(Session),
    /// Session is inside the loop thread
    Running(GameLoop),
    /// Loop thread panicked and took the session with it
    Lost,
}

pub struct Host {
    input: Arc<HostInput>,
    slot: Slot,
}

impl Host {
    pub fn new(session: Session) -> Self {
        Self {
            input: Arc::clone(session.input()),
            slot: Slot::Idle(session),
        }
    }

    /// Shared input handle for the host's event dispatch
    pub fn input(&self) -> Arc<HostInput> {
        Arc::clone(&self.input)
    }

    pub fn is_running(&self) -> bool {
        matches!(&self.slot, Slot::Running(game_loop) if game_loop.is_running())
    }

    /// The session, while no loop owns it
    pub fn session(&self) -> Option<&Session> {
        match &self.slot {
            Slot::Idle(session) => Some(session),
            _ => None,
        }
    }

    /// Surface is ready: start music, spawner and the loop thread
    pub fn surface_created<S: Surface + 'static>(
        &mut self,
        surface: S,
        viewport: Viewport,
    ) -> Result<(), LoopError> {
        let mut session = match std::mem::replace(&mut self.slot, Slot::Lost) {
            Slot::Idle(session) => session,
            Slot::Running(game_loop) => {
                self.slot = Slot::Running(game_loop);
                log::warn!("Surface created while the loop is already running");
                return Err(LoopError::AlreadyRunning);
            }
            Slot::Lost => return Err(LoopError::Panicked),
        };

        session.resize(viewport);
        session.start();
        match GameLoop::start(session, surface) {
            Ok(game_loop) => {
                self.slot = Slot::Running(game_loop);
                Ok(())
            }
            Err(failed) => {
                let mut session = failed.session;
                session.shutdown();
                self.slot = Slot::Idle(session);
                Err(failed.error)
            }
        }
    }

    /// Surface size or orientation changed
    pub fn surface_changed(&mut self, viewport: Viewport) {
        match &mut self.slot {
            Slot::Idle(session) => session.resize(viewport),
            _ => self.input.resize(viewport.width, viewport.height),
        }
    }

    /// Surface is going away: stop the loop and wait for it
    pub fn surface_destroyed(&mut self) -> Result<(), LoopError> {
        self.stop_loop()
    }

    /// Host lost visibility/focus
    pub fn pause(&mut self) -> Result<(), LoopError> {
        self.stop_loop()
    }

    pub fn pointer_moved(&self, x: f32, y: f32) {
        self.input.move_to(x, y);
    }

    /// Touch down: moves the ship while playing, restarts after game over
    pub fn pointer_down(&self, x: f32, y: f32) {
        self.input.move_to(x, y);
        self.input.tap();
    }

    fn stop_loop(&mut self) -> Result<(), LoopError> {
        match std::mem::replace(&mut self.slot, Slot::Lost) {
            Slot::Running(game_loop) => match game_loop.join() {
                Ok(session) => {
                    self.slot = Slot::Idle(session);
                    Ok(())
                }
                Err(e) => {
                    log::error!("Game loop ended abnormally: {}", e);
                    Err(e)
                }
            },
            other => {
                self.slot = other;
                Ok(())
            }
        }
    }
}
