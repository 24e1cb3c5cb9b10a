//! Audio triggers
//!
//! The game only decides *when* sounds play. Mixing and playback belong to a
//! backend supplied by the host; `AudioManager` applies volume settings and
//! tracks whether the background track is looping.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ship hit an asteroid
    Collision,
    /// Coin collected
    CoinPickup,
}

/// Playback device supplied by the host
pub trait AudioBackend: Send {
    /// Fire-and-forget one-shot effect
    fn play_one_shot(&mut self, effect: SoundEffect, volume: f32);
    /// Start looping the background track from the beginning
    fn start_music(&mut self, volume: f32);
    /// Stop and release the background track
    fn stop_music(&mut self);
}

/// Backend that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_one_shot(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn start_music(&mut self, _volume: f32) {}
    fn stop_music(&mut self) {}
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioBackend for LogAudio {
    fn play_one_shot(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }

    fn start_music(&mut self, volume: f32) {
        log::debug!("music start @ {:.2}", volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stop");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>, settings: &Settings) -> Self {
        Self {
            backend,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            music_playing: false,
        }
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.sfx_gain();
        if vol <= 0.0 {
            return;
        }
        self.backend.play_one_shot(effect, vol);
    }

    /// Loop the background track, restarting it if already playing
    pub fn start_music(&mut self) {
        if self.music_playing {
            self.stop_music();
        }
        let vol = self.music_gain();
        if vol <= 0.0 {
            return;
        }
        self.backend.start_music(vol);
        self.music_playing = true;
    }

    pub fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.backend.stop_music();
        self.music_playing = false;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Sfx(SoundEffect, f32),
        MusicStart(f32),
        MusicStop,
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Call>>>);

    impl AudioBackend for Recorder {
        fn play_one_shot(&mut self, effect: SoundEffect, volume: f32) {
            self.0.lock().unwrap().push(Call::Sfx(effect, volume));
        }
        fn start_music(&mut self, volume: f32) {
            self.0.lock().unwrap().push(Call::MusicStart(volume));
        }
        fn stop_music(&mut self) {
            self.0.lock().unwrap().push(Call::MusicStop);
        }
    }

    fn manager(settings: &Settings) -> (AudioManager, Recorder) {
        let rec = Recorder::default();
        (AudioManager::new(Box::new(rec.clone()), settings), rec)
    }

    #[test]
    fn test_volumes_multiply() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            music_volume: 1.0,
            ..Default::default()
        };
        let (mut audio, rec) = manager(&settings);
        audio.play(SoundEffect::CoinPickup);
        audio.start_music();
        assert_eq!(
            *rec.0.lock().unwrap(),
            vec![Call::Sfx(SoundEffect::CoinPickup, 0.25), Call::MusicStart(0.5)]
        );
    }

    #[test]
    fn test_muted_forwards_nothing() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let (mut audio, rec) = manager(&settings);
        audio.play(SoundEffect::Collision);
        audio.start_music();
        assert!(rec.0.lock().unwrap().is_empty());
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_restart_music_stops_first() {
        let (mut audio, rec) = manager(&Settings::default());
        audio.start_music();
        audio.start_music();
        audio.stop_music();
        audio.stop_music();
        let calls = rec.0.lock().unwrap();
        assert!(matches!(
            calls.as_slice(),
            [Call::MusicStart(_), Call::MusicStop, Call::MusicStart(_), Call::MusicStop]
        ));
    }
}
