//! Sound cue dispatch
//!
//! The simulator only emits events; this turns the ones with a sound into
//! cues for whatever audio backend the host plugs in.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Car parked in the right garage
    Happy,
    /// Car drove into the wrong garage
    Sad,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Match { .. } => Some(SoundEffect::Happy),
            GameEvent::Mismatch { .. } => Some(SoundEffect::Sad),
            _ => None,
        }
    }

    /// File a host would load for this cue
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Happy => "car_happy.ogg",
            SoundEffect::Sad => "car_sad.ogg",
        }
    }
}

/// Audio backend supplied by the host
pub trait AudioSink {
    /// Play a cue at `volume` (0.0 - 1.0, never called with 0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("Sound: {} at {:.2}", effect.asset_name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with volumes taken from settings
    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        let mut manager = Self::new(sink);
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the cues for one tick's events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CarColor, Lane};

    #[derive(Default)]
    struct Recorder(Vec<(SoundEffect, f32)>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.push((effect, volume));
        }
    }

    fn events() -> Vec<GameEvent> {
        let lane = Lane::new(1, 5).unwrap();
        vec![
            GameEvent::Match {
                lane,
                color: CarColor::Blue,
                score: 1,
            },
            GameEvent::NewHighScore { score: 1 },
            GameEvent::Paused,
            GameEvent::Mismatch {
                lane,
                car: CarColor::Red,
                garage: CarColor::Blue,
                score: 1,
            },
        ]
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&events());
        let played: Vec<_> = audio.sink().0.iter().map(|(e, _)| *e).collect();
        assert_eq!(played, vec![SoundEffect::Happy, SoundEffect::Sad]);
    }

    #[test]
    fn test_volume_from_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        let mut audio = AudioManager::from_settings(Recorder::default(), &settings);
        audio.play(SoundEffect::Happy);
        assert_eq!(audio.sink().0, vec![(SoundEffect::Happy, 0.25)]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.handle_events(&events());
        assert!(audio.sink().0.is_empty());
    }
}
