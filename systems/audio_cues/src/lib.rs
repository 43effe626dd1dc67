#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns level events into throttled audio cues.
//!
//! The system never touches an audio device. It tracks simulated time from
//! [`Event::TimeAdvanced`] and decides which sound effects and music
//! transitions an adapter should perform.

use std::{collections::BTreeMap, time::Duration};

use screamporium_core::{BlockId, Event, MusicCue};
use tracing::trace;

/// Minimum spacing between two plays of the same scare sound.
pub const SCARE_INTERVAL: Duration = Duration::from_secs(2);

/// Minimum spacing between two plays of a one-shot effect.
pub const EFFECT_INTERVAL: Duration = Duration::from_millis(250);

/// Playback state of the background track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MusicState {
    /// Nothing has been started yet.
    #[default]
    Stopped,
    /// The track is audible.
    Playing,
    /// The track is paused and can be resumed.
    Paused,
}

/// Instruction for the audio adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Play a named sound effect once.
    Sound {
        /// Asset name of the effect.
        name: String,
    },
    /// Start the background track from the beginning.
    StartMusic,
    /// Pause the background track.
    PauseMusic,
    /// Resume the paused background track.
    ResumeMusic,
}

/// Asset names the system refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundNames {
    /// Played when a block lands on the grid.
    pub placement: String,
    /// Played when a mob is scared to death.
    pub death: String,
    /// Scare sound per catalog entry, indexed by block id.
    pub scares: Vec<Option<String>>,
}

/// Audio cue system.
#[derive(Debug)]
pub struct AudioCues {
    names: SoundNames,
    clock: Duration,
    last_played: BTreeMap<String, Duration>,
    music: MusicState,
    music_enabled: bool,
}

impl AudioCues {
    /// Creates the system with music enabled and stopped.
    #[must_use]
    pub fn new(names: SoundNames) -> Self {
        Self {
            names,
            clock: Duration::ZERO,
            last_played: BTreeMap::new(),
            music: MusicState::Stopped,
            music_enabled: true,
        }
    }

    /// Current state of the background track.
    #[must_use]
    pub fn music(&self) -> MusicState {
        self.music
    }

    /// Whether music transitions are forwarded at all.
    #[must_use]
    pub fn is_music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// Enables or disables music. Disabled music ignores every music cue.
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
    }

    /// Consumes level events and appends the resulting cues to `out`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Cue>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.clock += *dt,
                Event::Music { cue } => self.music_cue(*cue, out),
                Event::BlockPlaced { .. } => {
                    let name = self.names.placement.clone();
                    self.play(name, EFFECT_INTERVAL, out);
                }
                Event::MobScaredToDeath { .. } => {
                    let name = self.names.death.clone();
                    self.play(name, EFFECT_INTERVAL, out);
                }
                Event::BlockScaring { block, .. } => {
                    if let Some(name) = self.scare_sound(*block) {
                        self.play(name, SCARE_INTERVAL, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn scare_sound(&self, block: BlockId) -> Option<String> {
        self.names
            .scares
            .get(usize::from(block.get()))
            .and_then(Option::clone)
    }

    fn play(&mut self, name: String, interval: Duration, out: &mut Vec<Cue>) {
        if let Some(last) = self.last_played.get(&name) {
            if self.clock.saturating_sub(*last) < interval {
                return;
            }
        }
        trace!(sound = %name, "sound cue");
        let _ = self.last_played.insert(name.clone(), self.clock);
        out.push(Cue::Sound { name });
    }

    fn music_cue(&mut self, cue: MusicCue, out: &mut Vec<Cue>) {
        if !self.music_enabled {
            return;
        }
        match (cue, self.music) {
            (MusicCue::Play, _) => {
                self.music = MusicState::Playing;
                out.push(Cue::StartMusic);
            }
            (MusicCue::Pause, MusicState::Playing) => {
                self.music = MusicState::Paused;
                out.push(Cue::PauseMusic);
            }
            (MusicCue::Resume, MusicState::Paused) => {
                self.music = MusicState::Playing;
                out.push(Cue::ResumeMusic);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_scare_sound_is_silent() {
        let mut cues = AudioCues::new(SoundNames {
            placement: "place-block".to_owned(),
            death: "no".to_owned(),
            scares: vec![None],
        });
        let mut out = Vec::new();
        cues.handle(
            &[Event::BlockScaring {
                anchor: screamporium_core::GridPos::new(0, 0),
                block: BlockId::new(3),
            }],
            &mut out,
        );
        assert!(out.is_empty());
    }
}
