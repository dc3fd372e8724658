//! Audio playback
//!
//! All sounds are procedurally synthesized at load time (see `synth`) and
//! handed to macroquad's sound backend. Playback is fire-and-forget: a
//! backend failure downgrades the bank to silence without touching the
//! simulation.

pub mod synth;

use std::collections::HashMap;

use macroquad::audio::{load_sound_from_bytes, play_sound, stop_sound, PlaySoundParams, Sound};

use crate::sim::SoundEvent;

pub struct SoundBank {
    effects: HashMap<SoundEvent, Sound>,
    music: Option<Sound>,
    pub sfx_volume: f32,
    pub music_volume: f32,
}

impl SoundBank {
    /// Render and register every effect plus the cave theme.
    /// Effects the backend rejects are simply skipped.
    pub async fn load(sfx_volume: f32, music_volume: f32) -> Self {
        let mut effects = HashMap::new();
        for event in SoundEvent::ALL {
            let wav = synth::render_effect(event);
            match load_sound_from_bytes(&wav).await {
                Ok(sound) => {
                    effects.insert(event, sound);
                }
                Err(err) => {
                    tracing::warn!(?event, ?err, "audio backend rejected effect, staying silent")
                }
            }
        }

        let music = match load_sound_from_bytes(&synth::render_music()).await {
            Ok(sound) => Some(sound),
            Err(err) => {
                tracing::warn!(?err, "audio backend rejected music, staying silent");
                None
            }
        };

        Self {
            effects,
            music,
            sfx_volume,
            music_volume,
        }
    }

    /// An empty bank that plays nothing (headless runs, failed init)
    pub fn silent() -> Self {
        Self {
            effects: HashMap::new(),
            music: None,
            sfx_volume: 0.0,
            music_volume: 0.0,
        }
    }

    /// Fire-and-forget effect playback
    pub fn play(&self, event: SoundEvent) {
        if let Some(sound) = self.effects.get(&event) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume: self.sfx_volume,
                },
            );
        }
    }

    pub fn start_music(&self) {
        if let Some(music) = &self.music {
            play_sound(
                music,
                PlaySoundParams {
                    looped: true,
                    volume: self.music_volume,
                },
            );
        }
    }

    pub fn stop_music(&self) {
        if let Some(music) = &self.music {
            stop_sound(music);
        }
    }
}
