//! Procedural sound synthesis
//!
//! Every effect and the cave theme are rendered from oscillators and
//! filtered noise into 16-bit mono PCM at load time; nothing here touches
//! an audio device. The mixer is deterministic (xorshift noise source), so
//! rendering is testable byte-for-byte.

use crate::sim::SoundEvent;

/// Output sample rate
pub const SAMPLE_RATE: u32 = 44100;

/// Oscillator shapes
#[derive(Debug, Clone, Copy)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Saw,
}

/// Accumulates oscillator and noise voices into a float buffer.
pub struct Mixer {
    sample_rate: u32,
    samples: Vec<f32>,
    rng_state: u32,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            samples: Vec::new(),
            rng_state: 0x2545_f491,
        }
    }

    /// Fast xorshift PRNG for the noise voice (no external deps,
    /// deterministic)
    fn next_random(&mut self) -> f32 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;
        (self.rng_state as f32) / (u32::MAX as f32) * 2.0 - 1.0
    }

    fn ensure_len(&mut self, samples: usize) {
        if self.samples.len() < samples {
            self.samples.resize(samples, 0.0);
        }
    }

    /// Add an oscillator voice: optional exponential frequency ramp,
    /// exponential gain decay over the duration.
    pub fn tone(
        &mut self,
        delay: f32,
        duration: f32,
        freq: f32,
        freq_end: Option<f32>,
        wave: Wave,
        gain: f32,
    ) {
        let start = (delay * self.sample_rate as f32) as usize;
        let count = (duration * self.sample_rate as f32) as usize;
        self.ensure_len(start + count);

        let dt = 1.0 / self.sample_rate as f32;
        let mut phase: f32 = 0.0;
        for i in 0..count {
            let t = i as f32 / count as f32;
            let f = match freq_end {
                Some(end) => freq * (end / freq).powf(t),
                None => freq,
            };
            phase += std::f32::consts::TAU * f * dt;
            let raw = match wave {
                Wave::Sine => phase.sin(),
                Wave::Square => {
                    if phase.sin() >= 0.0 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Wave::Triangle => phase.sin().asin() * std::f32::consts::FRAC_2_PI,
                Wave::Saw => {
                    let cycle = phase / std::f32::consts::TAU;
                    2.0 * (cycle - cycle.floor()) - 1.0
                }
            };
            // Exponential decay toward silence, like a plucked envelope
            let env = gain * (0.001f32 / gain.max(0.001)).powf(t);
            self.samples[start + i] += raw * env;
        }
    }

    /// Add a low-pass filtered white-noise burst (thuds, rubble, hiss)
    pub fn noise(&mut self, delay: f32, duration: f32, gain: f32) {
        let start = (delay * self.sample_rate as f32) as usize;
        let count = (duration * self.sample_rate as f32) as usize;
        self.ensure_len(start + count);

        // Single-pole low-pass around 1.5kHz
        let dt = 1.0 / self.sample_rate as f32;
        let rc = 1.0 / (std::f32::consts::TAU * 1500.0);
        let alpha = dt / (rc + dt);
        let mut filtered = 0.0f32;
        for i in 0..count {
            let t = i as f32 / count as f32;
            let white = self.next_random();
            filtered += alpha * (white - filtered);
            let env = gain * (0.001f32 / gain.max(0.001)).powf(t);
            self.samples[start + i] += filtered * env;
        }
    }

    /// Add a sustained musical note: short linear attack, flat body,
    /// quick release.
    pub fn note(&mut self, at: f32, duration: f32, freq: f32, wave: Wave, gain: f32) {
        let start = (at * self.sample_rate as f32) as usize;
        let count = (duration * self.sample_rate as f32) as usize;
        self.ensure_len(start + count);

        let dt = 1.0 / self.sample_rate as f32;
        let attack = (0.01 * self.sample_rate as f32) as usize;
        let release = (0.05 * self.sample_rate as f32) as usize;
        let mut phase: f32 = 0.0;
        for i in 0..count {
            phase += std::f32::consts::TAU * freq * dt;
            let raw = match wave {
                Wave::Sine => phase.sin(),
                Wave::Square => {
                    if phase.sin() >= 0.0 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Wave::Triangle => phase.sin().asin() * std::f32::consts::FRAC_2_PI,
                Wave::Saw => {
                    let cycle = phase / std::f32::consts::TAU;
                    2.0 * (cycle - cycle.floor()) - 1.0
                }
            };
            let env = if i < attack {
                gain * i as f32 / attack as f32
            } else if i + release > count {
                gain * (count - i) as f32 / release as f32
            } else {
                gain
            };
            self.samples[start + i] += raw * env;
        }
    }

    pub fn len_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Encode the mix as a 16-bit mono RIFF/WAVE file.
    pub fn into_wav(self) -> Vec<u8> {
        let data_len = (self.samples.len() * 2) as u32;
        let mut out = Vec::with_capacity(44 + data_len as usize);

        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&(self.sample_rate * 2).to_le_bytes()); // byte rate
        out.extend_from_slice(&2u16.to_le_bytes()); // block align
        out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for sample in self.samples {
            let clamped = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            out.extend_from_slice(&clamped.to_le_bytes());
        }
        out
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one named effect to WAV bytes.
pub fn render_effect(event: SoundEvent) -> Vec<u8> {
    let mut mix = Mixer::new();
    match event {
        SoundEvent::Jump => {
            mix.tone(0.0, 0.12, 180.0, Some(320.0), Wave::Square, 0.3);
            mix.tone(0.0, 0.08, 90.0, Some(140.0), Wave::Triangle, 0.15);
        }
        SoundEvent::Land => {
            mix.tone(0.0, 0.08, 80.0, Some(40.0), Wave::Square, 0.4);
            mix.noise(0.0, 0.06, 0.3);
        }
        SoundEvent::Step => {
            mix.noise(0.0, 0.03, 0.2);
            mix.tone(0.0, 0.03, 60.0, Some(50.0), Wave::Triangle, 0.15);
        }
        SoundEvent::Whip => {
            mix.noise(0.0, 0.15, 0.6);
            mix.tone(0.0, 0.08, 440.0, Some(200.0), Wave::Saw, 0.15);
        }
        SoundEvent::EnemyHit => {
            mix.tone(0.0, 0.08, 200.0, Some(100.0), Wave::Square, 0.4);
            mix.noise(0.0, 0.05, 0.5);
        }
        SoundEvent::PlayerHit => {
            mix.tone(0.0, 0.1, 150.0, Some(60.0), Wave::Square, 0.5);
            mix.noise(0.0, 0.1, 0.8);
        }
        SoundEvent::Death => {
            mix.tone(0.0, 0.1, 440.0, Some(80.0), Wave::Saw, 0.4);
            mix.tone(0.05, 0.15, 300.0, Some(60.0), Wave::Saw, 0.4);
            mix.tone(0.1, 0.2, 200.0, Some(40.0), Wave::Saw, 0.4);
            mix.noise(0.0, 0.3, 0.6);
        }
        SoundEvent::Explosion => {
            mix.tone(0.0, 0.4, 60.0, Some(20.0), Wave::Saw, 0.8);
            mix.tone(0.0, 0.3, 120.0, Some(30.0), Wave::Square, 0.6);
            mix.noise(0.0, 0.5, 1.0);
            mix.noise(0.1, 0.3, 0.7);
        }
        SoundEvent::GemPickup => {
            mix.tone(0.0, 0.06, 880.0, None, Wave::Triangle, 0.35);
            mix.tone(0.05, 0.06, 1100.0, None, Wave::Triangle, 0.35);
            mix.tone(0.1, 0.1, 1320.0, None, Wave::Sine, 0.3);
        }
        SoundEvent::RopeThrow => {
            mix.tone(0.0, 0.05, 300.0, Some(500.0), Wave::Square, 0.2);
            mix.noise(0.0, 0.08, 0.25);
        }
        SoundEvent::ChestOpen => {
            mix.tone(0.0, 0.08, 330.0, None, Wave::Triangle, 0.3);
            mix.tone(0.05, 0.08, 440.0, None, Wave::Triangle, 0.3);
            mix.tone(0.1, 0.08, 550.0, None, Wave::Triangle, 0.3);
            mix.tone(0.15, 0.1, 660.0, None, Wave::Triangle, 0.3);
        }
        SoundEvent::Door => {
            mix.tone(0.0, 0.2, 220.0, Some(440.0), Wave::Sine, 0.3);
            mix.tone(0.1, 0.2, 330.0, Some(660.0), Wave::Triangle, 0.2);
        }
        SoundEvent::LevelComplete => {
            for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
                mix.tone(i as f32 * 0.12, 0.15, freq, None, Wave::Triangle, 0.4);
            }
        }
    }
    mix.into_wav()
}

// Note frequencies for the cave theme
const C3: f32 = 130.81;
const D3: f32 = 146.83;
const E3: f32 = 164.81;
const F3: f32 = 174.61;
const G3: f32 = 196.00;
const A3: f32 = 220.00;
const C4: f32 = 261.63;
const D4: f32 = 293.66;
const E4: f32 = 329.63;
const F4: f32 = 349.23;
const G4: f32 = 392.00;
const A4: f32 = 440.00;
const B4: f32 = 493.88;
const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;

/// (frequency, length in beats)
type Note = (f32, f32);

const MELODY: [Note; 38] = [
    (E4, 0.5), (E4, 0.25), (G4, 0.25), (A4, 0.5), (A4, 0.5),
    (G4, 0.25), (F4, 0.25), (E4, 0.5), (D4, 0.5), (C4, 0.5),
    (E4, 0.5), (G4, 0.25), (A4, 0.25), (B4, 0.5), (A4, 0.5),
    (G4, 0.25), (F4, 0.25), (E4, 0.25), (D4, 0.25), (C4, 1.0),
    (C4, 0.25), (D4, 0.25), (E4, 0.5), (G4, 0.5), (A4, 0.5),
    (G4, 0.5), (E4, 0.5), (D4, 0.5), (C4, 0.5),
    (G4, 0.25), (A4, 0.25), (B4, 0.5), (C5, 0.5), (B4, 0.5),
    (A4, 0.25), (G4, 0.25), (F4, 0.5), (E4, 1.0),
];

const BASS: [Note; 14] = [
    (C3, 0.5), (G3, 0.5), (A3, 0.5), (E3, 0.5),
    (F3, 0.5), (C3, 0.5), (G3, 1.0),
    (C3, 0.5), (G3, 0.5), (F3, 0.5), (E3, 0.5),
    (D3, 0.5), (G3, 0.5), (C3, 1.0),
];

/// A third up from each melody note, for the harmony voice
fn third_up(freq: f32) -> f32 {
    match freq {
        f if f == E4 => G4,
        f if f == G4 => B4,
        f if f == A4 => C5,
        f if f == F4 => A4,
        f if f == D4 => F4,
        f if f == C4 => E4,
        f if f == B4 => D5,
        f if f == C5 => E5,
        other => other,
    }
}

/// Render one pass of the cave theme. Played back looped.
pub fn render_music() -> Vec<u8> {
    const BPM: f32 = 140.0;
    let beat = 60.0 / BPM;
    let mut mix = Mixer::new();

    // Melody and harmony
    let mut t = 0.0;
    for (freq, d) in MELODY {
        mix.note(t, d * beat, freq, Wave::Square, 0.08);
        mix.note(t, d * beat, third_up(freq), Wave::Triangle, 0.04);
        t += d * beat;
    }
    let total = t;

    // Bass, repeated until it covers the melody
    let mut t = 0.0;
    'bass: loop {
        for (freq, d) in BASS {
            if t >= total {
                break 'bass;
            }
            mix.note(t, d * beat, freq, Wave::Saw, 0.06);
            t += d * beat;
        }
    }

    // Kick on every other beat, ticking hi-hat on every half beat
    let mut t = 0.0;
    while t < total {
        mix.tone(t, 0.15, 80.0, Some(30.0), Wave::Sine, 0.3);
        t += beat * 2.0;
    }
    let mut t = 0.0;
    while t < total {
        mix.noise(t, 0.03, 0.04);
        t += beat * 0.5;
    }

    mix.into_wav()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_header_shape() {
        let bytes = render_effect(SoundEvent::Jump);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[36..40], b"data");
        let data_len = u32::from_le_bytes(bytes[40..44].try_into().unwrap());
        assert_eq!(bytes.len(), 44 + data_len as usize);
    }

    #[test]
    fn test_effects_are_not_silent() {
        for event in SoundEvent::ALL {
            let bytes = render_effect(event);
            let loud = bytes[44..]
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]).unsigned_abs())
                .max()
                .unwrap_or(0);
            assert!(loud > 1000, "{event:?} rendered near-silent");
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(
            render_effect(SoundEvent::Explosion),
            render_effect(SoundEvent::Explosion)
        );
    }

    #[test]
    fn test_music_covers_the_melody() {
        let mut mix = Mixer::new();
        let beat = 60.0 / 140.0;
        let total: f32 = MELODY.iter().map(|(_, d)| d * beat).sum();
        mix.note(0.0, total, C4, Wave::Sine, 0.01);
        assert!(mix.len_seconds() >= total - 0.01);

        let bytes = render_music();
        let seconds = (bytes.len() - 44) as f32 / 2.0 / SAMPLE_RATE as f32;
        assert!(seconds >= total - 0.1);
    }
}
