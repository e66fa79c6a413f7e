//! Addressable tone voices driven by the guest's `js_set_osc` import.

/// Noise "frequency" is approximated by the playback rate of a looping white
/// noise buffer: `rate = hz * NOISE_RATE_PER_HZ`. Not true pitch synthesis.
pub const NOISE_RATE_PER_HZ: f32 = 0.0006;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceKind {
    Square,
    Triangle,
    Noise,
}

/// What a generator should do with the guest's frequency argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pitch {
    Frequency(f32),
    PlaybackRate(f32),
}

/// A single sound source. Implemented over Web Audio nodes by the front end
/// and by recording fakes in tests.
pub trait ToneGenerator {
    fn set_pitch(&self, pitch: Pitch);
    fn set_amplitude(&self, amplitude: f32);
}

#[derive(Debug)]
pub struct ToneVoice<G> {
    pub kind: VoiceKind,
    pub generator: G,
}

#[inline]
pub fn noise_playback_rate(frequency_hz: f32) -> f32 {
    frequency_hz * NOISE_RATE_PER_HZ
}

/// Fixed bank of voices. Writes are immediate and there is no readback.
#[derive(Debug)]
pub struct TonePool<G> {
    voices: Vec<ToneVoice<G>>,
}

impl<G: ToneGenerator> TonePool<G> {
    pub fn new(voices: Vec<ToneVoice<G>>) -> Self {
        Self { voices }
    }

    /// NES-style bank: two squares, a triangle and noise, built by `make`.
    pub fn nes<E>(mut make: impl FnMut(VoiceKind) -> Result<G, E>) -> Result<Self, E> {
        let voices = DEFAULT_BANK
            .iter()
            .map(|&kind| make(kind).map(|generator| ToneVoice { kind, generator }))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { voices })
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn voice(&self, index: usize) -> Option<&G> {
        self.voices.get(index).map(|v| &v.generator)
    }

    pub fn kinds(&self) -> impl Iterator<Item = VoiceKind> + '_ {
        self.voices.iter().map(|v| v.kind)
    }

    /// Indices outside the bank, negative ones included, are ignored so a
    /// misbehaving guest cannot take the host down.
    pub fn set_voice(&self, index: i32, frequency_hz: f32, amplitude: f32) {
        let Some(voice) = usize::try_from(index).ok().and_then(|i| self.voices.get(i)) else {
            return;
        };
        let hz = if frequency_hz.is_finite() {
            frequency_hz.max(0.0)
        } else {
            0.0
        };
        let pitch = match voice.kind {
            VoiceKind::Noise => Pitch::PlaybackRate(noise_playback_rate(hz)),
            _ => Pitch::Frequency(hz),
        };
        voice.generator.set_pitch(pitch);
        voice.generator.set_amplitude(clamp_amplitude(amplitude));
    }

    /// Silences every voice.
    pub fn mute_all(&self) {
        for v in &self.voices {
            v.generator.set_amplitude(0.0);
        }
    }
}

pub const DEFAULT_BANK: [VoiceKind; 4] = [
    VoiceKind::Square,
    VoiceKind::Square,
    VoiceKind::Triangle,
    VoiceKind::Noise,
];

#[inline]
pub fn clamp_amplitude(amplitude: f32) -> f32 {
    if amplitude.is_finite() {
        amplitude.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
