// Tone pool addressing through a recording generator.

use gameport_core::tone::{clamp_amplitude, DEFAULT_BANK, NOISE_RATE_PER_HZ};
use gameport_core::*;
use std::cell::RefCell;

#[derive(Default)]
struct Recorder {
    pitches: RefCell<Vec<Pitch>>,
    amplitudes: RefCell<Vec<f32>>,
}

impl ToneGenerator for Recorder {
    fn set_pitch(&self, pitch: Pitch) {
        self.pitches.borrow_mut().push(pitch);
    }

    fn set_amplitude(&self, amplitude: f32) {
        self.amplitudes.borrow_mut().push(amplitude);
    }
}

fn bank() -> TonePool<Recorder> {
    TonePool::nes(|_| Ok::<_, ()>(Recorder::default())).unwrap()
}

#[test]
fn default_bank_layout() {
    let pool = bank();
    assert_eq!(pool.kinds().collect::<Vec<_>>(), DEFAULT_BANK.to_vec());
    assert_eq!(pool.len(), 4);
}

#[test]
fn mute_all_silences_every_voice() {
    let pool = bank();
    pool.mute_all();
    for i in 0..pool.len() {
        assert_eq!(*pool.voice(i).unwrap().amplitudes.borrow(), vec![0.0]);
    }
}

#[test]
fn square_voice_takes_frequency() {
    let voices = vec![ToneVoice {
        kind: VoiceKind::Square,
        generator: Recorder::default(),
    }];
    let pool = TonePool::new(voices);
    pool.set_voice(0, 440.0, 0.5);
    let v = pool_voice(&pool);
    assert_eq!(*v.pitches.borrow(), vec![Pitch::Frequency(440.0)]);
    assert_eq!(*v.amplitudes.borrow(), vec![0.5]);
}

#[test]
fn noise_voice_takes_playback_rate() {
    let voices = vec![ToneVoice {
        kind: VoiceKind::Noise,
        generator: Recorder::default(),
    }];
    let pool = TonePool::new(voices);
    pool.set_voice(0, 1000.0, 1.0);
    let v = pool_voice(&pool);
    let pitches = v.pitches.borrow();
    match pitches[0] {
        Pitch::PlaybackRate(r) => assert!((r - 1000.0 * NOISE_RATE_PER_HZ).abs() < 1e-6),
        other => panic!("expected playback rate, got {:?}", other),
    }
}

#[test]
fn out_of_range_index_changes_nothing() {
    let voices = vec![ToneVoice {
        kind: VoiceKind::Triangle,
        generator: Recorder::default(),
    }];
    let pool = TonePool::new(voices);
    pool.set_voice(1, 440.0, 1.0);
    pool.set_voice(-1, 440.0, 1.0);
    pool.set_voice(i32::MAX, 440.0, 1.0);
    let v = pool_voice(&pool);
    assert!(v.pitches.borrow().is_empty());
    assert!(v.amplitudes.borrow().is_empty());
}

#[test]
fn bad_arguments_are_sanitised() {
    let voices = vec![ToneVoice {
        kind: VoiceKind::Square,
        generator: Recorder::default(),
    }];
    let pool = TonePool::new(voices);
    pool.set_voice(0, f32::NAN, 7.0);
    pool.set_voice(0, -50.0, f32::INFINITY);
    let v = pool_voice(&pool);
    assert_eq!(
        *v.pitches.borrow(),
        vec![Pitch::Frequency(0.0), Pitch::Frequency(0.0)]
    );
    assert_eq!(*v.amplitudes.borrow(), vec![1.0, 0.0]);
}

#[test]
fn amplitude_clamp() {
    assert_eq!(clamp_amplitude(-0.1), 0.0);
    assert_eq!(clamp_amplitude(0.25), 0.25);
    assert_eq!(clamp_amplitude(f32::NAN), 0.0);
}

fn pool_voice(pool: &TonePool<Recorder>) -> &Recorder {
    pool.voice(0).unwrap()
}
