use crate::constants::{INITIAL_VOICE_GAIN, NOISE_BUFFER_SECS};
use crate::dom::Listener;
use gameport_core::tone::DEFAULT_BANK;
use gameport_core::{Pitch, ToneGenerator, TonePool, VoiceKind};
use rand::Rng;
use web_sys as web;

/// One Web Audio source behind a gain node wired to the destination.
pub enum WebVoice {
    Oscillator {
        ctx: web::AudioContext,
        osc: web::OscillatorNode,
        gain: web::GainNode,
    },
    Noise {
        ctx: web::AudioContext,
        source: web::AudioBufferSourceNode,
        gain: web::GainNode,
    },
}

impl WebVoice {
    fn ctx(&self) -> &web::AudioContext {
        match self {
            WebVoice::Oscillator { ctx, .. } | WebVoice::Noise { ctx, .. } => ctx,
        }
    }

    fn gain(&self) -> &web::GainNode {
        match self {
            WebVoice::Oscillator { gain, .. } | WebVoice::Noise { gain, .. } => gain,
        }
    }
}

impl ToneGenerator for WebVoice {
    fn set_pitch(&self, pitch: Pitch) {
        let t = self.ctx().current_time();
        match (self, pitch) {
            (WebVoice::Oscillator { osc, .. }, Pitch::Frequency(hz)) => {
                _ = osc.frequency().set_value_at_time(hz, t);
            }
            (WebVoice::Noise { source, .. }, Pitch::PlaybackRate(rate)) => {
                _ = source.playback_rate().set_value_at_time(rate, t);
            }
            (_, pitch) => log::debug!("[audio] pitch {:?} does not fit this voice", pitch),
        }
    }

    fn set_amplitude(&self, amplitude: f32) {
        let t = self.ctx().current_time();
        _ = self.gain().gain().set_value_at_time(amplitude, t);
    }
}

fn create_gain(ctx: &web::AudioContext, value: f32) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(ctx).map_err(|e| anyhow::anyhow!("GainNode error: {:?}", e))?;
    g.gain().set_value(value);
    _ = g.connect_with_audio_node(&ctx.destination());
    Ok(g)
}

fn build_oscillator(ctx: &web::AudioContext, kind: web::OscillatorType) -> anyhow::Result<WebVoice> {
    let gain = create_gain(ctx, INITIAL_VOICE_GAIN)?;
    let osc = ctx
        .create_oscillator()
        .map_err(|e| anyhow::anyhow!("OscillatorNode error: {:?}", e))?;
    osc.set_type(kind);
    _ = osc.connect_with_audio_node(&gain);
    _ = osc.start();
    Ok(WebVoice::Oscillator {
        ctx: ctx.clone(),
        osc,
        gain,
    })
}

/// White noise in a looping buffer; pitch is approximated by playback rate.
fn build_noise(ctx: &web::AudioContext) -> anyhow::Result<WebVoice> {
    let gain = create_gain(ctx, INITIAL_VOICE_GAIN)?;
    let rate = ctx.sample_rate();
    let frames = (rate * NOISE_BUFFER_SECS) as u32;
    let buffer = ctx
        .create_buffer(1, frames, rate)
        .map_err(|e| anyhow::anyhow!("AudioBuffer error: {:?}", e))?;
    let mut rng = rand::thread_rng();
    let mut samples: Vec<f32> = (0..frames).map(|_| rng.gen_range(-1.0..1.0)).collect();
    _ = buffer.copy_to_channel(&mut samples, 0);

    let source = ctx
        .create_buffer_source()
        .map_err(|e| anyhow::anyhow!("AudioBufferSourceNode error: {:?}", e))?;
    source.set_buffer(Some(&buffer));
    source.set_loop(true);
    _ = source.connect_with_audio_node(&gain);
    _ = source.start();
    Ok(WebVoice::Noise {
        ctx: ctx.clone(),
        source,
        gain,
    })
}

/// The instance's audio context and its tone pool.
pub struct AudioOut {
    pub ctx: web::AudioContext,
    pub pool: TonePool<WebVoice>,
}

impl AudioOut {
    pub fn build() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        // some browsers start running; hold every instance until a gesture
        _ = ctx.suspend();
        let pool = TonePool::nes(|kind| match kind {
            VoiceKind::Square => build_oscillator(&ctx, web::OscillatorType::Square),
            VoiceKind::Triangle => build_oscillator(&ctx, web::OscillatorType::Triangle),
            VoiceKind::Noise => build_noise(&ctx),
        })?;
        log::info!(
            "[audio] {} voices at {} Hz ({:?})",
            pool.len(),
            ctx.sample_rate(),
            DEFAULT_BANK
        );
        Ok(Self { ctx, pool })
    }

    /// The context is held suspended until the first click, key press or touch
    /// resumes it.
    pub fn wire_resume(&self, window: &web::Window) {
        for kind in ["click", "keydown", "touchstart"] {
            let ctx = self.ctx.clone();
            Listener::new(window.as_ref(), kind, move |_| {
                if ctx.state() == web::AudioContextState::Suspended {
                    _ = ctx.resume();
                    log::info!("[audio] resumed");
                }
            })
            .forget();
        }
    }
}
