//! Bridge state: the lazily loaded model and its per-voice cache.

use crate::synth::{
    apply_gain, encode_wav_base64, normalize_text, ModelLoader, SpeechModel, SynthesisError,
    DEFAULT_SAMPLE_RATE,
};
use crate::voices::PREDEFINED_VOICES;
use std::collections::HashMap;

/// Where operators accept the voice-cloning model terms.
pub const DEFAULT_TERMS_URL: &str = "https://huggingface.co/kyutai/pocket-tts";

const VOLUME_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;
const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;

/// Failures surfaced to the host as `status: "error"` responses.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to load TTS model: {0}")]
    ModelLoad(#[source] SynthesisError),
    #[error(
        "Voice cloning not available. Accept terms at {terms_url} and login with: uvx hf auth login"
    )]
    VoiceCloningUnavailable { terms_url: String },
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("Volume must be between 0.0 and 2.0")]
    VolumeOutOfRange,
    #[error("Playback speed must be between 0.5 and 2.0")]
    SpeedOutOfRange,
    #[error("failed to encode audio: {0}")]
    Encode(#[from] hound::Error),
}

/// Post-processing knobs for `generate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioOptions {
    pub volume: f32,
    pub speed: f32,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            speed: 1.0,
        }
    }
}

impl AudioOptions {
    pub fn validate(&self) -> Result<(), BridgeError> {
        if !VOLUME_RANGE.contains(&self.volume) {
            return Err(BridgeError::VolumeOutOfRange);
        }
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(BridgeError::SpeedOutOfRange);
        }
        Ok(())
    }
}

type VoiceState<L> = <<L as ModelLoader>::Model as SpeechModel>::Voice;

/// Owns the model handle and voice cache for the lifetime of the process.
///
/// The model is loaded on first use and never reloaded. Each voice is prepared
/// at most once and stays cached until the bridge is dropped.
pub struct Bridge<L: ModelLoader> {
    loader: L,
    model: Option<L::Model>,
    voice_cache: HashMap<String, VoiceState<L>>,
    sample_rate: u32,
    terms_url: String,
}

impl<L: ModelLoader> Bridge<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            model: None,
            voice_cache: HashMap::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            terms_url: DEFAULT_TERMS_URL.to_string(),
        }
    }

    pub fn with_terms_url(mut self, terms_url: impl Into<String>) -> Self {
        self.terms_url = terms_url.into();
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn is_voice_cached(&self, voice: &str) -> bool {
        self.voice_cache.contains_key(voice)
    }

    pub fn cached_voice_count(&self) -> usize {
        self.voice_cache.len()
    }

    /// Output sample rate; the default until a model has been loaded.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn ensure_model(&mut self) -> Result<&mut L::Model, BridgeError> {
        let model = match self.model.take() {
            Some(model) => model,
            None => {
                let model = self.loader.load().map_err(BridgeError::ModelLoad)?;
                self.sample_rate = model.sample_rate();
                tracing::info!(sample_rate = self.sample_rate, "model initialized");
                model
            }
        };
        Ok(self.model.insert(model))
    }

    /// Load the model unless it is already loaded.
    pub fn init_model(&mut self) -> Result<(), BridgeError> {
        self.ensure_model().map(|_| ())
    }

    /// Prepare and cache `voice`, loading the model first if needed.
    pub fn load_voice(&mut self, voice: &str) -> Result<(), BridgeError> {
        if self.voice_cache.contains_key(voice) {
            return Ok(());
        }
        let terms_url = self.terms_url.clone();
        let model = self.ensure_model()?;
        let state = model.prepare_voice(voice).map_err(|err| {
            if err.is_voice_cloning_unavailable() {
                tracing::warn!(voice, error = %err, "voice cloning unavailable");
                BridgeError::VoiceCloningUnavailable { terms_url }
            } else {
                BridgeError::Synthesis(err)
            }
        })?;
        self.voice_cache.insert(voice.to_string(), state);
        tracing::info!(voice, "voice cached");
        Ok(())
    }

    /// Synthesize `text` and return a base64-encoded WAV file.
    pub fn generate(
        &mut self,
        text: &str,
        voice: &str,
        options: AudioOptions,
    ) -> Result<String, BridgeError> {
        options.validate()?;
        self.init_model()?;
        self.load_voice(voice)?;

        let (Some(model), Some(state)) = (self.model.as_mut(), self.voice_cache.get(voice)) else {
            return Err(SynthesisError::UnknownVoice(voice.to_string()).into());
        };
        let text = normalize_text(text);
        let mut samples = model.generate(state, &text, options.speed)?;
        apply_gain(&mut samples, options.volume);
        Ok(encode_wav_base64(&samples, self.sample_rate)?)
    }

    pub fn list_voices(&self) -> &'static [&'static str] {
        &PREDEFINED_VOICES
    }
}
