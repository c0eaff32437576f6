//! Speech synthesis seam.
//!
//! The bridge never talks to a synthesizer directly. It goes through
//! [`ModelLoader`] to obtain a [`SpeechModel`], asks the model to prepare
//! per-voice state, and hands that state back when generating audio. The
//! production implementation drives a Piper-compatible executable; tests use
//! an in-memory fake.

mod piper;
mod text;
mod wav;

pub use piper::{PiperLoader, PiperModel, PiperVoice};
pub use text::normalize_text;
pub use wav::{apply_gain, encode_wav, encode_wav_base64};

use std::fmt;

/// Sample rate reported before any model has been loaded.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Full scale of 16-bit PCM. Decoding divides by it and encoding multiplies by it.
pub(crate) const PCM_SCALE: f32 = 32_768.0;

/// Errors reported by a synthesizer backend.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("{0}")]
    NotConfigured(String),
    #[error("{0}")]
    ModelLoad(String),
    #[error("{0}")]
    VoiceCloningUnavailable(String),
    #[error("unknown voice '{0}'")]
    UnknownVoice(String),
    #[error("{0}")]
    Generation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SynthesisError {
    /// True when the failure means voice cloning cannot be used.
    ///
    /// Backends that only hand back free-form text are classified by the
    /// phrase "voice cloning" appearing anywhere in the message.
    pub fn is_voice_cloning_unavailable(&self) -> bool {
        match self {
            SynthesisError::VoiceCloningUnavailable(_) => true,
            other => other.to_string().to_lowercase().contains("voice cloning"),
        }
    }
}

/// Loads speech models. Implementations must not cache: every call to
/// [`ModelLoader::load`] returns a fresh model.
pub trait ModelLoader {
    type Model: SpeechModel;

    /// Version string of the runtime that hosts the model, if it can be reached.
    fn runtime_version(&self) -> Option<String>;

    /// Whether the model files this loader points at are present.
    fn is_installed(&self) -> bool;

    fn load(&self) -> Result<Self::Model, SynthesisError>;
}

/// A loaded speech model.
pub trait SpeechModel {
    /// Opaque per-voice state returned by [`SpeechModel::prepare_voice`].
    type Voice: fmt::Debug;

    /// Native output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    fn supports_voice_cloning(&self) -> bool;

    fn prepare_voice(&mut self, voice: &str) -> Result<Self::Voice, SynthesisError>;

    /// Synthesize mono samples in `[-1.0, 1.0]`.
    ///
    /// `speed` is a playback-rate multiplier where 1.0 is the model's natural pace.
    fn generate(
        &mut self,
        voice: &Self::Voice,
        text: &str,
        speed: f32,
    ) -> Result<Vec<f32>, SynthesisError>;
}
