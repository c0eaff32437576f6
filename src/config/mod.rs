//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::bridge::DEFAULT_TERMS_URL;
use defaults::DEFAULT_SYNTH_CMD;

/// CLI options for the bridge. Validated values keep the synthesizer subprocess safe.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "tts-bridge",
    about = "Text-to-speech bridge speaking line-delimited JSON over stdin/stdout",
    author,
    version
)]
pub struct BridgeConfig {
    /// Synthesizer executable (Piper-compatible CLI)
    #[arg(long = "synth-cmd", env = "TTS_BRIDGE_SYNTH_CMD", default_value = DEFAULT_SYNTH_CMD)]
    pub synth_cmd: String,

    /// Path to the ONNX voice model
    #[arg(long = "model", env = "TTS_BRIDGE_MODEL")]
    pub model: Option<PathBuf>,

    /// Path to the model's JSON config (defaults to <model>.json)
    #[arg(long = "model-config", env = "TTS_BRIDGE_MODEL_CONFIG")]
    pub model_config: Option<PathBuf>,

    /// Extra arguments to pass to the synthesizer (repeatable)
    #[arg(
        long = "synth-arg",
        action = ArgAction::Append,
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub synth_args: Vec<String>,

    /// Page where operators accept the voice-cloning model terms
    #[arg(long = "voice-cloning-terms-url", default_value = DEFAULT_TERMS_URL)]
    pub voice_cloning_terms_url: String,

    /// Hugging Face token file checked before the standard locations
    #[arg(long = "hf-token-path", env = "TTS_BRIDGE_HF_TOKEN_PATH")]
    pub hf_token_path: Option<PathBuf>,

    /// Print the setup report as JSON and exit
    #[arg(long = "doctor", default_value_t = false)]
    pub doctor: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "TTS_BRIDGE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "TTS_BRIDGE_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging prompt text (debug log only)
    #[arg(
        long = "log-content",
        env = "TTS_BRIDGE_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

impl BridgeConfig {
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    pub fn content_logging(&self) -> bool {
        self.logging_enabled() && self.log_content
    }
}
