//! Piper-compatible synthesizer driven as a child process.
//!
//! The executable receives text on stdin and writes raw 16-bit little-endian
//! PCM to stdout (`--output_raw`). Model metadata (sample rate, speakers) is
//! read from the JSON config that ships next to the ONNX model.

use super::{ModelLoader, SpeechModel, SynthesisError, PCM_SCALE};
use crate::voices::catalog_index;
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

const AUDIO_PROMPT_EXTENSIONS: [&str; 4] = ["wav", "flac", "mp3", "ogg"];

#[derive(Debug, Deserialize)]
struct ModelConfigFile {
    audio: AudioSection,
    #[serde(default)]
    num_speakers: Option<u32>,
    #[serde(default)]
    speaker_id_map: HashMap<String, i64>,
}

#[derive(Debug, Deserialize)]
struct AudioSection {
    sample_rate: u32,
}

/// Locates a Piper model on disk and the executable that runs it.
#[derive(Debug, Clone)]
pub struct PiperLoader {
    synth_cmd: String,
    model_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl PiperLoader {
    pub fn new(synth_cmd: impl Into<String>, model_path: Option<PathBuf>) -> Self {
        Self {
            synth_cmd: synth_cmd.into(),
            model_path,
            config_path: None,
            extra_args: Vec::new(),
        }
    }

    /// Override the model config location (defaults to `<model>.json`).
    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Extra arguments appended to every synthesizer invocation.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    fn resolved_config_path(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(|| self.model_path.as_deref().map(default_config_path))
    }
}

fn default_config_path(model_path: &Path) -> PathBuf {
    let mut raw: OsString = model_path.as_os_str().to_os_string();
    raw.push(".json");
    PathBuf::from(raw)
}

impl ModelLoader for PiperLoader {
    type Model = PiperModel;

    fn runtime_version(&self) -> Option<String> {
        let output = Command::new(&self.synth_cmd)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !stdout.is_empty() {
            return Some(stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Some(stderr)
    }

    fn is_installed(&self) -> bool {
        match (&self.model_path, self.resolved_config_path()) {
            (Some(model), Some(config)) => model.is_file() && config.is_file(),
            _ => false,
        }
    }

    fn load(&self) -> Result<PiperModel, SynthesisError> {
        let model_path = self.model_path.clone().ok_or_else(|| {
            SynthesisError::NotConfigured(
                "no synthesis model configured (pass --model or set TTS_BRIDGE_MODEL)".to_string(),
            )
        })?;
        if !model_path.is_file() {
            return Err(SynthesisError::ModelLoad(format!(
                "model file '{}' not found",
                model_path.display()
            )));
        }
        let config_path = self
            .config_path
            .clone()
            .unwrap_or_else(|| default_config_path(&model_path));
        let raw = fs::read_to_string(&config_path).map_err(|err| {
            SynthesisError::ModelLoad(format!(
                "failed to read model config '{}': {err}",
                config_path.display()
            ))
        })?;
        let config: ModelConfigFile = serde_json::from_str(&raw).map_err(|err| {
            SynthesisError::ModelLoad(format!(
                "invalid model config '{}': {err}",
                config_path.display()
            ))
        })?;
        if config.audio.sample_rate == 0 {
            return Err(SynthesisError::ModelLoad(format!(
                "model config '{}' reports a zero sample rate",
                config_path.display()
            )));
        }

        tracing::info!(
            model = %model_path.display(),
            sample_rate = config.audio.sample_rate,
            speakers = config.num_speakers.unwrap_or(1),
            "speech model loaded"
        );

        Ok(PiperModel {
            synth_cmd: self.synth_cmd.clone(),
            model_path,
            config_path,
            extra_args: self.extra_args.clone(),
            sample_rate: config.audio.sample_rate,
            num_speakers: config.num_speakers.unwrap_or(1),
            speaker_id_map: config.speaker_id_map,
        })
    }
}

/// A Piper model whose metadata has been read and validated.
#[derive(Debug)]
pub struct PiperModel {
    synth_cmd: String,
    model_path: PathBuf,
    config_path: PathBuf,
    extra_args: Vec<String>,
    sample_rate: u32,
    num_speakers: u32,
    speaker_id_map: HashMap<String, i64>,
}

/// Speaker selection for one voice. `None` uses the model's only speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiperVoice {
    pub speaker: Option<i64>,
}

impl PiperModel {
    fn resolve_speaker(&self, voice: &str) -> Option<PiperVoice> {
        if let Some(id) = self.speaker_id_map.get(voice) {
            return Some(PiperVoice { speaker: Some(*id) });
        }
        if self.num_speakers <= 1 {
            return catalog_index(voice).map(|_| PiperVoice { speaker: None });
        }
        let speakers = i64::from(self.num_speakers);
        let by_position = catalog_index(voice)
            .map(|index| index as i64)
            .or_else(|| voice.parse::<i64>().ok());
        by_position
            .filter(|id| (0..speakers).contains(id))
            .map(|id| PiperVoice { speaker: Some(id) })
    }

    fn build_command(&self, voice: &PiperVoice, speed: f32) -> Command {
        let mut command = Command::new(&self.synth_cmd);
        command
            .arg("--model")
            .arg(&self.model_path)
            .arg("--config")
            .arg(&self.config_path)
            .arg("--output_raw");
        if let Some(speaker) = voice.speaker {
            command.arg("--speaker").arg(speaker.to_string());
        }
        if (speed - 1.0).abs() > f32::EPSILON {
            command
                .arg("--length_scale")
                .arg(format!("{:.3}", 1.0 / speed));
        }
        command.args(&self.extra_args);
        command
    }
}

fn is_audio_prompt(voice: &str) -> bool {
    Path::new(voice)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            AUDIO_PROMPT_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Raw s16le samples as floats; a trailing odd byte is dropped.
fn decode_pcm(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / PCM_SCALE)
        .collect()
}

impl SpeechModel for PiperModel {
    type Voice = PiperVoice;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn supports_voice_cloning(&self) -> bool {
        false
    }

    fn prepare_voice(&mut self, voice: &str) -> Result<PiperVoice, SynthesisError> {
        if is_audio_prompt(voice) {
            return Err(SynthesisError::VoiceCloningUnavailable(format!(
                "voice cloning from '{voice}' is not supported by model '{}'",
                self.model_path.display()
            )));
        }
        self.resolve_speaker(voice)
            .ok_or_else(|| SynthesisError::UnknownVoice(voice.to_string()))
    }

    fn generate(
        &mut self,
        voice: &PiperVoice,
        text: &str,
        speed: f32,
    ) -> Result<Vec<f32>, SynthesisError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut child = self
            .build_command(voice, speed)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                SynthesisError::Generation(format!(
                    "failed to start synthesizer '{}': {err}",
                    self.synth_cmd
                ))
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            SynthesisError::Generation("failed to open synthesizer stdin".to_string())
        })?;
        let input = format!("{}\n", text.trim_end());
        // Feed stdin from its own thread so a large utterance cannot fill both pipes.
        let feeder = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| SynthesisError::Generation("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SynthesisError::Generation(format!(
                "synthesizer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        fed?;

        let samples = decode_pcm(&output.stdout);
        if samples.is_empty() {
            return Err(SynthesisError::Generation(
                "synthesizer produced no audio".to_string(),
            ));
        }
        tracing::debug!(samples = samples.len(), "synthesized audio");
        Ok(samples)
    }
}
