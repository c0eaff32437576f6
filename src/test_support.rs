//! In-memory synthesizer and scratch files used by unit tests.

use crate::synth::{ModelLoader, SpeechModel, SynthesisError};
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

static SCRATCH_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Directory under the system temp dir, removed with its contents on drop.
#[derive(Debug)]
pub(crate) struct ScratchDir(PathBuf);

impl ScratchDir {
    pub(crate) fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        let seq = SCRATCH_SEQ.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tts_bridge_{label}_{}_{nanos}_{seq}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("create scratch dir");
        Self(path)
    }

    /// Write `contents` to `name` inside the directory.
    pub(crate) fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, contents).expect("write scratch file");
        path
    }
}

impl Deref for ScratchDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CallCounts {
    loads: Arc<AtomicUsize>,
    prepares: Arc<AtomicUsize>,
    generates: Arc<AtomicUsize>,
    last_speed_bits: Arc<AtomicU32>,
}

impl CallCounts {
    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn prepares(&self) -> usize {
        self.prepares.load(Ordering::SeqCst)
    }

    pub(crate) fn generates(&self) -> usize {
        self.generates.load(Ordering::SeqCst)
    }

    pub(crate) fn last_speed(&self) -> f32 {
        f32::from_bits(self.last_speed_bits.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum VoiceFailure {
    Cloning,
    Message(String),
}

#[derive(Debug, Clone)]
pub(crate) struct FakeLoader {
    counts: CallCounts,
    sample_rate: u32,
    runtime: Option<String>,
    installed: bool,
    cloning: bool,
    load_failure: Option<String>,
    voice_failure: Option<VoiceFailure>,
}

impl Default for FakeLoader {
    fn default() -> Self {
        Self {
            counts: CallCounts::default(),
            sample_rate: 24_000,
            runtime: Some("fake-synth 1.0".to_string()),
            installed: true,
            cloning: false,
            load_failure: None,
            voice_failure: None,
        }
    }
}

impl FakeLoader {
    pub(crate) fn counts(&self) -> CallCounts {
        self.counts.clone()
    }

    pub(crate) fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub(crate) fn with_runtime(mut self, runtime: Option<&str>) -> Self {
        self.runtime = runtime.map(str::to_string);
        self
    }

    pub(crate) fn with_installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }

    pub(crate) fn with_cloning(mut self, cloning: bool) -> Self {
        self.cloning = cloning;
        self
    }

    pub(crate) fn failing_load(mut self, message: &str) -> Self {
        self.load_failure = Some(message.to_string());
        self
    }

    pub(crate) fn with_voice_failure(mut self, failure: VoiceFailure) -> Self {
        self.voice_failure = Some(failure);
        self
    }
}

impl ModelLoader for FakeLoader {
    type Model = FakeModel;

    fn runtime_version(&self) -> Option<String> {
        self.runtime.clone()
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn load(&self) -> Result<FakeModel, SynthesisError> {
        self.counts.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.load_failure {
            return Err(SynthesisError::ModelLoad(message.clone()));
        }
        Ok(FakeModel {
            counts: self.counts.clone(),
            sample_rate: self.sample_rate,
            cloning: self.cloning,
            voice_failure: self.voice_failure.clone(),
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeModel {
    counts: CallCounts,
    sample_rate: u32,
    cloning: bool,
    voice_failure: Option<VoiceFailure>,
}

impl SpeechModel for FakeModel {
    type Voice = String;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn supports_voice_cloning(&self) -> bool {
        self.cloning
    }

    fn prepare_voice(&mut self, voice: &str) -> Result<String, SynthesisError> {
        self.counts.prepares.fetch_add(1, Ordering::SeqCst);
        match &self.voice_failure {
            Some(VoiceFailure::Cloning) => Err(SynthesisError::VoiceCloningUnavailable(format!(
                "cannot clone from {voice}"
            ))),
            Some(VoiceFailure::Message(message)) => {
                Err(SynthesisError::Generation(message.clone()))
            }
            None => Ok(voice.to_string()),
        }
    }

    fn generate(
        &mut self,
        _voice: &String,
        text: &str,
        speed: f32,
    ) -> Result<Vec<f32>, SynthesisError> {
        self.counts.generates.fetch_add(1, Ordering::SeqCst);
        self.counts
            .last_speed_bits
            .store(speed.to_bits(), Ordering::SeqCst);
        Ok(vec![0.25; text.chars().count()])
    }
}
