/// Synthesizer executable names accepted without a path.
pub(super) const SYNTH_CMD_ALLOWLIST: &[&str] = &["piper", "piper-tts"];

pub(super) const DEFAULT_SYNTH_CMD: &str = "piper";

/// Cap on repeated `--synth-arg` values.
pub(super) const MAX_SYNTH_ARGS: usize = 32;

/// Combined byte budget for `--synth-arg` values.
pub(super) const MAX_SYNTH_ARG_BYTES: usize = 4096;
