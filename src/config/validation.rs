use super::defaults::{MAX_SYNTH_ARGS, MAX_SYNTH_ARG_BYTES, SYNTH_CMD_ALLOWLIST};
use super::BridgeConfig;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::{fs, path::Path, path::PathBuf};

impl BridgeConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        self.synth_cmd = sanitize_binary(&self.synth_cmd, "--synth-cmd", SYNTH_CMD_ALLOWLIST)?;

        if let Some(model) = &self.model {
            self.model = Some(canonical_file(model, "--model")?);
        }
        if let Some(model_config) = &self.model_config {
            self.model_config = Some(canonical_file(model_config, "--model-config")?);
        }

        // Avoid huge argument lists when forwarding to the synthesizer.
        if self.synth_args.len() > MAX_SYNTH_ARGS {
            bail!(
                "--synth-arg repeated too many times (max {MAX_SYNTH_ARGS}, got {})",
                self.synth_args.len()
            );
        }
        let total_arg_bytes: usize = self.synth_args.iter().map(|arg| arg.len()).sum();
        if total_arg_bytes > MAX_SYNTH_ARG_BYTES {
            bail!("combined --synth-arg length exceeds {MAX_SYNTH_ARG_BYTES} bytes");
        }
        if self
            .synth_args
            .iter()
            .any(|arg| arg.chars().any(|ch| ch == '\0'))
        {
            bail!("--synth-arg values must not contain NUL bytes");
        }

        let url = self.voice_cloning_terms_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://"))
            || url.chars().any(char::is_whitespace)
        {
            bail!(
                "--voice-cloning-terms-url must be an http(s) URL, got '{}'",
                self.voice_cloning_terms_url
            );
        }
        self.voice_cloning_terms_url = url.to_string();

        Ok(())
    }
}

/// Require an existing regular file and store its canonical path.
pub(super) fn canonical_file(path: &Path, flag: &str) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("{flag} path '{}' does not exist", path.display()))?;
    if !canonical.is_file() {
        bail!("{flag} '{}' is not a file", canonical.display());
    }
    Ok(canonical)
}

/// Allow either a known binary name or an absolute path.
pub(super) fn sanitize_binary(value: &str, flag: &str, allowlist: &[&str]) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    if let Some(allowed) = allowlist
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
    {
        return Ok((*allowed).to_string());
    }

    let path = Path::new(trimmed);
    if path.is_absolute() || trimmed.contains(std::path::MAIN_SEPARATOR) {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {flag} '{trimmed}'"))?;
        let metadata = fs::metadata(&canonical)
            .with_context(|| format!("failed to inspect {flag} '{}'", canonical.display()))?;
        if !metadata.is_file() {
            bail!("{flag} '{}' is not a file", canonical.display());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o111 == 0 {
                bail!(
                    "{flag} '{}' exists but is not executable (mode {:o})",
                    canonical.display(),
                    mode
                );
            }
        }
        return canonical
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("{flag} must be valid UTF-8"));
    }

    bail!("{flag} must be one of {allowlist:?} or an existing binary path");
}
