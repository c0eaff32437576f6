//! Hugging Face credential presence check.
//!
//! Only answers "is a token available"; the token itself is never read into
//! memory beyond checking that the file is non-empty.

use std::env;
use std::fs;
use std::path::PathBuf;

const TOKEN_ENV_VARS: [&str; 2] = ["HF_TOKEN", "HUGGING_FACE_HUB_TOKEN"];

/// Where to look for a Hugging Face token.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    env_vars: Vec<String>,
    token_files: Vec<PathBuf>,
}

impl CredentialStore {
    /// Standard lookup order used by the `hf` CLI, with an optional explicit file first.
    pub fn from_environment(explicit_token_file: Option<PathBuf>) -> Self {
        let mut token_files = Vec::new();
        token_files.extend(explicit_token_file);
        if let Some(hf_home) = env::var_os("HF_HOME") {
            token_files.push(PathBuf::from(hf_home).join("token"));
        }
        if let Some(home) = env::var_os("HOME") {
            token_files.push(
                PathBuf::from(home)
                    .join(".cache")
                    .join("huggingface")
                    .join("token"),
            );
        }
        Self {
            env_vars: TOKEN_ENV_VARS.iter().map(|name| name.to_string()).collect(),
            token_files,
        }
    }

    /// Look only at the given variables and files.
    pub fn with_sources(env_vars: Vec<String>, token_files: Vec<PathBuf>) -> Self {
        Self {
            env_vars,
            token_files,
        }
    }

    pub fn token_present(&self) -> bool {
        let from_env = self.env_vars.iter().any(|name| {
            env::var(name)
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false)
        });
        from_env
            || self.token_files.iter().any(|path| {
                fs::read_to_string(path)
                    .map(|contents| !contents.trim().is_empty())
                    .unwrap_or(false)
            })
    }
}
