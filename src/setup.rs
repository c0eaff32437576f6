//! Environment readiness report for the `check_setup` command and `--doctor`.

use crate::credentials::CredentialStore;
use crate::synth::{ModelLoader, SpeechModel};
use serde::Serialize;

/// Readiness flags reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub runtime_installed: bool,
    pub runtime_version: Option<String>,
    pub synthesizer_installed: bool,
    pub voice_cloning_available: bool,
    pub credentials_present: bool,
    pub setup_complete: bool,
}

/// Probe the synthesizer runtime, model files, voice cloning, and credentials.
///
/// Every probe degrades to `false` on failure. A model is loaded only to ask
/// whether it supports voice cloning and is dropped before returning, so no
/// caller-visible state changes.
pub fn check_setup<L: ModelLoader>(loader: &L, credentials: &CredentialStore) -> SetupReport {
    let runtime_version = loader.runtime_version();
    let runtime_installed = runtime_version.is_some();
    let synthesizer_installed = loader.is_installed();

    let voice_cloning_available = if synthesizer_installed {
        match loader.load() {
            Ok(model) => model.supports_voice_cloning(),
            Err(err) => {
                tracing::debug!(error = %err, "setup probe could not load model");
                false
            }
        }
    } else {
        false
    };

    SetupReport {
        runtime_installed,
        runtime_version,
        synthesizer_installed,
        voice_cloning_available,
        credentials_present: credentials.token_present(),
        setup_complete: runtime_installed && synthesizer_installed,
    }
}
