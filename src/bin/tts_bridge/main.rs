//! Bridge entrypoint: parse flags, set up logging, then serve JSON lines on stdin/stdout.

use anyhow::Result;
use tts_bridge::credentials::CredentialStore;
use tts_bridge::ipc::piper_loader;
use tts_bridge::setup::check_setup;
use tts_bridge::telemetry::{init_tracing, install_panic_hook, tracing_log_path};
use tts_bridge::{run_ipc_mode, BridgeConfig};

fn main() -> Result<()> {
    let config = BridgeConfig::parse_args()?;

    if config.doctor {
        let report = check_setup(
            &piper_loader(&config),
            &CredentialStore::from_environment(config.hf_token_path.clone()),
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if init_tracing(&config) {
        install_panic_hook(&config);
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            log_file = %tracing_log_path().display(),
            "=== tts-bridge started ==="
        );
    }

    let end = run_ipc_mode(&config)?;
    tracing::info!(?end, "tts-bridge exiting");
    Ok(())
}
