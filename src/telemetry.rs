use crate::config::BridgeConfig;
use std::env;
use std::fs::OpenOptions;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INIT: OnceLock<bool> = OnceLock::new();

/// JSON-lines trace file. Stdout carries the protocol, so logs never go there.
pub fn tracing_log_path() -> PathBuf {
    env::var("TTS_BRIDGE_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("tts_bridge_trace.jsonl"))
}

/// Install the file subscriber when logging is enabled.
///
/// Returns whether a subscriber is actually installed; an unopenable log file
/// or an already-set global subscriber both yield `false`.
pub fn init_tracing(config: &BridgeConfig) -> bool {
    if !config.logging_enabled() {
        return false;
    }

    *TRACING_INIT.get_or_init(|| install_subscriber(&tracing_log_path()))
}

fn install_subscriber(path: &Path) -> bool {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("tts-bridge: cannot open log file {}: {err}", path.display());
            return false;
        }
    };
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file))
        .with_current_span(false)
        .with_span_list(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// Record panics in the trace log, omitting the payload unless content logging is on.
pub fn install_panic_hook(config: &BridgeConfig) {
    let content_enabled = config.content_logging();
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if content_enabled {
            info.payload()
                .downcast_ref::<&str>()
                .map(|text| (*text).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string())
        } else {
            "panic payload omitted (log-content disabled)".to_string()
        };
        tracing::error!(
            %location,
            %payload,
            version = env!("CARGO_PKG_VERSION"),
            "panic"
        );
        previous(info);
    }));
}
