use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::credentials::CredentialStore;
use crate::synth::{ModelLoader, PiperLoader};
use anyhow::Result;
use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use super::protocol::{decode_request, BridgeResponse};
use super::router::{dispatch, Outcome};

// ============================================================================
// Session State
// ============================================================================

/// Why the command loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Shutdown,
    EndOfInput,
}

/// The bridge plus everything a command handler needs besides it.
pub struct BridgeSession<L: ModelLoader> {
    pub(super) bridge: Bridge<L>,
    pub(super) credentials: CredentialStore,
    pub(super) log_content: bool,
}

impl<L: ModelLoader> BridgeSession<L> {
    pub fn new(bridge: Bridge<L>, credentials: CredentialStore) -> Self {
        Self {
            bridge,
            credentials,
            log_content: false,
        }
    }

    /// Allow prompt text in debug logs.
    pub fn with_content_logging(mut self, enabled: bool) -> Self {
        self.log_content = enabled;
        self
    }

    pub fn bridge(&self) -> &Bridge<L> {
        &self.bridge
    }

    /// Emit the ready line, then answer one response per input line until
    /// `shutdown` or end of input.
    ///
    /// Command failures become error responses; only I/O errors on the
    /// streams themselves end the loop early.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> io::Result<SessionEnd> {
        send_response(&mut writer, &BridgeResponse::ready())?;

        let mut line = Vec::new();
        let mut handled: u64 = 0;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                tracing::info!(handled, "input closed");
                return Ok(SessionEnd::EndOfInput);
            }
            handled += 1;

            match self.handle_line(&line) {
                Outcome::Continue(response) => send_response(&mut writer, &response)?,
                Outcome::Shutdown(response) => {
                    send_response(&mut writer, &response)?;
                    tracing::info!(handled, "shutdown requested");
                    return Ok(SessionEnd::Shutdown);
                }
            }
        }
    }

    fn handle_line(&mut self, line: &[u8]) -> Outcome {
        let request = match decode_request(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "rejected request line");
                return Outcome::Continue(BridgeResponse::error(
                    err.request_id().cloned(),
                    err.to_string(),
                ));
            }
        };
        tracing::debug!(cmd = request.command.name(), id = %request.id, "command received");

        let id = request.id.clone();
        panic::catch_unwind(AssertUnwindSafe(|| dispatch(self, request))).unwrap_or_else(
            |payload| {
                let message = panic_message(payload.as_ref());
                tracing::error!(%message, "command handler panicked");
                Outcome::Continue(BridgeResponse::error(Some(id), message))
            },
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "command handler panicked".to_string()
    }
}

// ============================================================================
// Response Writing
// ============================================================================

pub(super) fn send_response<W: Write>(
    writer: &mut W,
    response: &BridgeResponse,
) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

// ============================================================================
// Entry Point
// ============================================================================

/// Build the Piper-backed session described by `config` and serve stdin/stdout.
pub fn run_ipc_mode(config: &BridgeConfig) -> Result<SessionEnd> {
    let bridge =
        Bridge::new(piper_loader(config)).with_terms_url(config.voice_cloning_terms_url.clone());
    let credentials = CredentialStore::from_environment(config.hf_token_path.clone());
    let mut session =
        BridgeSession::new(bridge, credentials).with_content_logging(config.content_logging());

    tracing::info!(synth_cmd = %config.synth_cmd, "starting JSON IPC mode");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let end = session.run(stdin.lock(), stdout.lock())?;
    Ok(end)
}

/// Loader for the synthesizer and model named on the command line.
pub fn piper_loader(config: &BridgeConfig) -> PiperLoader {
    PiperLoader::new(config.synth_cmd.clone(), config.model.clone())
        .with_config_path(config.model_config.clone())
        .with_extra_args(config.synth_args.clone())
}
