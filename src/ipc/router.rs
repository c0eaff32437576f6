use crate::bridge::{AudioOptions, BridgeError};
use crate::setup::check_setup;
use crate::synth::ModelLoader;
use serde_json::Value;

use super::protocol::{BridgeCommand, BridgeResponse, Request, ResponseData, VoiceList};
use super::session::BridgeSession;

/// What the session loop does after writing the response.
#[derive(Debug)]
pub(super) enum Outcome {
    Continue(BridgeResponse),
    Shutdown(BridgeResponse),
}

// ============================================================================
// Command Handlers
// ============================================================================

pub(super) fn dispatch<L: ModelLoader>(
    session: &mut BridgeSession<L>,
    request: Request,
) -> Outcome {
    let Request { id, command } = request;
    let result = match command {
        BridgeCommand::CheckSetup => Ok(handle_check_setup(session, &id)),
        BridgeCommand::Init => handle_init(session, &id),
        BridgeCommand::LoadVoice { voice } => handle_load_voice(session, &id, &voice),
        BridgeCommand::Generate {
            text,
            voice,
            options,
        } => handle_generate(session, &id, &text, &voice, options),
        BridgeCommand::ListVoices => Ok(handle_list_voices(session, &id)),
        BridgeCommand::Shutdown => return Outcome::Shutdown(BridgeResponse::ok(id)),
        BridgeCommand::Unknown(cmd) => Ok(BridgeResponse::error(
            Some(id.clone()),
            format!("Unknown command: {cmd}"),
        )),
    };

    Outcome::Continue(result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "command failed");
        BridgeResponse::error(Some(id), err.to_string())
    }))
}

fn handle_check_setup<L: ModelLoader>(session: &BridgeSession<L>, id: &Value) -> BridgeResponse {
    let report = check_setup(session.bridge.loader(), &session.credentials);
    BridgeResponse::with_data(id.clone(), ResponseData::Setup(report))
}

fn handle_init<L: ModelLoader>(
    session: &mut BridgeSession<L>,
    id: &Value,
) -> Result<BridgeResponse, BridgeError> {
    session.bridge.init_model()?;
    Ok(BridgeResponse::ok(id.clone()))
}

fn handle_load_voice<L: ModelLoader>(
    session: &mut BridgeSession<L>,
    id: &Value,
    voice: &str,
) -> Result<BridgeResponse, BridgeError> {
    session.bridge.load_voice(voice)?;
    Ok(BridgeResponse::ok(id.clone()))
}

fn handle_generate<L: ModelLoader>(
    session: &mut BridgeSession<L>,
    id: &Value,
    text: &str,
    voice: &str,
    options: AudioOptions,
) -> Result<BridgeResponse, BridgeError> {
    if session.log_content {
        tracing::debug!(voice, text, "generate");
    } else {
        tracing::debug!(voice, chars = text.chars().count(), "generate");
    }
    let audio = session.bridge.generate(text, voice, options)?;
    Ok(BridgeResponse::with_audio(id.clone(), audio))
}

fn handle_list_voices<L: ModelLoader>(session: &BridgeSession<L>, id: &Value) -> BridgeResponse {
    let voices = VoiceList::from_catalog(session.bridge.list_voices());
    BridgeResponse::with_data(id.clone(), ResponseData::Voices(voices))
}
