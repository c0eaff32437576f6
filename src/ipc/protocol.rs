//! JSON-lines protocol between the host process and the bridge.
//!
//! Requests are objects with a `cmd` string, an optional opaque `id`, and
//! command-specific fields. Every request yields exactly one response object.

use crate::bridge::AudioOptions;
use crate::setup::SetupReport;
use crate::voices::DEFAULT_VOICE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Commands (host → bridge)
// ============================================================================

/// Decoded command. Anything with an unrecognized `cmd` lands in `Unknown`.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    CheckSetup,
    Init,
    LoadVoice {
        voice: String,
    },
    Generate {
        text: String,
        voice: String,
        options: AudioOptions,
    },
    ListVoices,
    Shutdown,
    /// Rendered form of the `cmd` value as received.
    Unknown(String),
}

impl BridgeCommand {
    pub fn name(&self) -> &str {
        match self {
            BridgeCommand::CheckSetup => "check_setup",
            BridgeCommand::Init => "init",
            BridgeCommand::LoadVoice { .. } => "load_voice",
            BridgeCommand::Generate { .. } => "generate",
            BridgeCommand::ListVoices => "list_voices",
            BridgeCommand::Shutdown => "shutdown",
            BridgeCommand::Unknown(cmd) => cmd,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoiceFields {
    voice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateFields {
    text: Option<String>,
    voice: Option<String>,
    volume: Option<f32>,
    speed: Option<f32>,
}

/// One request line: the echoed `id` plus the command.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// `null` when the host omitted it.
    pub id: Value,
    pub command: BridgeCommand,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Command must be a JSON object")]
    NotAnObject,
    #[error("{source}")]
    InvalidFields {
        id: Value,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// The request id, when enough of the line was understood to find it.
    pub fn request_id(&self) -> Option<&Value> {
        match self {
            DecodeError::InvalidFields { id, .. } => Some(id),
            DecodeError::InvalidJson | DecodeError::NotAnObject => None,
        }
    }
}

fn default_voice(voice: Option<String>) -> String {
    voice.unwrap_or_else(|| DEFAULT_VOICE.to_string())
}

/// Decode one raw input line.
pub fn decode_request(line: &[u8]) -> Result<Request, DecodeError> {
    let value: Value = serde_json::from_slice(line).map_err(|_| DecodeError::InvalidJson)?;
    let Value::Object(fields) = value else {
        return Err(DecodeError::NotAnObject);
    };
    let id = fields.get("id").cloned().unwrap_or(Value::Null);
    let cmd = fields.get("cmd").cloned().unwrap_or(Value::Null);
    let body = Value::Object(fields);
    let invalid = |source| DecodeError::InvalidFields {
        id: id.clone(),
        source,
    };

    let command = match cmd.as_str() {
        Some("check_setup") => BridgeCommand::CheckSetup,
        Some("init") => BridgeCommand::Init,
        Some("load_voice") => {
            let fields: VoiceFields = serde_json::from_value(body).map_err(invalid)?;
            BridgeCommand::LoadVoice {
                voice: default_voice(fields.voice),
            }
        }
        Some("generate") => {
            let fields: GenerateFields = serde_json::from_value(body).map_err(invalid)?;
            let defaults = AudioOptions::default();
            BridgeCommand::Generate {
                text: fields.text.unwrap_or_default(),
                voice: default_voice(fields.voice),
                options: AudioOptions {
                    volume: fields.volume.unwrap_or(defaults.volume),
                    speed: fields.speed.unwrap_or(defaults.speed),
                },
            }
        }
        Some("list_voices") => BridgeCommand::ListVoices,
        Some("shutdown") => BridgeCommand::Shutdown,
        Some(other) => BridgeCommand::Unknown(other.to_string()),
        None => BridgeCommand::Unknown(cmd.to_string()),
    };

    Ok(Request { id, command })
}

// ============================================================================
// Responses (bridge → host)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ready,
    Ok,
    Error,
}

/// Payload for `list_voices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceList {
    pub voices: Vec<String>,
    pub default: String,
    pub total: usize,
}

impl VoiceList {
    pub fn from_catalog(voices: &[&str]) -> Self {
        Self {
            voices: voices.iter().map(|voice| voice.to_string()).collect(),
            default: DEFAULT_VOICE.to_string(),
            total: voices.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Setup(SetupReport),
    Voices(VoiceList),
}

/// One response line. Absent fields are omitted; `id: Some(Value::Null)`
/// serializes as `"id": null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BridgeResponse {
    fn bare(id: Option<Value>, status: Status) -> Self {
        Self {
            id,
            status,
            data: None,
            audio: None,
            message: None,
        }
    }

    /// Readiness signal written once before any input is read.
    pub fn ready() -> Self {
        Self::bare(None, Status::Ready)
    }

    pub fn ok(id: Value) -> Self {
        Self::bare(Some(id), Status::Ok)
    }

    pub fn with_data(id: Value, data: ResponseData) -> Self {
        Self {
            data: Some(data),
            ..Self::ok(id)
        }
    }

    pub fn with_audio(id: Value, audio: String) -> Self {
        Self {
            audio: Some(audio),
            ..Self::ok(id)
        }
    }

    pub fn error(id: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(id, Status::Error)
        }
    }
}
