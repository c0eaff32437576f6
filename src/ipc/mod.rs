//! JSON-lines command bridge over stdin/stdout.
//!
//! The host process starts the bridge, waits for `{"status":"ready"}`, then
//! writes one command object per line and reads one response object per
//! line. Commands run to completion one at a time; the host must wait for a
//! response before sending the next line.
//!
//! Protocol:
//! - Commands (host → bridge): {"cmd": "...", "id": <any>, ...}
//! - Responses (bridge → host): {"id": <echoed>, "status": "ok"|"error", ...}

mod protocol;
mod router;
mod session;


pub use protocol::{
    decode_request, BridgeCommand, BridgeResponse, DecodeError, Request, ResponseData, Status,
    VoiceList,
};
pub use session::{piper_loader, run_ipc_mode, BridgeSession, SessionEnd};
