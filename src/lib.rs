pub mod bridge;
pub mod config;
pub mod credentials;
pub mod ipc;
pub mod setup;
pub mod synth;
pub mod telemetry;
pub mod voices;

#[cfg(test)]
mod test_support;

pub use bridge::{AudioOptions, Bridge, BridgeError};
pub use config::BridgeConfig;
pub use ipc::{run_ipc_mode, BridgeSession, SessionEnd};
