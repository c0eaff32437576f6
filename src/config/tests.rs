use super::defaults::{MAX_SYNTH_ARGS, MAX_SYNTH_ARG_BYTES, SYNTH_CMD_ALLOWLIST};
use super::validation::{canonical_file, sanitize_binary};
use super::BridgeConfig;
use crate::bridge::DEFAULT_TERMS_URL;
use crate::test_support::ScratchDir;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[test]
fn defaults_are_valid() {
    let mut cfg = BridgeConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.synth_cmd, "piper");
    assert_eq!(cfg.voice_cloning_terms_url, DEFAULT_TERMS_URL);
    assert!(cfg.model.is_none());
    assert!(!cfg.logging_enabled());
}

#[test]
fn synth_cmd_allowlist_is_case_insensitive() {
    let mut cfg = BridgeConfig::parse_from(["test-app", "--synth-cmd", "PIPER"]);
    cfg.validate().expect("allowlisted");
    assert_eq!(cfg.synth_cmd, "piper");
}

#[test]
fn rejects_unknown_bare_synth_cmd() {
    let mut cfg = BridgeConfig::parse_from(["test-app", "--synth-cmd", "say"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_empty_synth_cmd() {
    assert!(sanitize_binary("   ", "--synth-cmd", SYNTH_CMD_ALLOWLIST).is_err());
}

#[cfg(unix)]
#[test]
fn accepts_executable_synth_path_and_rejects_plain_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = ScratchDir::new("cfg_synth");
    let script = dir.write("synth.sh", "#!/bin/sh\n");
    let err = sanitize_binary(&script.display().to_string(), "--synth-cmd", &[]).unwrap_err();
    assert!(err.to_string().contains("not executable"));

    let mut perms = fs::metadata(&script).expect("stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");
    let resolved = sanitize_binary(&script.display().to_string(), "--synth-cmd", &[])
        .expect("executable accepted");
    assert_eq!(
        PathBuf::from(resolved),
        script.canonicalize().expect("canonical")
    );
}

#[test]
fn model_paths_are_canonicalized() {
    let dir = ScratchDir::new("cfg_model");
    let model = dir.write("voice.onnx", "onnx");
    let model_arg = model.display().to_string();
    let mut cfg = BridgeConfig::parse_from(["test-app", "--model", &model_arg]);
    cfg.validate().expect("existing model");
    assert_eq!(cfg.model, Some(model.canonicalize().expect("canonical")));
}

#[test]
fn rejects_missing_model() {
    let mut cfg = BridgeConfig::parse_from([
        "test-app",
        "--model",
        "/definitely/not/here/voice.onnx",
    ]);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("--model"));
}

#[test]
fn rejects_directory_as_model_config() {
    let dir = std::env::temp_dir();
    assert!(canonical_file(&dir, "--model-config").is_err());
}

#[test]
fn synth_args_accept_hyphen_values() {
    let mut cfg = BridgeConfig::parse_from([
        "test-app",
        "--synth-arg",
        "--cuda",
        "--synth-arg",
        "--noise_scale",
        "--synth-arg",
        "0.5",
    ]);
    cfg.validate().expect("valid args");
    assert_eq!(cfg.synth_args, vec!["--cuda", "--noise_scale", "0.5"]);
}

#[test]
fn rejects_too_many_synth_args() {
    let mut args = vec!["test-app".to_string()];
    for _ in 0..=MAX_SYNTH_ARGS {
        args.push("--synth-arg".to_string());
        args.push("x".to_string());
    }
    let mut cfg = BridgeConfig::parse_from(args);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_oversized_synth_args() {
    let big = "a".repeat(MAX_SYNTH_ARG_BYTES + 1);
    let mut cfg = BridgeConfig::parse_from(["test-app", "--synth-arg", &big]);
    assert!(cfg.validate().is_err());
}

#[test]
fn terms_url_must_be_http() {
    let mut cfg =
        BridgeConfig::parse_from(["test-app", "--voice-cloning-terms-url", "ftp://example"]);
    assert!(cfg.validate().is_err());

    let mut cfg = BridgeConfig::parse_from([
        "test-app",
        "--voice-cloning-terms-url",
        " https://example.test/terms ",
    ]);
    cfg.validate().expect("https accepted");
    assert_eq!(cfg.voice_cloning_terms_url, "https://example.test/terms");
}

#[test]
fn no_logs_overrides_logs() {
    let cfg = BridgeConfig::parse_from(["test-app", "--logs", "--log-content"]);
    assert!(cfg.logging_enabled());
    assert!(cfg.content_logging());

    let cfg = BridgeConfig::parse_from(["test-app", "--logs", "--no-logs", "--log-content"]);
    assert!(!cfg.logging_enabled());
    assert!(!cfg.content_logging());
}

#[test]
fn content_logging_requires_logs() {
    let cfg = BridgeConfig::parse_from(["test-app", "--log-content"]);
    assert!(!cfg.content_logging());
}
