// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for the worker, buffer, remote and logging flags

use clap::Parser;
use grinfo::config::Config;
use tracing::Level;

// ============================================================================
// --worker flag tests
// ============================================================================

#[test]
fn test_worker_short_flag() {
    let config = Config::try_parse_from(["grinfo", "-w", "8"]).expect("parse should succeed");
    assert_eq!(config.worker, 8);
    assert_eq!(config.worker_count(), 8);
}

#[test]
fn test_worker_long_flag_equals_syntax() {
    let config =
        Config::try_parse_from(["grinfo", "--worker=2"]).expect("parse should succeed");
    assert_eq!(config.worker_count(), 2);
}

#[test]
fn test_worker_zero_clamps_to_one() {
    let config = Config::try_parse_from(["grinfo", "-w", "0"]).expect("parse should succeed");
    assert_eq!(config.worker, 0);
    assert_eq!(config.worker_count(), 1);
}

#[test]
fn test_worker_negative_clamps_to_one() {
    let config = Config::try_parse_from(["grinfo", "-w", "-3"]).expect("parse should succeed");
    assert_eq!(config.worker, -3);
    assert_eq!(config.worker_count(), 1);
}

#[test]
fn test_worker_rejects_non_numeric() {
    let result = Config::try_parse_from(["grinfo", "--worker", "many"]);
    assert!(result.is_err());
}

// ============================================================================
// --buffer flag tests
// ============================================================================

#[test]
fn test_buffer_short_flag() {
    let config = Config::try_parse_from(["grinfo", "-b", "5"]).expect("parse should succeed");
    assert_eq!(config.buffer_size(), 5);
}

#[test]
fn test_buffer_negative_clamps_to_one() {
    let config =
        Config::try_parse_from(["grinfo", "--buffer", "-10"]).expect("parse should succeed");
    assert_eq!(config.buffer_size(), 1);
}

// ============================================================================
// --remote flag tests
// ============================================================================

#[test]
fn test_remote_default() {
    let config = Config::try_parse_from(["grinfo"]).expect("parse should succeed");
    assert_eq!(config.remote, "origin");
}

#[test]
fn test_remote_long_flag() {
    let config =
        Config::try_parse_from(["grinfo", "--remote", "upstream"]).expect("parse should succeed");
    assert_eq!(config.remote, "upstream");
}

// ============================================================================
// Logging flag tests
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config = Config::try_parse_from(["grinfo", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_short_flag_q() {
    let config = Config::try_parse_from(["grinfo", "-q"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config = Config::try_parse_from(["grinfo", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_verbose_flag_value_syntax_not_supported() {
    // Boolean flags are toggled by presence only
    let result = Config::try_parse_from(["grinfo", "--verbose=true"]);
    assert!(result.is_err());
}

// ============================================================================
// Combinations
// ============================================================================

#[test]
fn test_all_flags_combined() {
    let config = Config::try_parse_from([
        "grinfo", "-w", "16", "-b", "32", "-r", "mirror", "-q",
    ])
    .expect("parse should succeed");
    assert_eq!(config.worker_count(), 16);
    assert_eq!(config.buffer_size(), 32);
    assert_eq!(config.remote, "mirror");
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_positional_arguments_rejected() {
    let result = Config::try_parse_from(["grinfo", "/some/repo"]);
    assert!(result.is_err(), "paths come from stdin, not arguments");
}

#[test]
fn test_help_flag() {
    let err = Config::try_parse_from(["grinfo", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
