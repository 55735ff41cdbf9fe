//! Integration tests for configuration handling.

use std::time::Duration;

use rust_asciicast::config::{EnvConfig, env::vars, file};
use rust_asciicast::{
    AsciicastConfig, BatchConfig, Distribution, LogFormat, LoggingConfig, PlaybackConfig,
    PlaybackSpeed,
};
use tempfile::TempDir;

/// An env reader whose prefix no real process environment uses.
fn env() -> EnvConfig {
    EnvConfig::new("ASCIICAST_CONFIG_TEST")
}

#[test]
fn defaults() {
    let config = AsciicastConfig::default();
    assert_eq!(config.playback, PlaybackConfig::default());
    assert_eq!(config.batch, BatchConfig::default());
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.logging.format, LogFormat::Plaintext);
    assert_eq!(config.batch.distribution, Distribution::Queue);
}

#[test]
fn load_from_file_then_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file::CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "[playback]\nspeed = 4.0\nidle_time_limit = 2.0\n\n[batch]\nparallel = 6\n",
    )
    .unwrap();

    let mut env = env();
    env.set(vars::PARALLEL, "2");
    let config = file::load(&path).unwrap().with_env(&env).unwrap();

    let playback = config.playback.to_options().unwrap();
    assert_eq!(playback.speed, PlaybackSpeed::Speed(4.0));
    assert_eq!(playback.idle_time_limit, Some(Duration::from_secs(2)));

    let batch = config.batch.to_options(dir.path());
    assert_eq!(batch.parallel, Some(2));
    assert_eq!(batch.input_dir, dir.path());
}

#[test]
fn find_looks_through_directories_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    std::fs::write(second.path().join(file::CONFIG_FILE_NAME), "").unwrap();

    let found = file::find(&[first.path(), second.path()]).unwrap();
    assert_eq!(found, second.path().join(file::CONFIG_FILE_NAME));
    assert!(file::find(&[first.path()]).is_none());
}

#[test]
fn invalid_toml_is_config_error() {
    let err = file::parse_toml("[batch]\nparallel = \"lots\"\n").unwrap_err();
    assert!(err.to_string().starts_with("configuration error"));
}

#[test]
fn env_speed_override_is_validated_on_conversion() {
    let mut env = env();
    env.set(vars::SPEED, "-3");
    let config = AsciicastConfig::default().with_env(&env).unwrap();
    assert!(config.playback.to_options().is_err());
}

#[test]
fn env_unset_shadows_process_environment() {
    let mut env = EnvConfig::new("");
    env.unset("PATH");
    assert!(env.get("PATH").is_none());
}

#[test]
fn env_zero_idle_limit_disables_the_limit() {
    let mut env = env();
    env.set(vars::IDLE_TIME_LIMIT, "0");
    let config = AsciicastConfig::default().with_env(&env).unwrap();
    let options = config.playback.to_options().unwrap();
    assert_eq!(options.idle_time_limit, None);
    assert_eq!(options.speed, PlaybackSpeed::Realtime);
}
