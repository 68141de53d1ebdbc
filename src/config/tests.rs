use std::io::Write;

use super::*;
use crate::domain::roles::Role;

#[test]
fn defaults_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.cache.url, None);
    assert_eq!(settings.cache.token, None);
    assert_eq!(
        settings.cache.request_timeout,
        Duration::from_millis(DEFAULT_CACHE_REQUEST_TIMEOUT_MS)
    );
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.cache.url = Some("https://file.example".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = Overrides {
        cache_url: Some("https://cli.example".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.cache.url.as_deref(), Some("https://cli.example"));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = Overrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn env_aliases_fill_missing_cache_credentials() {
    let mut raw = RawSettings::default();
    raw.apply_env_aliases(|name| match name {
        CACHE_URL_ENV_ALIAS => Some("https://alias.example".to_string()),
        CACHE_TOKEN_ENV_ALIAS => Some("alias-token".to_string()),
        _ => None,
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.cache.url.as_deref(), Some("https://alias.example"));
    assert_eq!(settings.cache.token.as_deref(), Some("alias-token"));
}

#[test]
fn env_aliases_do_not_replace_configured_values() {
    let mut raw = RawSettings::default();
    raw.cache.url = Some("https://configured.example".to_string());
    raw.apply_env_aliases(|_| Some("https://alias.example".to_string()));

    assert_eq!(raw.cache.url.as_deref(), Some("https://configured.example"));
    assert_eq!(raw.cache.token.as_deref(), Some("https://alias.example"));
}

#[test]
fn blank_credentials_are_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.cache.url = Some("   ".to_string());
    raw.cache.token = Some(String::new());
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.cache.url, None);
    assert_eq!(settings.cache.token, None);
}

#[test]
fn zero_request_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.request_timeout_ms = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero timeout");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.request_timeout_ms",
            ..
        }
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}

#[test]
fn token_is_redacted_in_debug_output() {
    let mut raw = RawSettings::default();
    raw.cache.token = Some("super-secret".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");

    let rendered = format!("{:?}", settings.cache);
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn config_file_supplies_cache_section() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    writeln!(
        file,
        "[cache]\nurl = \"https://file.example\"\ntoken = \"file-token\"\nrequest_timeout_ms = 750"
    )
    .expect("write config");

    let args = CliArgs::parse_from([
        "fanhub",
        "--config-file",
        file.path().to_str().expect("utf-8 path"),
        "--cache-token",
        "cli-token",
        "ping",
    ]);
    let settings = load(&args).expect("valid settings");

    assert_eq!(settings.cache.url.as_deref(), Some("https://file.example"));
    assert_eq!(settings.cache.token.as_deref(), Some("cli-token"));
    assert_eq!(settings.cache.request_timeout, Duration::from_millis(750));
}

#[test]
fn default_command_is_absent() {
    let args = CliArgs::parse_from(["fanhub"]);
    assert!(args.command.is_none());
}

#[test]
fn parse_check_role_arguments() {
    let args = CliArgs::parse_from([
        "fanhub",
        "check-role",
        "--role",
        "creator",
        "--tenant",
        "acme",
        "--user",
        "u-7",
        "--minimum",
        "fan",
        "--allowed",
        "fan,creator",
    ]);

    match args.command.expect("check-role command") {
        Command::CheckRole(check) => {
            assert_eq!(check.role, Role::Creator);
            assert_eq!(check.tenant.as_deref(), Some("acme"));
            assert_eq!(check.user.as_deref(), Some("u-7"));
            assert_eq!(check.minimum, Some(Role::Fan));
            assert_eq!(check.allowed, vec![Role::Fan, Role::Creator]);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_rejects_unknown_role() {
    let result = CliArgs::try_parse_from(["fanhub", "check-role", "--role", "owner"]);
    assert!(result.is_err());
}
