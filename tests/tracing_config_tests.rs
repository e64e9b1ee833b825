//! Tests for logging environment resolution.

use crate::tracing_config::{LogFormat, TracingConfig};

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key: &str| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    }
}

#[test]
fn disabled_without_log_variables() {
    assert_eq!(TracingConfig::from_lookup(lookup(&[("BCZ_LOG_FORMAT", "json")])), None);
}

#[test]
fn bcz_log_takes_precedence_over_rust_log() {
    let config =
        TracingConfig::from_lookup(lookup(&[("RUST_LOG", "info"), ("BCZ_LOG", "debug")]))
            .expect("enabled");
    assert_eq!(config.directives, "debug");
    assert_eq!(config.format, LogFormat::Text);
}

#[test]
fn rust_log_is_the_fallback() {
    let config = TracingConfig::from_lookup(lookup(&[("RUST_LOG", "bcz_checker=trace")]))
        .expect("enabled");
    assert_eq!(config.directives, "bcz_checker=trace");
}

#[test]
fn format_is_parsed_case_insensitively() {
    let config =
        TracingConfig::from_lookup(lookup(&[("BCZ_LOG", "debug"), ("BCZ_LOG_FORMAT", "Tree")]))
            .expect("enabled");
    assert_eq!(config.format, LogFormat::Tree);
    assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
    assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Text));
}

#[test]
fn second_install_keeps_the_existing_subscriber() {
    let config = TracingConfig::from_lookup(lookup(&[("BCZ_LOG", "off")])).expect("enabled");
    crate::tracing_config::install(&config);
    assert!(!crate::tracing_config::install(&config));
}
