use std::path::Path;
use std::time::Duration;

use cloudcontrol_cli::config::{
    load_config, parse_config, redact_username, CredentialSource, Timeouts, PASSWORD_VAR,
    USERNAME_VAR,
};

const MINIMAL: &str = r#"{
    "config_version": 1,
    "region": "NA",
    "organization_id": "org-1234",
    "credentials": { "type": "environment" },
    "network_domains": {
        "web": { "name": "web", "datacenter": "NA9" }
    }
}"#;

#[test]
fn minimal_config_gets_defaults() {
    let config = parse_config(MINIMAL).unwrap();

    assert_eq!(config.base_url(), "https://api-na.dimensiondata.com");
    assert_eq!(config.timeouts, Timeouts::default());

    let settings = config.timeouts.lifecycle_settings().unwrap();
    assert_eq!(settings.create_timeout, Duration::from_secs(120));
    assert_eq!(settings.create_interval, Duration::from_secs(2));
    assert_eq!(settings.delete_timeout, Duration::from_secs(120));
    assert_eq!(settings.delete_interval, Duration::from_secs(5));

    let web = &config.network_domains["web"];
    assert_eq!(web.plan, "ESSENTIALS");
    assert_eq!(web.datacenter_id, "NA9");
}

#[test]
fn explicit_endpoint_and_partial_timeouts() {
    let config = parse_config(
        r#"{
            "config_version": 1,
            "region": "NA",
            "endpoint": "https://cloud.example.test",
            "organization_id": "org-1234",
            "credentials": { "type": "inline", "username": "ops", "password": "s3cret" },
            "timeouts": { "delete_interval": 10, "request_timeout": 30 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.base_url(), "https://cloud.example.test");
    assert_eq!(config.timeouts.delete_interval, 10);
    assert_eq!(config.timeouts.create_interval, 2);
    assert_eq!(config.timeouts.request_timeout(), Duration::from_secs(30));
    assert!(config.network_domains.is_empty());
}

#[test]
fn zero_poll_interval_is_rejected() {
    let timeouts = Timeouts {
        create_interval: 0,
        ..Timeouts::default()
    };
    assert!(timeouts.lifecycle_settings().is_err());
}

#[test]
fn newer_config_version_is_rejected() {
    let err = parse_config(&MINIMAL.replace("\"config_version\": 1", "\"config_version\": 7"))
        .unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn unversioned_config_is_migrated() {
    let config = parse_config(
        r#"{
            "region": "AU",
            "organization_id": "org-1234",
            "credentials": { "type": "environment" },
            "domains": { "db": { "name": "db", "datacenter": "AU10" } }
        }"#,
    )
    .unwrap();

    assert_eq!(config.config_version, 1);
    assert_eq!(config.network_domains["db"].datacenter_id, "AU10");
}

#[test]
fn environment_credentials_read_both_variables() {
    let lookup = |name: &str| match name {
        USERNAME_VAR => Some("ops".to_string()),
        PASSWORD_VAR => Some("s3cret".to_string()),
        _ => None,
    };

    let (username, password) = CredentialSource::Environment.resolve(lookup).unwrap();
    assert_eq!(username, "ops");
    assert_eq!(password, "s3cret");
}

#[test]
fn environment_credentials_require_password() {
    let lookup = |name: &str| (name == USERNAME_VAR).then(|| "ops".to_string());

    let err = CredentialSource::Environment.resolve(lookup).unwrap_err();
    assert!(err.to_string().contains(PASSWORD_VAR));
}

#[test]
fn inline_credentials_ignore_environment() {
    let source = CredentialSource::Inline {
        username: "ops".to_string(),
        password: "s3cret".to_string(),
    };
    let (username, _) = source.resolve(|_| None).unwrap();
    assert_eq!(username, "ops");
}

#[test]
fn state_path_resolves_against_config_directory() {
    let mut config = parse_config(MINIMAL).unwrap();
    let config_path = Path::new("/etc/cloudcontrol/config.json");

    assert_eq!(
        config.state_path(config_path),
        Path::new("/etc/cloudcontrol/state.json")
    );

    config.state_path = Some("states/prod.json".into());
    assert_eq!(
        config.state_path(config_path),
        Path::new("/etc/cloudcontrol/states/prod.json")
    );

    config.state_path = Some("/var/lib/cloudcontrol/state.json".into());
    assert_eq!(
        config.state_path(config_path),
        Path::new("/var/lib/cloudcontrol/state.json")
    );
}

#[test]
fn load_config_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("failed to read config"));

    std::fs::write(&path, MINIMAL).unwrap();
    assert_eq!(load_config(&path).unwrap().organization_id, "org-1234");
}

#[test]
fn username_is_redacted() {
    assert_eq!(redact_username("operator"), "op****");
    assert_eq!(redact_username("x"), "x****");
}

#[test]
fn oversized_config_version_is_rejected() {
    let err = parse_config(&MINIMAL.replace(
        "\"config_version\": 1",
        "\"config_version\": 4294967297",
    ))
    .unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}
