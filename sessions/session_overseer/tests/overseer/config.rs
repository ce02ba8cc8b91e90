//! Verify that all configuration knobs behave as expected.
use std::time::Duration;

use googletest::{
    expect_that,
    prelude::{eq, none, some},
};
use insta::assert_snapshot;
use session_overseer::SessionConfig;
use session_overseer::config::{
    ConfigLoadError, ConfigLoader, Profile, SessionCookieConfig, SessionCookieKind,
};
use session_overseer::cookie::SameSite;

#[googletest::test]
fn default_cookie_settings() {
    let config = SessionCookieConfig::default();
    expect_that!(config.name, eq("id"));
    expect_that!(config.path.as_deref(), some(eq("/")));
    expect_that!(config.domain.as_deref(), none());
    expect_that!(config.secure, eq(true));
    expect_that!(config.http_only, eq(true));
    expect_that!(config.same_site, some(eq(SameSite::Lax)));
    expect_that!(config.max_age, eq(Duration::from_secs(24 * 60 * 60)));
    expect_that!(config.kind, eq(SessionCookieKind::Persistent));
    assert!(config.validate().is_ok());
}

#[googletest::test]
fn development_cookies_are_not_secure() {
    let config = SessionConfig::for_profile(Profile::Development);
    expect_that!(config.cookie.secure, eq(false));

    let config = SessionConfig::for_profile(Profile::Production);
    expect_that!(config.cookie, eq(&SessionCookieConfig::default()));
}

#[googletest::test]
fn missing_fields_fall_back_to_defaults() {
    let config: SessionConfig = serde_json::from_str("{}").unwrap();
    expect_that!(config, eq(&SessionConfig::default()));

    let config: SessionCookieConfig =
        serde_json::from_str(r#"{"name": "sid", "max_age": "30m", "kind": "session"}"#).unwrap();
    expect_that!(config.name, eq("sid"));
    expect_that!(config.max_age, eq(Duration::from_secs(30 * 60)));
    expect_that!(config.kind, eq(SessionCookieKind::Session));
    expect_that!(config.same_site, some(eq(SameSite::Lax)));
}

#[googletest::test]
fn deserialize_same_site() {
    for (json, expected) in [
        (r#"{"same_site": "Strict"}"#, Some(SameSite::Strict)),
        (r#"{"same_site": "Lax"}"#, Some(SameSite::Lax)),
        (r#"{"same_site": "None"}"#, Some(SameSite::None)),
        (r#"{"same_site": "strict"}"#, Some(SameSite::Strict)),
        (r#"{"same_site": null}"#, None),
    ] {
        let config: SessionCookieConfig = serde_json::from_str(json).unwrap();
        expect_that!(config.same_site, eq(expected));
    }

    let err = serde_json::from_str::<SessionCookieConfig>(r#"{"same_site": "Sometimes"}"#)
        .unwrap_err();
    assert!(err.to_string().contains("unknown variant `Sometimes`"));
}

#[googletest::test]
fn serialized_config_can_be_read_back() {
    let mut config = SessionCookieConfig::default();
    config.same_site = None;
    config.domain = Some("example.com".into());
    config.max_age = Duration::from_secs(90 * 60);

    let json = serde_json::to_value(&config).unwrap();
    expect_that!(json["same_site"], eq(&serde_json::Value::Null));
    let read_back: SessionCookieConfig = serde_json::from_value(json).unwrap();
    expect_that!(read_back, eq(&config));

    let json = serde_json::to_value(SessionCookieConfig::default()).unwrap();
    expect_that!(json["same_site"], eq(&serde_json::Value::from("Lax")));
}

#[test]
fn invalid_cookie_settings_are_rejected() {
    let mut config = SessionCookieConfig::default();
    config.name = "".into();
    assert_snapshot!(config.validate().unwrap_err(), @"The session cookie name can't be empty");

    let mut config = SessionCookieConfig::default();
    config.name = "session;id".into();
    assert_snapshot!(config.validate().unwrap_err(), @"`session;id` is not a valid cookie name: `;` is not allowed");

    let mut config = SessionCookieConfig::default();
    config.path = Some("/a;b".into());
    assert_snapshot!(config.validate().unwrap_err(), @"`/a;b` is not a valid value for the `Path` attribute of the session cookie");

    let mut config = SessionCookieConfig::default();
    config.max_age = Duration::ZERO;
    assert_snapshot!(config.validate().unwrap_err(), @"The max-age of a persistent session cookie must be greater than zero");

    let mut config = SessionCookieConfig::default();
    config.max_age = Duration::from_secs(401 * 24 * 60 * 60);
    assert_snapshot!(config.validate().unwrap_err(), @"The max-age of the session cookie can't exceed 400 days, got 34646400s");
}

#[test]
fn max_age_is_not_checked_for_session_cookies() {
    let mut config = SessionCookieConfig::default();
    config.kind = SessionCookieKind::Session;
    config.max_age = Duration::ZERO;
    assert!(config.validate().is_ok());
}

#[test]
fn configuration_is_layered() {
    figment::Jail::expect_with(|jail| {
        jail.create_dir("configuration")?;
        jail.create_file(
            "configuration/base.yml",
            r#"
session:
  cookie:
    name: "sid"
    max_age: "2h"
"#,
        )?;
        jail.create_file(
            "configuration/dev.yml",
            r#"
session:
  cookie:
    same_site: "Strict"
"#,
        )?;
        jail.set_env("APP_SESSION__COOKIE__DOMAIN", "example.com");

        let config = ConfigLoader::new()
            .profile(Profile::Development)
            .load()
            .unwrap();
        assert_eq!(config.cookie.name, "sid");
        assert_eq!(config.cookie.max_age, Duration::from_secs(2 * 60 * 60));
        assert_eq!(config.cookie.same_site, Some(SameSite::Strict));
        assert_eq!(config.cookie.domain.as_deref(), Some("example.com"));
        // Development defaults survive where no source overrides them.
        assert!(!config.cookie.secure);
        assert!(config.cookie.http_only);

        // The development file is ignored when running in production.
        let config = ConfigLoader::new()
            .profile(Profile::Production)
            .load()
            .unwrap();
        assert_eq!(config.cookie.name, "sid");
        assert_eq!(config.cookie.same_site, Some(SameSite::Lax));
        assert!(config.cookie.secure);
        Ok(())
    });
}

#[test]
fn environment_variables_take_precedence_over_files() {
    figment::Jail::expect_with(|jail| {
        jail.create_dir("settings")?;
        jail.create_file(
            "settings/base.yml",
            r#"
session:
  cookie:
    secure: true
"#,
        )?;
        jail.set_env("APP_SESSION__COOKIE__SECURE", "false");

        let config = ConfigLoader::new()
            .configuration_dir("settings")
            .profile(Profile::Production)
            .load()
            .unwrap();
        assert!(!config.cookie.secure);
        Ok(())
    });
}

#[test]
fn missing_configuration_files_are_skipped() {
    figment::Jail::expect_with(|_jail| {
        let config = ConfigLoader::new()
            .profile(Profile::Production)
            .load()
            .unwrap();
        assert_eq!(config, SessionConfig::default());
        Ok(())
    });
}

#[test]
fn profile_is_read_from_the_environment() {
    figment::Jail::expect_with(|jail| {
        let config = ConfigLoader::new().load().unwrap();
        assert!(config.cookie.secure);

        jail.set_env("APP_ENV", "dev");
        let config = ConfigLoader::new().load().unwrap();
        assert!(!config.cookie.secure);

        jail.set_env("APP_ENV", "staging");
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(matches!(err, ConfigLoadError::Profile(_)));
        Ok(())
    });
}

#[test]
fn loaded_configuration_is_validated() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_SESSION__COOKIE__MAX_AGE", "0s");

        let err = ConfigLoader::new()
            .profile(Profile::Production)
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
        assert_snapshot!(err, @"The session configuration is invalid");
        Ok(())
    });
}
