// tests/profiles.rs
use std::fs;

use pretty_assertions::assert_eq;

use gcpd_scrape::config::{AppConfig, Profile};
use gcpd_scrape::error::ConfigError;
use gcpd_scrape::paths::ProfilePaths;
use gcpd_scrape::specs::CONDUCT_SUMMARY;

fn profile(name: &str) -> Profile {
    Profile::new(name, "someone")
        .with_cookie("sessionid", "abc123")
        .with_cookie("steamLoginSecure", "76561198000000000%7C%7Ctoken")
}

#[test]
fn initialize_then_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");

    assert!(matches!(AppConfig::load(&path), Err(ConfigError::Missing(_))));
    assert!(AppConfig::initialize(&path).unwrap());
    assert!(!AppConfig::initialize(&path).unwrap());

    let mut cfg = AppConfig::load(&path).unwrap();
    assert_eq!(cfg, AppConfig::default());

    cfg.upsert_profile(None, profile("main")).unwrap();
    cfg.save(&path).unwrap();

    let back = AppConfig::load(&path).unwrap();
    assert_eq!(back, cfg);
    assert_eq!(back.active_profile().unwrap().session_id().unwrap(), "abc123");
    assert!(!tmp.path().join("config.json.tmp").exists());
}

#[test]
fn delete_profile_removes_its_data() {
    let tmp = tempfile::tempdir().unwrap();
    let data_root = tmp.path().join("data");
    let mut cfg = AppConfig::default();
    cfg.upsert_profile(None, profile("main")).unwrap();
    cfg.upsert_profile(None, profile("alt")).unwrap();

    let main = ProfilePaths::new(&data_root, "main");
    let alt = ProfilePaths::new(&data_root, "alt");
    for p in [&main, &alt] {
        fs::create_dir_all(p.raw_dir(&CONDUCT_SUMMARY)).unwrap();
        fs::write(p.state_file(&CONDUCT_SUMMARY), r#"{"next_continue_token":"1"}"#).unwrap();
    }

    let removed = cfg.delete_profile("main", &data_root).unwrap();
    assert_eq!(removed.profile_name, "main");
    assert!(!main.profile_dir().exists());
    assert!(alt.state_file(&CONDUCT_SUMMARY).exists());
    assert_eq!(cfg.active_profile, "alt");

    cfg.delete_profile("alt", &data_root).unwrap();
    assert_eq!(cfg.active_profile, "");
    assert!(matches!(cfg.delete_profile("alt", &data_root), Err(ConfigError::UnknownProfile(_))));
}

#[test]
fn cookie_header_and_url() {
    let p = profile("main");
    assert_eq!(p.base_url(), "https://steamcommunity.com/id/someone/gcpd/570");
    assert_eq!(
        p.cookie_header(),
        "sessionid=abc123; steamLoginSecure=76561198000000000%7C%7Ctoken"
    );
    assert!(matches!(
        Profile::new("x", "y").session_id(),
        Err(ConfigError::MissingSessionId(_))
    ));
}

#[test]
fn deleting_a_path_like_profile_touches_nothing_outside_its_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let data_root = tmp.path().join("data");
    fs::create_dir_all(&data_root).unwrap();
    let config = tmp.path().join("config.json");
    fs::write(&config, "{}").unwrap();

    let mut cfg = AppConfig::default();
    assert!(matches!(
        cfg.upsert_profile(None, profile("..")),
        Err(ConfigError::InvalidName(_))
    ));

    // a hand-edited config can still carry such a name
    let mut cfg: AppConfig =
        serde_json::from_str(r#"{"active_profile": "..", "profiles": [{"profile_name": "..", "custom_url": "x"}]}"#)
            .unwrap();
    assert!(matches!(cfg.delete_profile("..", &data_root), Err(ConfigError::Store(_))));
    assert!(config.exists());
    assert!(data_root.exists());
    assert_eq!(cfg.profile_names(), vec![".."]);
}
