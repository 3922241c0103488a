use std::sync::Mutex;

use tempfile::NamedTempFile;

use clipsight::{EngineConfig, WeightingPolicy};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "CLIPSIGHT_CONFIG",
        "CLIPSIGHT_STRIDE",
        "CLIPSIGHT_COLOR_CLUSTERS",
        "CLIPSIGHT_POLICY",
        "CLIPSIGHT_REFERENCE_LABEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "frame_stride": 3,
        "color_clusters": 2,
        "policy": "person-proximity",
        "reference_label": "person",
        "proximity_normalized": true,
        "classes": {
            "kitchen": ["cup", "bottle"],
            "furniture": ["chair"]
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("CLIPSIGHT_CONFIG", file.path());
    std::env::set_var("CLIPSIGHT_STRIDE", "7");
    std::env::set_var("CLIPSIGHT_REFERENCE_LABEL", "cat");

    let cfg = EngineConfig::load().expect("load config");

    assert_eq!(cfg.frame_stride, 7);
    assert_eq!(cfg.color_clusters, 2);
    assert_eq!(cfg.policy, WeightingPolicy::PersonProximity);
    assert_eq!(cfg.reference_label, "cat");
    assert!(cfg.proximity_normalized);
    assert_eq!(cfg.classes["kitchen"], vec!["cup", "bottle"]);
    assert_eq!(cfg.classes["furniture"], vec!["chair"]);

    clear_env();
}

#[test]
fn defaults_apply_without_a_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = EngineConfig::load().expect("load defaults");
    assert_eq!(cfg.frame_stride, 5);
    assert_eq!(cfg.policy, WeightingPolicy::CenterDistance);
    assert_eq!(cfg.reference_label, "person");
    assert!(!cfg.proximity_normalized);
    assert!(cfg.classes.values().any(|labels| !labels.is_empty()));

    clear_env();
}

#[test]
fn invalid_env_stride_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CLIPSIGHT_STRIDE", "not-a-number");
    assert!(EngineConfig::load().is_err());

    std::env::set_var("CLIPSIGHT_STRIDE", "0");
    assert!(EngineConfig::load().is_err());

    clear_env();
}

#[test]
fn unknown_policy_string_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CLIPSIGHT_POLICY", "nearest-neighbor");
    assert!(EngineConfig::load().is_err());

    clear_env();
}
