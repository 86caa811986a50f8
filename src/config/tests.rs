use super::{ConfigError, ControllerConfig};

const FULL_CONFIG: &str = r#"{
    "worldFrame": "/world",
    "frame": "/crazyflie/base_link",
    "frequency": 100.0,
    "PIDs": {
        "X":   { "kp": 20.0, "kd": 10.0, "ki": 2.0, "minOutput": -30.0, "maxOutput": 30.0, "integratorMin": -10.0, "integratorMax": 10.0 },
        "Y":   { "kp": -20.0, "kd": -10.0, "ki": -2.0, "minOutput": -30.0, "maxOutput": 30.0, "integratorMin": -10.0, "integratorMax": 10.0 },
        "Z":   { "kp": 30000.0, "kd": 15000.0, "ki": 3500.0, "minOutput": -25000.0, "maxOutput": 21000.0, "integratorMin": -1000.0, "integratorMax": 1000.0 },
        "Yaw": { "kp": -200.0, "kd": -20.0, "ki": 0.0, "minOutput": -200.0, "maxOutput": 200.0, "integratorMin": 0.0, "integratorMax": 0.0 }
    }
}"#;

pub(crate) fn sample_config() -> ControllerConfig {
    ControllerConfig::from_json(FULL_CONFIG).unwrap()
}

#[test]
fn test_parse_full_config() {
    let config = sample_config();
    assert_eq!(config.frame, "/crazyflie/base_link");
    assert!((config.frequency - 100.0).abs() < f64::EPSILON);
    assert!((config.pids.z.kp - 30000.0).abs() < f64::EPSILON);
    assert!((config.pids.yaw.max_output - 200.0).abs() < f64::EPSILON);
    assert!((config.period_secs() - 0.01).abs() < 1e-12);
}

#[test]
fn test_defaults_applied() {
    let raw = FULL_CONFIG
        .replace(r#""worldFrame": "/world","#, "")
        .replace(r#""frequency": 100.0,"#, "");
    let config = ControllerConfig::from_json(&raw).unwrap();
    assert_eq!(config.world_frame, "/world");
    assert!((config.frequency - 50.0).abs() < f64::EPSILON);
    assert!((config.max_pose_age - 0.5).abs() < f64::EPSILON);
    assert!(config.xy_integral_dead_band.is_none());
}

#[test]
fn test_missing_gain_is_parse_error() {
    let raw = FULL_CONFIG.replacen(r#""kp": 20.0, "#, "", 1);
    assert!(matches!(ControllerConfig::from_json(&raw), Err(ConfigError::Parse(_))));
}

#[test]
fn test_flipped_output_limits_rejected() {
    let raw = FULL_CONFIG.replacen(
        r#""minOutput": -30.0, "maxOutput": 30.0"#,
        r#""minOutput": 30.0, "maxOutput": -30.0"#,
        1,
    );
    match ControllerConfig::from_json(&raw) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "PIDs/X/minOutput"),
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn test_non_positive_frequency_rejected() {
    let raw = FULL_CONFIG.replace(r#""frequency": 100.0"#, r#""frequency": 0.0"#);
    assert!(matches!(
        ControllerConfig::from_json(&raw),
        Err(ConfigError::Invalid { field, .. }) if field == "frequency"
    ));
}

#[test]
fn test_frequency_outside_loop_range_rejected() {
    for rate in ["0.5", "1e9", "1e-300"] {
        let raw = FULL_CONFIG.replace(r#""frequency": 100.0"#, &format!(r#""frequency": {rate}"#));
        assert!(
            matches!(ControllerConfig::from_json(&raw), Err(ConfigError::Invalid { field, .. }) if field == "frequency"),
            "rate {rate} accepted"
        );
    }
    for rate in ["1.0", "1000.0"] {
        let raw = FULL_CONFIG.replace(r#""frequency": 100.0"#, &format!(r#""frequency": {rate}"#));
        let config = ControllerConfig::from_json(&raw).unwrap();
        assert!(!config.period().is_zero());
    }
}

#[test]
fn test_dead_band_must_be_positive() {
    let raw = FULL_CONFIG.replace(r#""frequency": 100.0,"#, r#""frequency": 100.0, "xyIntegralDeadBand": -0.2,"#);
    assert!(matches!(ControllerConfig::from_json(&raw), Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = ControllerConfig::from_file("/nonexistent/rotor-ctrl/controller.json");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
