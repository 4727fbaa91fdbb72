use super::*;
use std::io::Write;
use yare::parameterized;

#[test]
fn defaults_match_channel_defaults() {
    let config = SupervisorConfig::default();
    assert_eq!(config.instance, "tricolor");
    assert_eq!(config.capacity, 32);
    assert_eq!(config.limit, None);
    assert_eq!(config.delay, Duration::ZERO);
    assert_eq!(config.poll_interval, Duration::from_millis(100));
    assert!(config.validate().is_ok());
    assert!(GeneratorConfig::default().validate().is_ok());
}

#[test]
fn parses_both_tables_from_toml() {
    let text = r#"
        [supervisor]
        instance = "lab"
        capacity = 4
        limit = 10
        delay = "1s"
        shutdown_grace = "250ms"

        [generator]
        instance = "lab"
        seed = 7
    "#;
    let file: ConfigFile = toml::from_str(text).unwrap();
    assert_eq!(file.supervisor.instance, "lab");
    assert_eq!(file.supervisor.capacity, 4);
    assert_eq!(file.supervisor.limit, Some(10));
    assert_eq!(file.supervisor.delay, Duration::from_secs(1));
    assert_eq!(file.supervisor.shutdown_grace, Duration::from_millis(250));
    // Unset fields keep their defaults
    assert_eq!(file.supervisor.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(file.generator.seed, Some(7));
}

#[test]
fn empty_file_is_all_defaults() {
    let file: ConfigFile = toml::from_str("").unwrap();
    assert_eq!(file, ConfigFile::default());
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(toml::from_str::<ConfigFile>("[supervisor]\ncapacty = 3\n").is_err());
}

#[test]
fn load_reports_path_on_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[supervisor]\ncapacity = \"many\"").unwrap();

    let err = ConfigFile::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigFile::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_optional_without_path_uses_defaults() {
    assert_eq!(ConfigFile::load_optional(None).unwrap(), ConfigFile::default());
}

#[parameterized(
    bare_seconds = { "3", Duration::from_secs(3) },
    zero = { "0", Duration::ZERO },
    millis = { "500ms", Duration::from_millis(500) },
    compound = { "1m 30s", Duration::from_secs(90) },
    padded = { " 2s ", Duration::from_secs(2) },
    u64_max_seconds = { "18446744073709551615", MAX_DURATION },
    beyond_u64 = { "99999999999999999999999", MAX_DURATION },
    huge_humantime = { "1000000years", MAX_DURATION },
)]
fn parse_duration_accepts(input: &str, expected: Duration) {
    assert_eq!(parse_duration(input).unwrap(), expected);
}

#[parameterized(
    empty = { "" },
    negative = { "-1" },
    word = { "soon" },
)]
fn parse_duration_rejects(input: &str) {
    assert!(matches!(
        parse_duration(input),
        Err(ConfigError::InvalidDuration { .. })
    ));
}

#[parameterized(
    zero_capacity = { SupervisorConfig { capacity: 0, ..SupervisorConfig::default() }, "capacity" },
    huge_capacity = { SupervisorConfig { capacity: 1 << 20, ..SupervisorConfig::default() }, "capacity" },
    zero_poll = { SupervisorConfig { poll_interval: Duration::ZERO, ..SupervisorConfig::default() }, "poll_interval" },
    bad_instance = { SupervisorConfig { instance: "a/b".to_string(), ..SupervisorConfig::default() }, "instance" },
    huge_delay = { SupervisorConfig { delay: Duration::MAX, ..SupervisorConfig::default() }, "delay" },
    huge_grace = { SupervisorConfig { shutdown_grace: Duration::MAX, ..SupervisorConfig::default() }, "shutdown_grace" },
    huge_poll = { SupervisorConfig { poll_interval: Duration::MAX, ..SupervisorConfig::default() }, "poll_interval" },
)]
fn supervisor_validate_rejects(config: SupervisorConfig, field: &str) {
    match config.validate().unwrap_err() {
        ConfigError::Invalid { field: got, .. } => assert_eq!(got, field),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn validate_returns_instance_names() {
    let config = GeneratorConfig {
        instance: "lab".to_string(),
        ..GeneratorConfig::default()
    };
    assert_eq!(config.validate().unwrap().region, "/lab_shm");
}

#[test]
fn clamped_duration_passes_validation() {
    let config = SupervisorConfig {
        delay: parse_duration("18446744073709551615").unwrap(),
        ..SupervisorConfig::default()
    };
    assert!(config.validate().is_ok());
}
