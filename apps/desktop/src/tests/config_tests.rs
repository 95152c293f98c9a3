use super::*;
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join(CONFIG_FILE), env_of(&[]));

    assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
    assert!(!settings.reduced_motion);
    assert_eq!(settings.log_filter, "info");
    assert!(settings.data_dir.ends_with("breach"));
    assert_eq!(settings.db_path(), settings.data_dir.join("breach.db"));
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(
        &path,
        r#"
server_url = "http://game.local:8080/api"
data_dir = "/tmp/breach-data"
reduced_motion = true
"#,
    )
    .expect("write config");

    let settings = load_settings_from(&path, env_of(&[]));
    assert_eq!(settings.server_url, "http://game.local:8080/api");
    assert_eq!(settings.data_dir, PathBuf::from("/tmp/breach-data"));
    assert!(settings.reduced_motion);
    assert_eq!(
        settings.log_path(),
        PathBuf::from("/tmp/breach-data/breach.log")
    );
}

#[test]
fn unparsable_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "server_url = [not toml").expect("write config");

    let settings = load_settings_from(&path, env_of(&[]));
    assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "server_url = \"http://file/api\"\nreduced_motion = true\n")
        .expect("write config");

    let settings = load_settings_from(
        &path,
        env_of(&[
            ("BREACH_SERVER_URL", "http://env/api"),
            ("APP__SERVER_URL", "http://app/api"),
            ("BREACH_REDUCED_MOTION", "off"),
            ("BREACH_DB_PATH", "/var/lib/breach/state.db"),
            ("BREACH_LOG_FILTER", "client_core=debug"),
        ]),
    );
    assert_eq!(settings.server_url, "http://app/api");
    assert!(!settings.reduced_motion);
    assert_eq!(
        settings.db_path(),
        PathBuf::from("/var/lib/breach/state.db")
    );
    assert_eq!(settings.log_filter, "client_core=debug");
}

#[test]
fn unknown_flag_value_keeps_previous_setting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(
        &dir.path().join(CONFIG_FILE),
        env_of(&[("APP__REDUCED_MOTION", "sometimes")]),
    );
    assert!(!settings.reduced_motion);
}

#[test]
fn command_line_wins_over_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(
        &dir.path().join(CONFIG_FILE),
        env_of(&[("BREACH_SERVER_URL", "http://env/api")]),
    );
    let args = Args::parse_from([
        "breach",
        "--server-url",
        "http://cli/api",
        "--reduced-motion",
        "--db-path",
        "/tmp/cli.db",
    ]);

    let settings = settings.with_args(&args);
    assert_eq!(settings.server_url, "http://cli/api");
    assert!(settings.reduced_motion);
    assert_eq!(settings.db_path(), PathBuf::from("/tmp/cli.db"));
}
