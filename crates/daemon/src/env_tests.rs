use super::*;
use serial_test::serial;

fn clear_all() {
    for key in [
        "WD_WALL_ID",
        "WD_BROKER_A_URL",
        "WD_BROKER_A_USER",
        "WD_BROKER_A_PASS",
        "WD_BROKER_A_LABEL",
        "WD_BROKER_B_URL",
        "WD_DASHBOARD_PORT",
        "WD_MEDIA_ENGINE_BIN",
        "WD_STUN_SERVER",
        "WD_TURN_PRIMARY_URL",
        "WD_TURN_FALLBACK_URL",
        "WD_CAPTURE_MONITOR",
        "WD_APP_START_CMD",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn wall_id_missing_is_an_error() {
    clear_all();
    assert!(matches!(wall_id(), Err(ConfigError::Missing(key)) if key == "WD_WALL_ID"));
}

#[test]
#[serial]
fn wall_id_reads_env() {
    clear_all();
    std::env::set_var("WD_WALL_ID", "wall-7");
    assert_eq!(wall_id().unwrap(), "wall-7");
    std::env::remove_var("WD_WALL_ID");
}

#[test]
#[serial]
fn brokers_requires_both_urls() {
    clear_all();
    std::env::set_var("WD_BROKER_A_URL", "mqtt://a");
    assert!(brokers().is_err());
    std::env::remove_var("WD_BROKER_A_URL");
}

#[test]
#[serial]
fn brokers_reads_optional_credentials() {
    clear_all();
    std::env::set_var("WD_BROKER_A_URL", "mqtt://a");
    std::env::set_var("WD_BROKER_A_USER", "alice");
    std::env::set_var("WD_BROKER_B_URL", "mqtt://b");
    let [a, b] = brokers().unwrap();
    assert_eq!(a.id, "A");
    assert_eq!(b.id, "B");
    clear_all();
}

#[test]
#[serial]
fn dashboard_port_defaults_when_unset() {
    clear_all();
    assert_eq!(dashboard_port(), DEFAULT_DASHBOARD_PORT);
}

#[test]
#[serial]
fn dashboard_port_reads_override() {
    clear_all();
    std::env::set_var("WD_DASHBOARD_PORT", "9000");
    assert_eq!(dashboard_port(), 9000);
    std::env::remove_var("WD_DASHBOARD_PORT");
}

#[test]
#[serial]
fn stun_server_defaults_to_public_stun() {
    clear_all();
    assert_eq!(stun_server(), DEFAULT_STUN_SERVER);
}

#[test]
#[serial]
fn capture_monitor_defaults_to_zero() {
    clear_all();
    assert_eq!(capture_monitor(), 0);
}

#[test]
#[serial]
fn collector_config_uses_defaults_when_unset() {
    clear_all();
    let config = collector_config();
    assert_eq!(config.app_process_name, DEFAULT_APP_PROCESS_NAME);
    assert_eq!(config.server_process_name, DEFAULT_SERVER_PROCESS_NAME);
}

#[test]
#[serial]
fn app_commands_default_to_none() {
    clear_all();
    assert!(app_start_cmd().is_none());
    assert!(app_stop_cmd().is_none());
    assert!(app_restart_cmd().is_none());
}
