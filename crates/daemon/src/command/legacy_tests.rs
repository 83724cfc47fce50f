use super::*;

fn envelope(action: &str) -> LegacyEnvelope {
    LegacyEnvelope { action: action.to_string(), args: serde_json::Value::Null }
}

#[test]
fn translates_known_actions() {
    assert_eq!(translate_legacy(&envelope("restart")), Some(CommandType::RestartVuos));
    assert_eq!(translate_legacy(&envelope("start")), Some(CommandType::StartVuos));
    assert_eq!(translate_legacy(&envelope("stop")), Some(CommandType::StopVuos));
    assert_eq!(translate_legacy(&envelope("quit")), Some(CommandType::QuitWatchdog));
    assert_eq!(translate_legacy(&envelope("requestTelemetry")), Some(CommandType::RequestTelemetry));
    assert_eq!(translate_legacy(&envelope("requestConfig")), Some(CommandType::RequestConfig));
}

#[test]
fn unknown_action_translates_to_none() {
    assert_eq!(translate_legacy(&envelope("setStreamQuality")), None);
}
