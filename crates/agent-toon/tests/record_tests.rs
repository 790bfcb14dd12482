use agent_toon::{from_mapping, parse_json_object, parse_record, ToonError};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Risk {
    title: String,
    severity: u8,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Assessment {
    summary: String,
    risks: Vec<Risk>,
    #[serde(default)]
    tags: Vec<String>,
}

// ============================================================================
// parse_record
// ============================================================================

#[test]
fn record_from_embedded_json() {
    let risk: Risk =
        parse_record(r#"Assessment: {"title": "Sync", "severity": 3} -- end"#).unwrap();
    assert_eq!(
        risk,
        Risk {
            title: "Sync".to_string(),
            severity: 3
        }
    );
}

#[test]
fn record_from_toon_block() {
    let reply = "```toon\nsummary: Fine\nrisks:\n  title | severity\n  Sync | 3\n  Cost | 1\ntags:\n  - infra\n```";
    let assessment: Assessment = parse_record(reply).unwrap();
    assert_eq!(assessment.summary, "Fine");
    assert_eq!(assessment.risks.len(), 2);
    assert_eq!(assessment.risks[1].title, "Cost");
    assert_eq!(assessment.tags, ["infra"]);
}

#[test]
fn record_falls_back_when_embedded_json_is_invalid() {
    let risk: Risk = parse_record("{not json}\ntitle: Sync\nseverity: 2").unwrap();
    assert_eq!(risk.severity, 2);
}

#[test]
fn record_from_prose_is_no_data() {
    let err = parse_record::<Risk>("I could not decide.").unwrap_err();
    assert!(matches!(err, ToonError::NoStructuredData));
}

#[test]
fn record_missing_field_is_schema_error() {
    let err = parse_record::<Risk>("title: Sync").unwrap_err();
    match err {
        ToonError::Schema(message) => assert!(message.contains("severity"), "{message}"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

// ============================================================================
// Strict helpers
// ============================================================================

#[test]
fn json_object_from_fenced_block() {
    let data = parse_json_object("text\n```json\n{\"a\": 1}\n```").unwrap();
    assert_eq!(data["a"], 1);
}

#[test]
fn json_object_rejects_arrays() {
    let err = parse_json_object("[1, 2]").unwrap_err();
    assert!(matches!(err, ToonError::NotAMapping { found: "array" }));
}

#[test]
fn json_object_reports_parse_errors() {
    let err = parse_json_object("a: 1").unwrap_err();
    assert!(matches!(err, ToonError::JsonParse(_)));
}

#[test]
fn from_mapping_converts_and_validates() {
    let data = match json!({"title": "Cost", "severity": 1}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let risk: Risk = from_mapping(data).unwrap();
    assert_eq!(risk.title, "Cost");

    let bad = match json!({"title": "Cost", "severity": "high"}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    assert!(matches!(from_mapping::<Risk>(bad), Err(ToonError::Schema(_))));
}
