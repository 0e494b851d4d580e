// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the MCP tool parameter contracts.

use wasp_mcp::{HistoryAction, HistoryParams, ScanParams};

#[test]
fn scan_params_all_fields_default() {
    let params: ScanParams = serde_json::from_str("{}").unwrap();
    assert_eq!(params.host, "");
    assert_eq!(params.port, 0);
    assert!(params.vhost.is_none());
    assert_eq!(params.max_lines, 0);
    assert_eq!(params.offset, 0);
}

#[test]
fn scan_params_deserialize_full() {
    let json = r#"{
        "host": "example.com",
        "port": 8443,
        "vhost": "app.example.com",
        "max_lines": 50,
        "offset": 100
    }"#;
    let params: ScanParams = serde_json::from_str(json).unwrap();
    assert_eq!(params.host, "example.com");
    assert_eq!(params.port, 8443);
    assert_eq!(params.vhost.as_deref(), Some("app.example.com"));
    assert_eq!(params.max_lines, 50);
    assert_eq!(params.offset, 100);
}

#[test]
fn scan_params_serialize_omits_unset_vhost() {
    let params: ScanParams = serde_json::from_str("{}").unwrap();
    let json = serde_json::to_string(&params).unwrap();
    assert!(!json.contains("vhost"));
}

#[test]
fn scan_params_rejects_out_of_range_port() {
    let result: Result<ScanParams, _> = serde_json::from_str(r#"{"port": 65536}"#);
    assert!(result.is_err());
}

#[test]
fn history_params_action_is_required() {
    let result: Result<HistoryParams, _> = serde_json::from_str("{}");
    assert!(result.is_err());
}

#[test]
fn history_params_deserialize_list() {
    let params: HistoryParams =
        serde_json::from_str(r#"{"action": "list", "limit": 25, "offset": 5}"#).unwrap();
    assert_eq!(params.action, HistoryAction::List);
    assert_eq!(params.limit, 25);
    assert_eq!(params.offset, 5);
    assert_eq!(params.id, 0);
}

#[test]
fn history_params_deserialize_get_with_id() {
    let params: HistoryParams = serde_json::from_str(r#"{"action": "get", "id": 42}"#).unwrap();
    assert_eq!(params.action, HistoryAction::Get);
    assert_eq!(params.id, 42);
}

#[test]
fn history_action_rejects_unknown_value() {
    let result: Result<HistoryAction, _> = serde_json::from_str("\"purge\"");
    assert!(result.is_err());
}

#[test]
fn history_action_all_variants_roundtrip() {
    for (action, text) in [
        (HistoryAction::List, "\"list\""),
        (HistoryAction::Get, "\"get\""),
        (HistoryAction::Delete, "\"delete\""),
        (HistoryAction::Clear, "\"clear\""),
    ] {
        assert_eq!(serde_json::to_string(&action).unwrap(), text);
        let parsed: HistoryAction = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, action);
    }
}

#[test]
fn scan_params_json_schema() {
    let schema = schemars::schema_for!(ScanParams);
    let json = serde_json::to_value(&schema).unwrap();
    let props = json.get("properties").unwrap();
    assert!(props.get("host").is_some());
    assert!(props.get("port").is_some());
    assert!(props.get("vhost").is_some());
    assert!(props.get("max_lines").is_some());
    assert!(props.get("offset").is_some());
}

#[test]
fn history_params_json_schema() {
    let schema = schemars::schema_for!(HistoryParams);
    let json = serde_json::to_value(&schema).unwrap();
    let props = json.get("properties").unwrap();
    assert!(props.get("action").is_some());
    assert!(props.get("id").is_some());
    assert!(props.get("limit").is_some());
}
