//! Tests for plan field resolution

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn test_primary_key_wins_over_fallback() {
    let node = object(json!({"Node Type": "Seq Scan", "nodeType": "Index Scan"}));
    assert_eq!(
        PlanField::NodeType.resolve_text(&node),
        Some("Seq Scan".to_string())
    );
}

#[test]
fn test_fallback_key_used_when_primary_missing() {
    let node = object(json!({"nodeType": "Seq Scan", "relation": "orders", "filter": "x>1"}));
    assert_eq!(
        PlanField::NodeType.resolve_text(&node),
        Some("Seq Scan".to_string())
    );
    assert_eq!(
        PlanField::RelationName.resolve_text(&node),
        Some("orders".to_string())
    );
    assert_eq!(PlanField::Filter.resolve_text(&node), Some("x>1".to_string()));
}

#[test]
fn test_falsy_primary_falls_through() {
    let node = object(json!({"Relation Name": "", "relation": "orders"}));
    assert_eq!(
        PlanField::RelationName.resolve_text(&node),
        Some("orders".to_string())
    );

    let node = object(json!({"Total Cost": null, "Cost": 0, "cost": 12.5}));
    assert_eq!(PlanField::Cost.resolve_text(&node), Some("12.5".to_string()));
}

#[test]
fn test_cost_candidates_in_order() {
    let node = object(json!({"cost": 3, "Cost": 2}));
    assert_eq!(PlanField::Cost.resolve_text(&node), Some("2".to_string()));
}

#[test]
fn test_sort_key_alternatives() {
    let node = object(json!({"Sort Keys": ["a", "b"]}));
    assert_eq!(PlanField::SortKey.resolve(&node), Some(&json!(["a", "b"])));

    let empty = object(json!({"Sort Key": []}));
    assert_eq!(PlanField::SortKey.resolve(&empty), None);
}

#[test]
fn test_missing_field_is_none() {
    let node = object(json!({"Something Else": 1}));
    for field in PlanField::ALL {
        assert_eq!(field.resolve(&node), None, "{field:?}");
    }
}

#[test]
fn test_is_present() {
    assert!(!is_present(&Value::Null));
    assert!(!is_present(&json!(false)));
    assert!(!is_present(&json!(0)));
    assert!(!is_present(&json!(0.0)));
    assert!(!is_present(&json!("")));
    assert!(!is_present(&json!([])));
    assert!(is_present(&json!(true)));
    assert!(is_present(&json!(-1)));
    assert!(is_present(&json!("0")));
    assert!(is_present(&json!(["a"])));
    assert!(is_present(&json!({})));
}

#[test]
fn test_display_text() {
    assert_eq!(display_text(&json!("status = 'open'")), "status = 'open'");
    assert_eq!(display_text(&json!(1210)), "1210");
    assert_eq!(display_text(&json!(1210.0)), "1210");
    assert_eq!(display_text(&json!(0.42)), "0.42");
    assert_eq!(display_text(&json!(true)), "true");
    assert_eq!(display_text(&json!(["a", "b"])), "a, b");
    assert_eq!(display_text(&json!([1, ["x"]])), r#"1, ["x"]"#);
    assert_eq!(display_text(&json!({"k": 1})), r#"{"k":1}"#);
    assert_eq!(display_text(&Value::Null), "");
}

#[test]
fn test_label_is_primary_key() {
    assert_eq!(PlanField::RelationName.label(), "Relation Name");
    assert_eq!(PlanField::Cost.label(), "Total Cost");
    assert_eq!(PlanField::SortKey.label(), "Sort Key");
}

#[test]
fn test_is_known_key() {
    assert!(PlanField::is_known_key("Plans"));
    assert!(PlanField::is_known_key("nodeType"));
    assert!(PlanField::is_known_key("Sort Keys"));
    assert!(!PlanField::is_known_key("Plan Rows"));
}
