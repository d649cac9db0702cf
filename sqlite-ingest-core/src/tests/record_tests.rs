use super::*;

#[test]
fn container_hints_are_ambiguous() {
    assert!(TypeHint::Dynamic.is_ambiguous());
    assert!(TypeHint::named("  ").is_ambiguous());
    assert!(TypeHint::of::<Vec<String>>().is_ambiguous());
    assert!(TypeHint::of::<serde_json::Value>().is_ambiguous());
    assert!(TypeHint::of::<&[u8]>().is_ambiguous());
    assert!(TypeHint::of::<std::collections::HashMap<String, i32>>().is_ambiguous());
}

#[test]
fn scalar_hints_are_not_ambiguous() {
    assert!(!TypeHint::of::<i32>().is_ambiguous());
    assert!(!TypeHint::of::<String>().is_ambiguous());
    assert!(!TypeHint::named("my_app::Address").is_ambiguous());
}

#[test]
fn row_lookup_ignores_ascii_case() {
    let row = Row::new().with("Name", "a").with_typed("Count", 3i32);
    assert_eq!(row.get("name"), Some(&Value::from("a")));
    assert_eq!(row.property("COUNT"), Some(Value::Integer(3)));
    assert_eq!(row.property("missing"), None);
    assert_eq!(row.names().collect::<Vec<_>>(), vec!["Name", "Count"]);
}

#[test]
fn typed_properties_carry_their_type_name() {
    let prop = Property::typed("Count", 3i32);
    assert_eq!(prop.hint.name(), Some("i32"));
    assert_eq!(prop.value, Value::Integer(3));
}

#[test]
fn json_objects_keep_member_order() {
    let json = serde_json::json!({ "zeta": 1, "alpha": "x", "mid": null });
    let names: Vec<String> = json.properties().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn json_scalars_become_single_value_records() {
    let props = serde_json::json!(42).properties();
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].name, "value");
    assert_eq!(props[0].value, Value::Integer(42));
}

#[test]
fn json_lookup_matches_member_names_without_case() {
    let json = serde_json::json!({ "Name": "ada", "age": 36 });
    assert_eq!(json.property("Name"), Some(Value::from("ada")));
    assert_eq!(json.property("AGE"), Some(Value::Integer(36)));
    assert_eq!(json.property("missing"), None);

    let scalar = serde_json::json!(true);
    assert_eq!(scalar.property("VALUE"), Some(Value::Bool(true)));
    assert_eq!(scalar.property("other"), None);
}
