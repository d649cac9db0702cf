use super::*;
use chrono::Timelike;

fn when() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_milli_opt(14, 5, 7, 250)
        .unwrap()
}

#[test]
fn arrays_flatten_with_delimiter() {
    let value = Value::from(vec![1, 2, 3]);
    assert_eq!(value.flatten(), Value::Text("1,2,3".to_string()));

    let nested = Value::Array(vec![Value::from("a"), Value::Null, Value::from(true)]);
    assert_eq!(nested.to_string(), "a,,true");
}

#[test]
fn flatten_leaves_scalars_alone() {
    assert_eq!(Value::Integer(7).flatten(), Value::Integer(7));
    assert_eq!(Value::Null.flatten(), Value::Null);
}

#[test]
fn objects_display_as_json() {
    let value = Value::Object(vec![
        ("street".to_string(), Value::from("Main")),
        ("number".to_string(), Value::Integer(12)),
    ]);
    let text = value.to_string();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["street"], "Main");
    assert_eq!(parsed["number"], 12);
}

#[test]
fn datetime_displays_at_second_precision() {
    assert_eq!(Value::DateTime(when()).to_string(), "2024-03-09 14:05:07");
}

#[test]
fn datetime_text_reads_back() {
    let text = Value::Text("2024-03-09 14:05:07".to_string());
    assert_eq!(
        text.as_datetime(),
        Some(when().with_nanosecond(0).unwrap())
    );
    assert_eq!(Value::Text("yesterday".to_string()).as_datetime(), None);
}

#[test]
fn option_and_json_conversions() {
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    assert_eq!(Value::from(serde_json::json!(2.5)), Value::Real(2.5));
    assert_eq!(Value::from(serde_json::json!(-4)), Value::Integer(-4));
    assert_eq!(
        Value::from(serde_json::json!(["a", 1])),
        Value::Array(vec![Value::from("a"), Value::Integer(1)])
    );
}

#[test]
fn bools_read_back_from_integers() {
    assert_eq!(Value::Integer(1).as_bool(), Some(true));
    assert_eq!(Value::Integer(0).as_bool(), Some(false));
    assert_eq!(Value::Integer(2).as_bool(), None);
}
