use super::*;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

#[test]
fn iso_layouts_parse() {
    assert_eq!(parse_datetime("2023-11-02 08:15:00"), Some(at(2023, 11, 2, 8, 15, 0)));
    assert_eq!(parse_datetime("2023-11-02T08:15:00"), Some(at(2023, 11, 2, 8, 15, 0)));
    assert_eq!(parse_datetime("2023-11-02"), Some(at(2023, 11, 2, 0, 0, 0)));
}

#[test]
fn rfc3339_normalizes_to_utc() {
    assert_eq!(
        parse_datetime("2023-11-02T10:15:00+02:00"),
        Some(at(2023, 11, 2, 8, 15, 0))
    );
}

#[test]
fn offset_stamp_parses() {
    let parsed = parse_datetime("20231102101500.250000+120").unwrap();
    assert_eq!(
        parsed,
        at(2023, 11, 2, 8, 15, 0) + TimeDelta::try_milliseconds(250).unwrap()
    );
    assert_eq!(
        parse_offset_stamp("20231102081500.000000-060"),
        Some(at(2023, 11, 2, 9, 15, 0))
    );
}

#[test]
fn malformed_stamps_are_rejected() {
    assert_eq!(parse_offset_stamp("20231102101500+250000+120"), None);
    assert_eq!(parse_offset_stamp("2023110210150.0250000+120"), None);
    assert_eq!(parse_offset_stamp("20231302101500.000000+000"), None);
    assert_eq!(parse_offset_stamp("20231102101500.000000*000"), None);
    assert_eq!(parse_datetime("not a date"), None);
}

#[test]
fn datetime_column_nulls_unparseable_values() {
    assert_eq!(
        coerce_value(Value::from("garbage"), StorageType::DateTime),
        Value::Null
    );
    assert_eq!(coerce_value(Value::Integer(5), StorageType::DateTime), Value::Null);
    assert_eq!(
        coerce_value(Value::from("2023-11-02"), StorageType::DateTime),
        Value::DateTime(at(2023, 11, 2, 0, 0, 0))
    );
}

#[test]
fn text_column_renders_scalars() {
    assert_eq!(
        coerce_value(Value::Integer(42), StorageType::String),
        Value::Text("42".to_string())
    );
    assert_eq!(coerce_value(Value::Null, StorageType::String), Value::Null);
    assert_eq!(
        coerce_value(Value::Array(vec![Value::from("a"), Value::from("b")]), StorageType::String),
        Value::Text("a,b".to_string())
    );
}

#[test]
fn other_columns_bind_unchanged() {
    assert_eq!(coerce_value(Value::Real(1.5), StorageType::Int64), Value::Real(1.5));
    assert_eq!(coerce_value(Value::Null, StorageType::Bool), Value::Null);
    assert_eq!(
        coerce_value(Value::from(vec![1, 2]), StorageType::Int32),
        Value::Text("1,2".to_string())
    );
}
