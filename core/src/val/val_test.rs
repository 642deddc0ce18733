use crate::val::ScriptVal;

macro_rules! test_from {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let val: ScriptVal = $input.into();
            assert_eq!(val, $expected);
        }
    };
}

test_from!(from_int, 42i64, ScriptVal::Int(42));
test_from!(from_str, "hello", ScriptVal::Str("hello".to_string()));
test_from!(from_string, String::from("hello"), ScriptVal::Str("hello".to_string()));
test_from!(from_bool, true, ScriptVal::Bool(true));

#[test]
fn accessors_match_variants() {
    assert_eq!(ScriptVal::Int(7).as_int(), Some(7));
    assert_eq!(ScriptVal::Str("x".to_string()).as_str(), Some("x"));
    assert_eq!(ScriptVal::Bool(false).as_bool(), Some(false));
    assert_eq!(ScriptVal::Unit.as_int(), None);
    assert_eq!(ScriptVal::Int(7).as_str(), None);
}

#[test]
fn from_json_object() {
    let parsed: serde_json::Value =
        serde_json::from_str(r#"{"name": "John", "age": 30, "city": "New York"}"#).unwrap();
    let val = ScriptVal::from_json(parsed).unwrap();
    let ScriptVal::Map(map) = val else {
        panic!("expected a map");
    };
    assert_eq!(map.get("name"), Some(&ScriptVal::Str("John".to_string())));
    assert_eq!(map.get("age"), Some(&ScriptVal::Int(30)));
    assert_eq!(map.get("city"), Some(&ScriptVal::Str("New York".to_string())));
}

#[test]
fn from_json_rejects_floats() {
    let parsed: serde_json::Value = serde_json::from_str(r#"{"score": 1.5}"#).unwrap();
    assert!(ScriptVal::from_json(parsed).is_err());
}

#[test]
fn display_formats_literals() {
    assert_eq!(ScriptVal::Int(3_628_800).to_string(), "3628800");
    assert_eq!(ScriptVal::Str("medium".to_string()).to_string(), "medium");
    assert_eq!(ScriptVal::Bool(true).to_string(), "true");
    assert_eq!(ScriptVal::Unit.to_string(), "()");
}
