use std::thread;

use crate::bridge::{self, regex_cache};
use crate::val::ScriptVal;

const PHONE_PATTERN: &str = r"^\d{3}\d{4}\d{4}$";

fn s(v: &str) -> ScriptVal {
    ScriptVal::Str(v.to_string())
}

#[test]
fn regex_test_matches_phone_number() {
    let out = bridge::regex_test(&[s("15744882345"), s(PHONE_PATTERN)]).unwrap();
    assert_eq!(out, ScriptVal::Bool(true));
}

#[test]
fn regex_test_rejects_short_input() {
    let out = bridge::regex_test(&[s("12345"), s(PHONE_PATTERN)]).unwrap();
    assert_eq!(out, ScriptVal::Bool(false));
}

#[test]
fn regex_test_reports_invalid_pattern() {
    let err = bridge::regex_test(&[s("x"), s("(")]).unwrap_err();
    assert!(err.to_string().contains("compile pattern"));
}

#[test]
fn regex_test_rejects_non_string_arguments() {
    assert!(bridge::regex_test(&[ScriptVal::Int(1), s(PHONE_PATTERN)]).is_err());
    assert!(bridge::regex_test(&[s("x")]).is_err());
}

#[test]
fn compile_cached_is_stable_across_repeats() {
    let first = regex_cache::compile_cached(r"^cache\d+$").unwrap();
    let second = regex_cache::compile_cached(r"^cache\d+$").unwrap();
    assert_eq!(first.as_str(), second.as_str());
    assert!(first.is_match("cache42"));
    assert!(second.is_match("cache42"));
}

#[test]
fn compile_cached_converges_under_racing_compiles() {
    let pattern = r"^race-\d{4}$";
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    let re = regex_cache::compile_cached(pattern).unwrap();
                    re.is_match("race-2024")
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
    // The winning entry keeps serving the pattern afterwards.
    assert!(regex_cache::compile_cached(pattern).unwrap().is_match("race-2024"));
    assert!(regex_cache::cached_patterns() >= 1);
}

#[test]
fn format_time_reformats_under_new_layout() {
    let out = bridge::format_time(&[
        s("2006-01-02T15:04:05Z"),
        s("%Y-%m-%dT%H:%M:%SZ"),
        s("%Y年%m月%d日 %H时%M分%S秒"),
    ])
    .unwrap();
    assert_eq!(out, s("2006年01月02日 15时04分05秒"));
}

#[test]
fn format_time_reports_parse_failure() {
    let err = bridge::format_time(&[s("not-a-date"), s("%Y-%m-%dT%H:%M:%SZ"), s("%Y")]).unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[test]
fn parse_and_modify_overwrites_name() {
    let out = bridge::parse_and_modify(&[s(r#"{"name": "John", "age": 30, "city": "New York"}"#)]).unwrap();
    assert_eq!(out, s("new_name"));
}

#[test]
fn parse_and_modify_rejects_non_object_payload() {
    assert!(bridge::parse_and_modify(&[s("[1, 2, 3]")]).is_err());
    assert!(bridge::parse_and_modify(&[s("not json")]).is_err());
}

#[test]
fn parse_json_yields_a_map() {
    let out = bridge::parse_json(&[s(r#"{"name": "John", "age": 30}"#)]).unwrap();
    let ScriptVal::Map(map) = out else {
        panic!("expected a map");
    };
    assert_eq!(map.get("name"), Some(&ScriptVal::Str("John".to_string())));
    assert_eq!(map.get("age"), Some(&ScriptVal::Int(30)));
}
