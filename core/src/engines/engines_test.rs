use std::collections::BTreeSet;

use crate::engines::EngineKind;
use crate::perf::scenarios::{PreparedCase, prepare_cases};
use crate::val::ScriptVal;

fn find<'a>(cases: &'a [PreparedCase], key: &str) -> &'a PreparedCase {
    cases
        .iter()
        .find(|case| case.key() == key)
        .unwrap_or_else(|| panic!("missing case {key}"))
}

fn run_all_cases(kind: EngineKind) {
    for case in prepare_cases(kind) {
        case.run_once()
            .unwrap_or_else(|err| panic!("{}: {err:#}", case.bench_case_name()));
    }
}

fn assert_idempotent(kind: EngineKind) {
    for key in ["factorial", "regexp_match", "complex_condition", "hash_access"] {
        let cases = prepare_cases(kind);
        let case = find(&cases, key);
        let mut engine = kind.create().expect("create engine");
        case.install(engine.as_mut()).expect("install case");
        let first = case.invoke(engine.as_mut()).expect("first invocation");
        let second = case.invoke(engine.as_mut()).expect("second invocation");
        assert_eq!(first, second, "{key} drifted between invocations");
    }
}

fn assert_hash_round_trip(kind: EngineKind) {
    let cases = prepare_cases(kind);
    let get = find(&cases, "hash_access");
    let set = find(&cases, "hash_write");
    let del = find(&cases, "hash_delete");

    let mut engine = kind.create().expect("create engine");
    set.install(engine.as_mut()).expect("install hash script");

    let key1 = ScriptVal::Str("key1".to_string());
    engine
        .call_by_name(set.entry(), &[key1.clone(), ScriptVal::Str("new_value".to_string())])
        .expect("set_in_hash");
    let read = engine.call_by_name(get.entry(), &[key1.clone()]).expect("get_from_hash");
    assert_eq!(read, ScriptVal::Str("new_value".to_string()));

    engine.call_by_name(del.entry(), &[key1.clone()]).expect("delete_from_hash");
    let absent = engine
        .call_by_name(get.entry(), &[key1])
        .expect("get_from_hash after delete");
    assert_eq!(absent, ScriptVal::Unit, "deleted key must read back as absent");
}

fn assert_regex_rejects(kind: EngineKind) {
    let cases = prepare_cases(kind);
    let case = find(&cases, "regexp_match");
    let mut engine = kind.create().expect("create engine");
    case.install(engine.as_mut()).expect("install regex script");
    let out = engine
        .call_by_name(case.entry(), &[ScriptVal::Str("12345".to_string())])
        .expect("regex invocation");
    assert_eq!(out, ScriptVal::Bool(false));
}

macro_rules! engine_suite {
    ($name:ident, $kind:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn runs_all_cases() {
                run_all_cases($kind);
            }

            #[test]
            fn pure_workloads_are_idempotent() {
                assert_idempotent($kind);
            }

            #[test]
            fn hash_mutation_round_trip() {
                assert_hash_round_trip($kind);
            }

            #[test]
            fn regex_rejects_non_matching_input() {
                assert_regex_rejects($kind);
            }
        }
    };
}

engine_suite!(steel, EngineKind::Steel);
engine_suite!(boa, EngineKind::Boa);
engine_suite!(lua, EngineKind::Lua);
engine_suite!(rlua, EngineKind::Rlua);
engine_suite!(rhai, EngineKind::Rhai);

#[test]
fn all_engines_cover_the_same_workloads() {
    let reference: BTreeSet<&str> = EngineKind::Steel.cases().iter().map(|c| c.key).collect();
    assert_eq!(reference.len(), 9);
    for kind in EngineKind::ALL {
        let keys: BTreeSet<&str> = kind.cases().iter().map(|c| c.key).collect();
        assert_eq!(keys, reference, "{} diverges from the workload set", kind.name());
    }
}

#[test]
fn bench_case_names_are_unique() {
    let mut seen = BTreeSet::new();
    for kind in EngineKind::ALL {
        for case in prepare_cases(kind) {
            assert!(seen.insert(case.bench_case_name()), "duplicate case name");
        }
    }
}
