//! Steel (Scheme) adapter.

use anyhow::{Result, anyhow, bail};
use steel::rerrs::{ErrorKind, SteelErr};
use steel::rvals::SteelVal;
use steel::steel_vm::engine::Engine;
use steel::steel_vm::register_fn::RegisterFn;

use crate::bridge::{self, BridgeSpec, HostFn};
use crate::engines::ScriptEngine;
use crate::perf::scenarios::{CaseSpec, Expected, Literal};
use crate::val::ScriptVal;

pub struct SteelEngine {
    engine: Engine,
}

impl SteelEngine {
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }
}

impl Default for SteelEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_steel(val: &ScriptVal) -> Result<SteelVal> {
    Ok(match val {
        ScriptVal::Unit => SteelVal::Void,
        ScriptVal::Int(v) => SteelVal::IntV(*v as isize),
        ScriptVal::Str(v) => SteelVal::StringV(v.clone().into()),
        ScriptVal::Bool(v) => SteelVal::BoolV(*v),
        ScriptVal::Map(_) => bail!("map values do not cross the steel boundary"),
    })
}

fn from_steel(val: SteelVal) -> Result<ScriptVal> {
    Ok(match val {
        SteelVal::Void => ScriptVal::Unit,
        SteelVal::IntV(v) => ScriptVal::Int(v as i64),
        SteelVal::StringV(v) => ScriptVal::Str(v.to_string()),
        SteelVal::BoolV(v) => ScriptVal::Bool(v),
        other => bail!("unsupported steel value: {other:?}"),
    })
}

fn bridge_err(err: anyhow::Error) -> SteelErr {
    SteelErr::new(ErrorKind::Generic, err.to_string())
}

fn run_bridge(bridge: HostFn, args: &[ScriptVal]) -> Result<SteelVal, SteelErr> {
    let out = bridge(args).map_err(bridge_err)?;
    to_steel(&out).map_err(bridge_err)
}

impl ScriptEngine for SteelEngine {
    fn load(&mut self, source: &'static str) -> Result<()> {
        self.engine
            .compile_and_run_raw_program(source)
            .map_err(|err| anyhow!("steel load failed: {err}"))?;
        Ok(())
    }

    fn register_host_fn(&mut self, name: &'static str, arity: usize, bridge: HostFn) -> Result<()> {
        match arity {
            1 => {
                self.engine.register_fn(name, move |a: String| {
                    run_bridge(bridge, &[ScriptVal::Str(a)])
                });
            }
            2 => {
                self.engine.register_fn(name, move |a: String, b: String| {
                    run_bridge(bridge, &[ScriptVal::Str(a), ScriptVal::Str(b)])
                });
            }
            3 => {
                self.engine.register_fn(name, move |a: String, b: String, c: String| {
                    run_bridge(bridge, &[ScriptVal::Str(a), ScriptVal::Str(b), ScriptVal::Str(c)])
                });
            }
            other => bail!("unsupported bridge arity {other} for steel"),
        }
        Ok(())
    }

    fn call_by_name(&mut self, function: &str, args: &[ScriptVal]) -> Result<ScriptVal> {
        let mut steel_args = Vec::with_capacity(args.len());
        for arg in args {
            steel_args.push(to_steel(arg)?);
        }
        let out = self
            .engine
            .call_function_by_name_with_args(function, steel_args)
            .map_err(|err| anyhow!("steel call {function} failed: {err}"))?;
        from_steel(out)
    }
}

const FACTORIAL_SCRIPT: &str = r#"
(define (factorial n)
  (if (= n 1) n (* n (factorial (- n 1)))))
"#;

const REGEXP_SCRIPT: &str = r#"
(define (test-phone-number n)
  (re-test n "^\\d{3}\\d{4}\\d{4}$"))
"#;

const CONDITION_SCRIPT: &str = r#"
(define (complex-condition n)
  (cond ((and (>= n 0) (<= n 10)) "low")
        ((and (> n 10) (<= n 20)) "medium")
        ((and (> n 20) (<= n 30)) "high")
        (else "unknown")))
"#;

const FORMAT_TIME_SCRIPT: &str = r#"
(define (format-time t)
  (time-format t "%Y-%m-%dT%H:%M:%SZ" "%Y年%m月%d日 %H时%M分%S秒"))
"#;

const HASH_SCRIPT: &str = r#"
(define m (box (hash "key1" "value1"
                     "key2" "value2"
                     "key3" "value3"
                     "key4" "value4"
                     "key5" "value5"
                     "key6" "value6"
                     "key7" "value7"
                     "key8" "value8"
                     "key9" "value9"
                     "key10" "value10")))

(define (get-from-hash key)
  (if (hash-contains? (unbox m) key)
      (hash-ref (unbox m) key)
      (void)))

(define (set-in-hash key value)
  (set-box! m (hash-insert (unbox m) key value)))

(define (delete-from-hash key)
  (set-box! m (hash-remove (unbox m) key)))
"#;

const JSON_SCRIPT: &str = r#"
(define (call-parse-and-modify json-str)
  (parse-and-modify json-str))
"#;

const STRING_CONCAT_SCRIPT: &str = r#"
(define (string-concat a b c)
  (string-append a b c))
"#;

const JSON_PAYLOAD: &str = r#"{"name": "John", "age": 30, "city": "New York"}"#;

pub static CASES: &[CaseSpec] = &[
    CaseSpec {
        key: "factorial",
        title: "Recursive factorial",
        script: FACTORIAL_SCRIPT,
        bridges: &[],
        entry: "factorial",
        args: &[Literal::Int(10)],
        expected: Expected::Int(3_628_800),
    },
    CaseSpec {
        key: "regexp_match",
        title: "Regex match through the host bridge",
        script: REGEXP_SCRIPT,
        bridges: &[BridgeSpec { name: "re-test", arity: 2, run: bridge::regex_test }],
        entry: "test-phone-number",
        args: &[Literal::Str("15744882345")],
        expected: Expected::Bool(true),
    },
    CaseSpec {
        key: "complex_condition",
        title: "Multi-branch conditional",
        script: CONDITION_SCRIPT,
        bridges: &[],
        entry: "complex-condition",
        args: &[Literal::Int(15)],
        expected: Expected::Str("medium"),
    },
    CaseSpec {
        key: "format_time",
        title: "Date reformatting through the host bridge",
        script: FORMAT_TIME_SCRIPT,
        bridges: &[BridgeSpec { name: "time-format", arity: 3, run: bridge::format_time }],
        entry: "format-time",
        args: &[Literal::Str("2006-01-02T15:04:05Z")],
        expected: Expected::Str("2006年01月02日 15时04分05秒"),
    },
    CaseSpec {
        key: "hash_access",
        title: "Hash lookup",
        script: HASH_SCRIPT,
        bridges: &[],
        entry: "get-from-hash",
        args: &[Literal::Str("key5")],
        expected: Expected::Str("value5"),
    },
    CaseSpec {
        key: "hash_write",
        title: "Hash overwrite",
        script: HASH_SCRIPT,
        bridges: &[],
        entry: "set-in-hash",
        args: &[Literal::Str("key1"), Literal::Str("new_value")],
        expected: Expected::Unit,
    },
    CaseSpec {
        key: "hash_delete",
        title: "Hash delete",
        script: HASH_SCRIPT,
        bridges: &[],
        entry: "delete-from-hash",
        args: &[Literal::Str("key1")],
        expected: Expected::Unit,
    },
    CaseSpec {
        key: "json_parse_modify",
        title: "JSON parse-and-mutate through the host bridge",
        script: JSON_SCRIPT,
        bridges: &[BridgeSpec { name: "parse-and-modify", arity: 1, run: bridge::parse_and_modify }],
        entry: "call-parse-and-modify",
        args: &[Literal::Str(JSON_PAYLOAD)],
        expected: Expected::Str("new_name"),
    },
    CaseSpec {
        key: "string_concat",
        title: "String concatenation",
        script: STRING_CONCAT_SCRIPT,
        bridges: &[],
        entry: "string-concat",
        args: &[Literal::Str("hello"), Literal::Str(" "), Literal::Str("world")],
        expected: Expected::Str("hello world"),
    },
];
