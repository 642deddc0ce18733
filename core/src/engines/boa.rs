//! JavaScript adapter over the Boa engine.

use anyhow::{Context as _, Result, anyhow};
use boa_engine::{
    Context, JsError, JsNativeError, JsResult, JsString, JsValue, NativeFunction, Source,
};

use crate::bridge::{self, BridgeSpec, HostFn};
use crate::engines::ScriptEngine;
use crate::perf::scenarios::{CaseSpec, Expected, Literal};
use crate::val::ScriptVal;

pub struct BoaEngine {
    context: Context,
}

impl BoaEngine {
    pub fn new() -> Self {
        Self {
            context: Context::default(),
        }
    }
}

impl Default for BoaEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn script_to_js(val: &ScriptVal) -> JsResult<JsValue> {
    Ok(match val {
        ScriptVal::Unit => JsValue::undefined(),
        ScriptVal::Int(v) => JsValue::from(*v as i32),
        ScriptVal::Str(v) => JsValue::from(JsString::from(v.as_str())),
        ScriptVal::Bool(v) => JsValue::from(*v),
        ScriptVal::Map(_) => {
            return Err(JsNativeError::typ()
                .with_message("map values do not cross the js boundary")
                .into());
        }
    })
}

fn js_to_script(value: &JsValue) -> JsResult<ScriptVal> {
    if value.is_undefined() || value.is_null() {
        return Ok(ScriptVal::Unit);
    }
    if let Some(b) = value.as_boolean() {
        return Ok(ScriptVal::Bool(b));
    }
    if let Some(n) = value.as_number() {
        if n.fract() == 0.0 {
            return Ok(ScriptVal::Int(n as i64));
        }
        return Err(JsNativeError::typ()
            .with_message(format!("non-integral number {n} crossed the js boundary"))
            .into());
    }
    if let Some(s) = value.as_string() {
        return Ok(ScriptVal::Str(s.to_std_string_escaped()));
    }
    Err(JsNativeError::typ()
        .with_message("unsupported js value crossed the boundary")
        .into())
}

fn js_err(err: JsError) -> anyhow::Error {
    anyhow!("{err}")
}

impl ScriptEngine for BoaEngine {
    fn load(&mut self, source: &'static str) -> Result<()> {
        self.context
            .eval(Source::from_bytes(source))
            .map_err(js_err)
            .context("boa eval failed")?;
        Ok(())
    }

    fn register_host_fn(&mut self, name: &'static str, arity: usize, bridge: HostFn) -> Result<()> {
        let native = NativeFunction::from_copy_closure(move |_this, args, _context| {
            let mut conv = Vec::with_capacity(args.len());
            for arg in args {
                conv.push(js_to_script(arg)?);
            }
            if conv.len() != arity {
                return Err(JsNativeError::typ()
                    .with_message(format!("{name} expects {arity} arguments, got {}", conv.len()))
                    .into());
            }
            let out = bridge(&conv)
                .map_err(|err| JsError::from(JsNativeError::error().with_message(err.to_string())))?;
            script_to_js(&out)
        });
        self.context
            .register_global_callable(JsString::from(name), arity, native)
            .map_err(js_err)
            .with_context(|| format!("register host fn {name}"))?;
        Ok(())
    }

    fn call_by_name(&mut self, function: &str, args: &[ScriptVal]) -> Result<ScriptVal> {
        let global = self.context.global_object().clone();
        let callee = global
            .get(JsString::from(function), &mut self.context)
            .map_err(js_err)
            .with_context(|| format!("resolve global {function}"))?;
        let callable = callee
            .as_callable()
            .ok_or_else(|| anyhow!("js global {function} is not callable"))?
            .clone();
        let mut js_args = Vec::with_capacity(args.len());
        for arg in args {
            js_args.push(script_to_js(arg).map_err(js_err)?);
        }
        let out = callable
            .call(&JsValue::undefined(), &js_args, &mut self.context)
            .map_err(js_err)
            .with_context(|| format!("js call {function} failed"))?;
        js_to_script(&out).map_err(js_err)
    }
}

const FACTORIAL_SCRIPT: &str = r#"
function factorial(n) {
    return n === 1 ? n : n * factorial(--n);
}
"#;

const REGEXP_SCRIPT: &str = r#"
function testPhoneNumber(phone) {
    return test(phone, "^\\d{3}\\d{4}\\d{4}$");
}
"#;

const CONDITION_SCRIPT: &str = r#"
function complex_condition(n) {
  if (n >= 0 && n <= 10) {
    return "low";
  } else if (n > 10 && n <= 20) {
    return "medium";
  } else if (n > 20 && n <= 30) {
    return "high";
  } else {
    return "unknown";
  }
}
"#;

const FORMAT_TIME_SCRIPT: &str = r#"
function formatTime(t) {
    return format(t, "%Y-%m-%dT%H:%M:%SZ", "%Y年%m月%d日 %H时%M分%S秒");
}
"#;

const HASH_SCRIPT: &str = r#"
const m = {
    "key1": "value1",
    "key2": "value2",
    "key3": "value3",
    "key4": "value4",
    "key5": "value5",
    "key6": "value6",
    "key7": "value7",
    "key8": "value8",
    "key9": "value9",
    "key10": "value10"
};

function get_from_hash(key) {
    return m[key];
}

function set_in_hash(key, value) {
    m[key] = value;
}

function delete_from_hash(key) {
    delete m[key];
}
"#;

const JSON_SCRIPT: &str = r#"
function parse_and_modify(json_str) {
    let data = JSON.parse(json_str);
    data.name = "new_name";
    return data.name;
}
"#;

const STRING_CONCAT_SCRIPT: &str = r#"
function stringConcat(a, b, c) {
    return a + b + c;
}
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
        bridges: &[BridgeSpec { name: "test", arity: 2, run: bridge::regex_test }],
        entry: "testPhoneNumber",
        args: &[Literal::Str("15744882345")],
        expected: Expected::Bool(true),
    },
    CaseSpec {
        key: "complex_condition",
        title: "Multi-branch conditional",
        script: CONDITION_SCRIPT,
        bridges: &[],
        entry: "complex_condition",
        args: &[Literal::Int(15)],
        expected: Expected::Str("medium"),
    },
    CaseSpec {
        key: "format_time",
        title: "Date reformatting through the host bridge",
        script: FORMAT_TIME_SCRIPT,
        bridges: &[BridgeSpec { name: "format", arity: 3, run: bridge::format_time }],
        entry: "formatTime",
        args: &[Literal::Str("2006-01-02T15:04:05Z")],
        expected: Expected::Str("2006年01月02日 15时04分05秒"),
    },
    CaseSpec {
        key: "hash_access",
        title: "Hash lookup",
        script: HASH_SCRIPT,
        bridges: &[],
        entry: "get_from_hash",
        args: &[Literal::Str("key5")],
        expected: Expected::Str("value5"),
    },
    CaseSpec {
        key: "hash_write",
        title: "Hash overwrite",
        script: HASH_SCRIPT,
        bridges: &[],
        entry: "set_in_hash",
        args: &[Literal::Str("key1"), Literal::Str("new_value")],
        expected: Expected::Unit,
    },
    CaseSpec {
        key: "hash_delete",
        title: "Hash delete",
        script: HASH_SCRIPT,
        bridges: &[],
        entry: "delete_from_hash",
        args: &[Literal::Str("key1")],
        expected: Expected::Unit,
    },
    CaseSpec {
        key: "json_parse_modify",
        title: "Native JSON parse-and-mutate",
        script: JSON_SCRIPT,
        bridges: &[],
        entry: "parse_and_modify",
        args: &[Literal::Str(JSON_PAYLOAD)],
        expected: Expected::Str("new_name"),
    },
    CaseSpec {
        key: "string_concat",
        title: "String concatenation",
        script: STRING_CONCAT_SCRIPT,
        bridges: &[],
        entry: "stringConcat",
        args: &[Literal::Str("hello"), Literal::Str(" "), Literal::Str("world")],
        expected: Expected::Str("hello world"),
    },
];
