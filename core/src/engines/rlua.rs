//! Lua adapter over `rlua` and its context-scoped embedding API.

use anyhow::{Context as _, Result, anyhow, bail};
use rlua::{Function, Lua, MultiValue, Value};

use crate::bridge::{self, BridgeSpec, HostFn};
use crate::engines::ScriptEngine;
use crate::perf::scenarios::{CaseSpec, Expected, Literal};
use crate::val::ScriptVal;

pub struct RluaEngine {
    lua: Lua,
}

impl RluaEngine {
    pub fn new() -> Self {
        Self { lua: Lua::new() }
    }
}

impl Default for RluaEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_rlua<'lua>(ctx: rlua::Context<'lua>, val: &ScriptVal) -> rlua::Result<Value<'lua>> {
    Ok(match val {
        ScriptVal::Unit => Value::Nil,
        ScriptVal::Int(v) => Value::Integer(*v),
        ScriptVal::Str(v) => Value::String(ctx.create_string(v)?),
        ScriptVal::Bool(v) => Value::Boolean(*v),
        ScriptVal::Map(_) => {
            return Err(rlua::Error::external(anyhow!("map values do not cross the lua boundary")));
        }
    })
}

fn from_rlua(value: Value) -> Result<ScriptVal> {
    Ok(match value {
        Value::Nil => ScriptVal::Unit,
        Value::Boolean(b) => ScriptVal::Bool(b),
        Value::Integer(i) => ScriptVal::Int(i),
        Value::Number(n) if n.fract() == 0.0 => ScriptVal::Int(n as i64),
        Value::String(s) => ScriptVal::Str(s.to_str()?.to_string()),
        other => bail!("unsupported lua value: {other:?}"),
    })
}

impl ScriptEngine for RluaEngine {
    fn load(&mut self, source: &'static str) -> Result<()> {
        self.lua
            .context(|ctx| ctx.load(source).exec())
            .context("rlua load failed")?;
        Ok(())
    }

    fn register_host_fn(&mut self, name: &'static str, arity: usize, bridge: HostFn) -> Result<()> {
        self.lua
            .context(|ctx| {
                let func = ctx.create_function(move |ctx, args: MultiValue| {
                    let mut conv = Vec::with_capacity(args.len());
                    for value in args {
                        conv.push(from_rlua(value).map_err(rlua::Error::external)?);
                    }
                    if conv.len() != arity {
                        return Err(rlua::Error::external(anyhow!(
                            "{name} expects {arity} arguments, got {}",
                            conv.len()
                        )));
                    }
                    let out = bridge(&conv).map_err(rlua::Error::external)?;
                    to_rlua(ctx, &out)
                })?;
                ctx.globals().set(name, func)
            })
            .with_context(|| format!("register host fn {name}"))?;
        Ok(())
    }

    fn call_by_name(&mut self, function: &str, args: &[ScriptVal]) -> Result<ScriptVal> {
        self.lua.context(|ctx| -> Result<ScriptVal> {
            let func: Function = ctx
                .globals()
                .get(function)
                .with_context(|| format!("lua global {function} is not a function"))?;
            let mut lua_args = Vec::with_capacity(args.len());
            for arg in args {
                lua_args.push(to_rlua(ctx, arg)?);
            }
            let out: Value = func
                .call(MultiValue::from_vec(lua_args))
                .with_context(|| format!("lua call {function} failed"))?;
            from_rlua(out)
        })
    }
}

const FACTORIAL_SCRIPT: &str = r#"
function factorial(n)
  if n == 1 then
    return 1
  end
  return n * factorial(n-1)
end
"#;

const REGEXP_SCRIPT: &str = r#"
function testPhoneNumber(n)
  return test(n, "^\\d{3}\\d{4}\\d{4}$")
end
"#;

const CONDITION_SCRIPT: &str = r#"
function complex_condition(n)
  if n >= 0 and n <= 10 then
    return "low"
  elseif n > 10 and n <= 20 then
    return "medium"
  elseif n > 20 and n <= 30 then
    return "high"
  else
    return "unknown"
  end
end
"#;

const FORMAT_TIME_SCRIPT: &str = r#"
function formatTime(t)
  return format(t, "%Y-%m-%dT%H:%M:%SZ", "%Y年%m月%d日 %H时%M分%S秒")
end
"#;

const HASH_SCRIPT: &str = r#"
local m = {
    ["key1"] = "value1",
    ["key2"] = "value2",
    ["key3"] = "value3",
    ["key4"] = "value4",
    ["key5"] = "value5",
    ["key6"] = "value6",
    ["key7"] = "value7",
    ["key8"] = "value8",
    ["key9"] = "value9",
    ["key10"] = "value10"
}

function get_from_hash(key)
    return m[key]
end

function set_in_hash(key, value)
    m[key] = value
end

function delete_from_hash(key)
    m[key] = nil
end
"#;

const JSON_SCRIPT: &str = r#"
function call_parse_and_modify(json_str)
  return parse_and_modify(json_str)
end
"#;

const STRING_CONCAT_SCRIPT: &str = r#"
function stringConcat(a, b, c)
  return a .. b .. c
end
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
        title: "JSON parse-and-mutate through the host bridge",
        script: JSON_SCRIPT,
        bridges: &[BridgeSpec { name: "parse_and_modify", arity: 1, run: bridge::parse_and_modify }],
        entry: "call_parse_and_modify",
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
