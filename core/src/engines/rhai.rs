//! Rhai adapter. Script functions are pure in Rhai, so the hash workload
//! keeps its map in closures that capture it as a shared value; entries that
//! name a closure are resolved from the scope as `FnPtr`s.

use anyhow::{Result, anyhow, bail};
use rhai::{AST, Dynamic, Engine, EvalAltResult, FnPtr, Map, Scope};

use crate::bridge::{self, BridgeSpec, HostFn};
use crate::engines::ScriptEngine;
use crate::perf::scenarios::{CaseSpec, Expected, Literal};
use crate::val::ScriptVal;

pub struct RhaiEngine {
    engine: Engine,
    scope: Scope<'static>,
    ast: Option<AST>,
}

impl RhaiEngine {
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
            scope: Scope::new(),
            ast: None,
        }
    }
}

impl Default for RhaiEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_dynamic(val: &ScriptVal) -> Result<Dynamic> {
    Ok(match val {
        ScriptVal::Unit => Dynamic::UNIT,
        ScriptVal::Int(v) => Dynamic::from(*v),
        ScriptVal::Str(v) => Dynamic::from(v.clone()),
        ScriptVal::Bool(v) => Dynamic::from(*v),
        ScriptVal::Map(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                out.insert(key.clone().into(), to_dynamic(value)?);
            }
            Dynamic::from(out)
        }
    })
}

fn from_dynamic(value: Dynamic) -> Result<ScriptVal> {
    if value.is_unit() {
        return Ok(ScriptVal::Unit);
    }
    if value.is_bool() {
        return Ok(ScriptVal::Bool(value.as_bool().map_err(cast_err)?));
    }
    if value.is_int() {
        return Ok(ScriptVal::Int(value.as_int().map_err(cast_err)?));
    }
    if value.is_string() {
        return Ok(ScriptVal::Str(value.into_string().map_err(cast_err)?));
    }
    bail!("unsupported rhai value: {}", value.type_name())
}

fn cast_err(type_name: &'static str) -> anyhow::Error {
    anyhow!("rhai value changed type during cast: {type_name}")
}

fn run_bridge(bridge: HostFn, args: &[ScriptVal]) -> Result<Dynamic, Box<EvalAltResult>> {
    let out = bridge(args).map_err(|err| -> Box<EvalAltResult> { err.to_string().into() })?;
    to_dynamic(&out).map_err(|err| err.to_string().into())
}

impl ScriptEngine for RhaiEngine {
    fn load(&mut self, source: &'static str) -> Result<()> {
        let ast = self
            .engine
            .compile(source)
            .map_err(|err| anyhow!("rhai compile failed: {err}"))?;
        self.engine
            .run_ast_with_scope(&mut self.scope, &ast)
            .map_err(|err| anyhow!("rhai eval failed: {err}"))?;
        self.ast = Some(ast);
        Ok(())
    }

    fn register_host_fn(&mut self, name: &'static str, arity: usize, bridge: HostFn) -> Result<()> {
        match arity {
            1 => {
                self.engine.register_fn(name, move |a: &str| {
                    run_bridge(bridge, &[ScriptVal::Str(a.to_string())])
                });
            }
            2 => {
                self.engine.register_fn(name, move |a: &str, b: &str| {
                    run_bridge(bridge, &[ScriptVal::Str(a.to_string()), ScriptVal::Str(b.to_string())])
                });
            }
            3 => {
                self.engine.register_fn(name, move |a: &str, b: &str, c: &str| {
                    run_bridge(
                        bridge,
                        &[
                            ScriptVal::Str(a.to_string()),
                            ScriptVal::Str(b.to_string()),
                            ScriptVal::Str(c.to_string()),
                        ],
                    )
                });
            }
            other => bail!("unsupported bridge arity {other} for rhai"),
        }
        Ok(())
    }

    fn call_by_name(&mut self, function: &str, args: &[ScriptVal]) -> Result<ScriptVal> {
        let ast = self.ast.as_ref().ok_or_else(|| anyhow!("no script loaded"))?;
        let mut dyn_args = Vec::with_capacity(args.len());
        for arg in args {
            dyn_args.push(to_dynamic(arg)?);
        }
        if let Some(fp) = self.scope.get_value::<FnPtr>(function) {
            let out: Dynamic = fp
                .call(&self.engine, ast, dyn_args)
                .map_err(|err| anyhow!("rhai call {function} failed: {err}"))?;
            return from_dynamic(out);
        }
        let out: Dynamic = self
            .engine
            .call_fn(&mut self.scope, ast, function, dyn_args)
            .map_err(|err| anyhow!("rhai call {function} failed: {err}"))?;
        from_dynamic(out)
    }
}

const FACTORIAL_SCRIPT: &str = r#"
fn factorial(n) {
    if n == 1 { n } else { n * factorial(n - 1) }
}
"#;

const REGEXP_SCRIPT: &str = r#"
fn test_phone_number(phone) {
    test(phone, "^\\d{3}\\d{4}\\d{4}$")
}
"#;

const CONDITION_SCRIPT: &str = r#"
fn complex_condition(n) {
    if n >= 0 && n <= 10 {
        "low"
    } else if n > 10 && n <= 20 {
        "medium"
    } else if n > 20 && n <= 30 {
        "high"
    } else {
        "unknown"
    }
}
"#;

const FORMAT_TIME_SCRIPT: &str = r#"
fn format_time(t) {
    format(t, "%Y-%m-%dT%H:%M:%SZ", "%Y年%m月%d日 %H时%M分%S秒")
}
"#;

const HASH_SCRIPT: &str = r#"
let m = #{
    key1: "value1",
    key2: "value2",
    key3: "value3",
    key4: "value4",
    key5: "value5",
    key6: "value6",
    key7: "value7",
    key8: "value8",
    key9: "value9",
    key10: "value10"
};

let get_from_hash = |key| if key in m { m[key] } else { () };
let set_in_hash = |key, value| { m[key] = value; };
let delete_from_hash = |key| { m.remove(key); };
"#;

const JSON_SCRIPT: &str = r#"
fn parse_and_modify(json_str) {
    let data = parse_json(json_str);
    data.name = "new_name";
    data.name
}
"#;

const STRING_CONCAT_SCRIPT: &str = r#"
fn string_concat(a, b, c) {
    a + b + c
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
        entry: "test_phone_number",
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
        entry: "format_time",
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
        title: "JSON parse-and-mutate via the host parser",
        script: JSON_SCRIPT,
        bridges: &[BridgeSpec { name: "parse_json", arity: 1, run: bridge::parse_json }],
        entry: "parse_and_modify",
        args: &[Literal::Str(JSON_PAYLOAD)],
        expected: Expected::Str("new_name"),
    },
    CaseSpec {
        key: "string_concat",
        title: "String concatenation",
        script: STRING_CONCAT_SCRIPT,
        bridges: &[],
        entry: "string_concat",
        args: &[Literal::Str("hello"), Literal::Str(" "), Literal::Str("world")],
        expected: Expected::Str("hello world"),
    },
];
