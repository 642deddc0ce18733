//! Host-side bridge functions exposed to embedded scripts.
//!
//! Engines without a built-in regex, date or JSON facility call back into
//! the host through these. All bridges share one signature so that every
//! adapter can wrap them into its native callback form; failures surface as
//! errors through the engine's own error convention, never as panics.

mod regex_cache;

#[cfg(test)]
mod bridge_test;

use anyhow::{Context, Result, anyhow, bail, ensure};
use chrono::NaiveDateTime;

use crate::val::ScriptVal;

pub use regex_cache::compile_cached;

/// Host function callable from a script. Arguments arrive already converted
/// to [`ScriptVal`]s by the engine adapter.
pub type HostFn = fn(&[ScriptVal]) -> Result<ScriptVal>;

/// A bridge a benchmark case registers before loading its script.
#[derive(Clone, Copy)]
pub struct BridgeSpec {
    pub name: &'static str,
    pub arity: usize,
    pub run: HostFn,
}

fn str_arg<'a>(args: &'a [ScriptVal], idx: usize) -> Result<&'a str> {
    match args.get(idx) {
        Some(ScriptVal::Str(s)) => Ok(s),
        Some(other) => bail!("bridge argument {idx} must be a string, got {other:?}"),
        None => bail!("bridge argument {idx} is missing"),
    }
}

/// `(text, pattern) -> bool`. Compiled patterns are memoized process-wide so
/// the timed loop measures match cost, not compile cost.
pub fn regex_test(args: &[ScriptVal]) -> Result<ScriptVal> {
    ensure!(args.len() == 2, "regex_test takes (text, pattern), got {} arguments", args.len());
    let text = str_arg(args, 0)?;
    let pattern = str_arg(args, 1)?;
    let re = compile_cached(pattern)?;
    Ok(ScriptVal::Bool(re.is_match(text)))
}

/// `(value, layout, new_layout) -> string`. Layouts are chrono `%`-style.
pub fn format_time(args: &[ScriptVal]) -> Result<ScriptVal> {
    ensure!(args.len() == 3, "format_time takes (value, layout, new_layout), got {} arguments", args.len());
    let value = str_arg(args, 0)?;
    let layout = str_arg(args, 1)?;
    let new_layout = str_arg(args, 2)?;
    let parsed = NaiveDateTime::parse_from_str(value, layout)
        .with_context(|| format!("parse {value:?} with layout {layout:?}"))?;
    Ok(ScriptVal::Str(parsed.format(new_layout).to_string()))
}

/// `(json) -> string`. Full host-side JSON workload for engines without a
/// script-side parser: parse, overwrite `name`, hand the new value back.
pub fn parse_and_modify(args: &[ScriptVal]) -> Result<ScriptVal> {
    ensure!(args.len() == 1, "parse_and_modify takes (json), got {} arguments", args.len());
    let raw = str_arg(args, 0)?;
    let mut data: serde_json::Value = serde_json::from_str(raw).context("parse json payload")?;
    let entries = data
        .as_object_mut()
        .ok_or_else(|| anyhow!("json payload must be an object"))?;
    entries.insert("name".to_string(), serde_json::Value::String("new_name".to_string()));
    let name = entries
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("name is not a string after modification"))?;
    Ok(ScriptVal::Str(name.to_string()))
}

/// `(json) -> map`. Script-side JSON workload: the script mutates the
/// returned structure itself.
pub fn parse_json(args: &[ScriptVal]) -> Result<ScriptVal> {
    ensure!(args.len() == 1, "parse_json takes (json), got {} arguments", args.len());
    let raw = str_arg(args, 0)?;
    let data: serde_json::Value = serde_json::from_str(raw).context("parse json payload")?;
    ScriptVal::from_json(data)
}
