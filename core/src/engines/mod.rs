//! Embedding adapters for the engines under benchmark.
//!
//! Each adapter owns one interpreter instance, exclusively, for the lifetime
//! of a single benchmark case. Calls are synchronous and blocking.

pub mod boa;
pub mod lua;
pub mod rhai;
pub mod rlua;
pub mod steel;

#[cfg(test)]
mod engines_test;

use anyhow::Result;

use crate::bridge::HostFn;
use crate::perf::scenarios::CaseSpec;
use crate::val::ScriptVal;

/// The embedding contract every engine satisfies: load a script defining
/// functions, optionally expose host bridges to it, then invoke exported
/// functions by name with literal arguments.
pub trait ScriptEngine {
    /// Evaluate a script, defining its functions and globals in this
    /// instance. A parse or eval failure is an error.
    fn load(&mut self, source: &'static str) -> Result<()>;

    /// Expose a host bridge function to scripts under `name`. Must be called
    /// before [`ScriptEngine::load`] so the script can resolve the name.
    fn register_host_fn(&mut self, name: &'static str, arity: usize, bridge: HostFn) -> Result<()>;

    /// Invoke a function defined by the loaded script.
    fn call_by_name(&mut self, function: &str, args: &[ScriptVal]) -> Result<ScriptVal>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    Steel,
    Boa,
    Lua,
    Rlua,
    Rhai,
}

impl EngineKind {
    pub const ALL: [EngineKind; 5] = [
        EngineKind::Steel,
        EngineKind::Boa,
        EngineKind::Lua,
        EngineKind::Rlua,
        EngineKind::Rhai,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Steel => "steel",
            EngineKind::Boa => "boa",
            EngineKind::Lua => "lua",
            EngineKind::Rlua => "rlua",
            EngineKind::Rhai => "rhai",
        }
    }

    pub fn cases(self) -> &'static [CaseSpec] {
        match self {
            EngineKind::Steel => steel::CASES,
            EngineKind::Boa => boa::CASES,
            EngineKind::Lua => lua::CASES,
            EngineKind::Rlua => rlua::CASES,
            EngineKind::Rhai => rhai::CASES,
        }
    }

    /// Fresh isolated interpreter instance.
    pub fn create(self) -> Result<Box<dyn ScriptEngine>> {
        Ok(match self {
            EngineKind::Steel => Box::new(steel::SteelEngine::new()),
            EngineKind::Boa => Box::new(boa::BoaEngine::new()),
            EngineKind::Lua => Box::new(lua::LuaEngine::new()),
            EngineKind::Rlua => Box::new(rlua::RluaEngine::new()),
            EngineKind::Rhai => Box::new(rhai::RhaiEngine::new()),
        })
    }
}
