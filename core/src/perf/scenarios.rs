use anyhow::{Context, Result, anyhow};

use crate::bridge::BridgeSpec;
use crate::engines::{EngineKind, ScriptEngine};
use crate::val::ScriptVal;

/// Fixed literal argument of a benchmark call.
#[derive(Clone, Copy, Debug)]
pub enum Literal {
    Int(i64),
    Str(&'static str),
    Bool(bool),
}

impl Literal {
    pub fn to_val(self) -> ScriptVal {
        match self {
            Literal::Int(v) => ScriptVal::Int(v),
            Literal::Str(v) => ScriptVal::Str(v.to_string()),
            Literal::Bool(v) => ScriptVal::Bool(v),
        }
    }
}

/// Fixed literal result a benchmark call must produce.
#[derive(Clone, Copy)]
pub enum Expected {
    Int(i64),
    Str(&'static str),
    Bool(bool),
    Unit,
}

impl Expected {
    pub fn verify(&self, actual: &ScriptVal) -> Result<()> {
        let matches = match self {
            Expected::Int(v) => actual == &ScriptVal::Int(*v),
            Expected::Str(v) => matches!(actual, ScriptVal::Str(s) if s == v),
            Expected::Bool(v) => actual == &ScriptVal::Bool(*v),
            Expected::Unit => actual == &ScriptVal::Unit,
        };
        if matches {
            Ok(())
        } else {
            Err(anyhow!("expected {:?} but observed {:?}", self, actual))
        }
    }
}

impl std::fmt::Debug for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Int(v) => write!(f, "Int({})", v),
            Expected::Str(v) => write!(f, "Str({:?})", v),
            Expected::Bool(v) => write!(f, "Bool({})", v),
            Expected::Unit => write!(f, "Unit"),
        }
    }
}

/// One engine x workload benchmark case: the script to load, the bridges it
/// needs, and the call-and-expect contract driven in the timed loop.
pub struct CaseSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub script: &'static str,
    pub bridges: &'static [BridgeSpec],
    pub entry: &'static str,
    pub args: &'static [Literal],
    pub expected: Expected,
}

#[derive(Clone)]
pub struct PreparedCase {
    spec: &'static CaseSpec,
    engine: EngineKind,
    args: Vec<ScriptVal>,
}

impl PreparedCase {
    pub fn key(&self) -> &'static str {
        self.spec.key
    }

    pub fn title(&self) -> &'static str {
        self.spec.title
    }

    pub fn entry(&self) -> &'static str {
        self.spec.entry
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn bench_case_name(&self) -> String {
        format!("{}_{}", self.spec.key, self.engine.name())
    }

    /// Register bridges and load the case script. Setup only; keep this
    /// outside the timed region.
    pub fn install(&self, engine: &mut dyn ScriptEngine) -> Result<()> {
        for bridge in self.spec.bridges {
            engine
                .register_host_fn(bridge.name, bridge.arity, bridge.run)
                .with_context(|| format!("register host fn {} for {}", bridge.name, self.bench_case_name()))?;
        }
        engine
            .load(self.spec.script)
            .with_context(|| format!("load script for {}", self.bench_case_name()))?;
        Ok(())
    }

    /// Invoke the case entry once with its fixed arguments and verify the
    /// expected literal. This is the timed unit.
    pub fn invoke(&self, engine: &mut dyn ScriptEngine) -> Result<ScriptVal> {
        let value = engine
            .call_by_name(self.spec.entry, &self.args)
            .with_context(|| format!("invoke {} for {}", self.spec.entry, self.bench_case_name()))?;
        self.spec
            .expected
            .verify(&value)
            .with_context(|| format!("unexpected result for {}", self.bench_case_name()))?;
        Ok(value)
    }

    /// Construct a fresh engine, install and invoke once.
    pub fn run_once(&self) -> Result<ScriptVal> {
        let mut engine = self.engine.create()?;
        self.install(engine.as_mut())?;
        self.invoke(engine.as_mut())
    }
}

pub fn prepare_cases(engine: EngineKind) -> Vec<PreparedCase> {
    engine
        .cases()
        .iter()
        .map(|spec| PreparedCase {
            spec,
            engine,
            args: spec.args.iter().map(|arg| arg.to_val()).collect(),
        })
        .collect()
}
