//! Shared benchmark scaffolding used by the criterion benches and the
//! run-once reporter.
//!
//! Centralizing the case tables here keeps the per-engine benches, the
//! reporter and the tests in sync so we do not accidentally compare
//! different workloads across engines.

pub mod scenarios;
