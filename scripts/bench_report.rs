//! Run-once reporter for the scriptmark suite.
//!
//! Drives every engine x workload case a fixed number of iterations with
//! plain wall-clock timing and prints a per-case table. Useful as a smoke
//! check and CI artifact without criterion's runtime; `--json <path>` writes
//! the same numbers as a machine-readable report.

use anyhow::{Context, Result, anyhow, bail};
use scriptmark_core::engines::EngineKind;
use scriptmark_core::perf::scenarios::{PreparedCase, prepare_cases};
use serde::Serialize;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

const WARMUP_ITERS: u32 = 20;
const MEASURE_ITERS: u32 = 200;

#[derive(Debug, Serialize)]
struct CaseReport {
    engine: &'static str,
    case: String,
    title: &'static str,
    iterations: u32,
    mean_ns: f64,
}

struct Options {
    json_path: Option<PathBuf>,
}

fn parse_options() -> Result<Options> {
    let mut opts = Options { json_path: None };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => {
                let path = args.next().ok_or_else(|| anyhow!("--json requires a path"))?;
                opts.json_path = Some(PathBuf::from(path));
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(opts)
}

fn measure_case(case: &PreparedCase) -> Result<CaseReport> {
    let mut engine = case.engine().create()?;
    case.install(engine.as_mut())?;
    for _ in 0..WARMUP_ITERS {
        case.invoke(engine.as_mut())?;
    }
    let start = Instant::now();
    for _ in 0..MEASURE_ITERS {
        case.invoke(engine.as_mut())?;
    }
    let elapsed = start.elapsed();
    Ok(CaseReport {
        engine: case.engine().name(),
        case: case.bench_case_name(),
        title: case.title(),
        iterations: MEASURE_ITERS,
        mean_ns: elapsed.as_nanos() as f64 / f64::from(MEASURE_ITERS),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = parse_options()?;
    let mut reports = Vec::new();
    for kind in EngineKind::ALL {
        tracing::info!(engine = kind.name(), "running cases");
        for case in prepare_cases(kind) {
            let report =
                measure_case(&case).with_context(|| format!("case {}", case.bench_case_name()))?;
            println!("{:<28} {:>14.1} ns/op", report.case, report.mean_ns);
            reports.push(report);
        }
    }

    if let Some(path) = opts.json_path {
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &reports).context("serialize report")?;
        writer.flush().context("flush report")?;
        tracing::info!(path = %path.display(), "wrote json report");
    }
    Ok(())
}
