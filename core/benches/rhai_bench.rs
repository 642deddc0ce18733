use criterion::{Criterion, criterion_group, criterion_main};
use scriptmark_core::engines::EngineKind;
use scriptmark_core::perf::scenarios::prepare_cases;
use std::hint::black_box;

fn bench_rhai_cases(c: &mut Criterion) {
    for case in prepare_cases(EngineKind::Rhai) {
        c.bench_function(&case.bench_case_name(), move |b| {
            let mut engine = case.engine().create().expect("create rhai engine");
            case.install(engine.as_mut()).expect("install rhai case");
            b.iter(|| {
                let value = case.invoke(engine.as_mut()).expect("rhai invocation failed");
                black_box(value);
            });
        });
    }
}

criterion_group!(rhai, bench_rhai_cases);
criterion_main!(rhai);
