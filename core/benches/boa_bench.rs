use criterion::{Criterion, criterion_group, criterion_main};
use scriptmark_core::engines::EngineKind;
use scriptmark_core::perf::scenarios::prepare_cases;
use std::hint::black_box;

fn bench_boa_cases(c: &mut Criterion) {
    for case in prepare_cases(EngineKind::Boa) {
        c.bench_function(&case.bench_case_name(), move |b| {
            let mut engine = case.engine().create().expect("create boa engine");
            case.install(engine.as_mut()).expect("install boa case");
            b.iter(|| {
                let value = case.invoke(engine.as_mut()).expect("boa invocation failed");
                black_box(value);
            });
        });
    }
}

criterion_group!(boa, bench_boa_cases);
criterion_main!(boa);
