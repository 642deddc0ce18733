use criterion::{Criterion, criterion_group, criterion_main};
use scriptmark_core::engines::EngineKind;
use scriptmark_core::perf::scenarios::prepare_cases;
use std::hint::black_box;

fn bench_rlua_cases(c: &mut Criterion) {
    for case in prepare_cases(EngineKind::Rlua) {
        c.bench_function(&case.bench_case_name(), move |b| {
            let mut engine = case.engine().create().expect("create rlua engine");
            case.install(engine.as_mut()).expect("install rlua case");
            b.iter(|| {
                let value = case.invoke(engine.as_mut()).expect("rlua invocation failed");
                black_box(value);
            });
        });
    }
}

criterion_group!(rlua, bench_rlua_cases);
criterion_main!(rlua);
