//! Dispatch benchmarks for the registry.
//!
//! Measures the cost of a call through the effective method table, with and
//! without keyword binding, and the instance lifecycle.
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lwc::prelude::*;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Print accumulated time per top-level scope.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };

    let view = frame_view.lock();
    let scope_collection = view.scope_collection();
    let mut scope_timings: HashMap<String, i64> = HashMap::new();
    let mut frame_count = 0i64;

    for frame in view.recent_frames() {
        frame_count += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread_info, stream_info) in unpacked.thread_streams.iter() {
            let reader = Reader::from_start(&stream_info.stream);
            if let Ok(scopes) = reader.read_top_scopes() {
                for scope in scopes {
                    if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
                        *scope_timings.entry(details.name().to_string()).or_insert(0) +=
                            scope.record.duration_ns;
                    }
                }
            }
        }
    }

    println!("\n=== Profiling Summary ({} frames) ===", frame_count);
    let mut entries: Vec<_> = scope_timings.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, ns) in entries {
        let avg_ns = if frame_count > 0 { ns / frame_count } else { ns };
        println!(
            "  {:30} {:>10.2?} avg",
            name,
            std::time::Duration::from_nanos(avg_ns as u64)
        );
    }
    println!("=====================================\n");
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

fn registry() -> Registry {
    let mut registry = lwc::initialize(RegistryConfig::new()).unwrap();
    registry.set_output(Box::new(std::io::sink()));
    registry
}

/// Single calls through inherited and own table entries.
fn call_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut registry = registry();
    let list = registry.create("pytest.ObjectList2").unwrap();
    let item = registry.create("test.Box").unwrap();
    for _ in 0..64 {
        registry.call(list, "push", &[item.into()]).unwrap();
    }

    let mut group = c.benchmark_group("dispatch/call");
    group.throughput(Throughput::Elements(1));

    group.bench_function("size", |b| {
        b.iter(|| black_box(registry.call(black_box(list), "size", &[]).unwrap()));
    });

    group.bench_function("at", |b| {
        b.iter(|| {
            let value = registry.call(list, "at", &[Dynamic::Int(black_box(31))]).unwrap();
            end_profiling_frame();
            black_box(value)
        });
    });

    group.bench_function("print_int_keyword", |b| {
        b.iter(|| {
            registry
                .invoke(
                    list,
                    "printInt",
                    &[Dynamic::Int(10)],
                    &[("indent", black_box("=> ").into())],
                )
                .unwrap()
        });
    });

    let double = registry.create("test.DoubleBox").unwrap();
    group.bench_function("overridden_setter", |b| {
        b.iter(|| registry.call(double, "setWidth", &[Dynamic::Int(black_box(7))]).unwrap());
    });

    group.finish();
    print_profiling_stats();
}

/// Fill a list through the registry.
fn fill_benchmarks(c: &mut Criterion) {
    let mut registry = registry();
    let item = registry.create("rbtest.Point").unwrap();

    let mut group = c.benchmark_group("dispatch/fill");
    for count in [16usize, 256, 4096] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let list = registry.create("pytest.ObjectList").unwrap();
                for _ in 0..count {
                    registry.call(list, "push", &[item.into()]).unwrap();
                }
                registry.destroy(list).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, call_benchmarks, fill_benchmarks);
criterion_main!(benches);
