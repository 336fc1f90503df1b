//! Configuration bus benchmarks
//!
//! Measures raw table operations on a bus with no listeners, and the cost of
//! dispatching to access listeners as the listener count grows per key and
//! across keys.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use figura::config_bus::{
    AccessMask, ConfigBus, NamedEnvironment, ParameterListener, new_synchronous_config,
};

type Bus = ConfigBus<i32, i32>;

const TABLE_SIZE: i32 = 10_000;

fn bus() -> Arc<Bus> {
    let mut env = NamedEnvironment::new("bench");
    new_synchronous_config(&mut env)
}

fn populated_bus(size: i32) -> Arc<Bus> {
    let bus = bus();
    for i in 0..size {
        bus.set_parameter(i, i).unwrap();
    }
    bus
}

fn zero_listener() -> ParameterListener<i32> {
    ParameterListener::new(|_: Option<&i32>, _| Ok(()))
}

fn bench_kv(c: &mut Criterion) {
    let mut group = c.benchmark_group("kv");

    group.bench_function("insertion_prebuilt", |b| {
        let bus = bus();
        b.iter(|| bus.set_parameter(black_box(0), black_box(0)).unwrap());
    });

    group.bench_function("insertion", |b| {
        let bus = bus();
        let mut next = 0;
        b.iter(|| {
            bus.set_parameter(black_box(next), next).unwrap();
            next = next.wrapping_add(1);
        });
    });

    group.bench_function("lookup", |b| {
        let bus = populated_bus(TABLE_SIZE);
        let mut next = 0;
        b.iter(|| {
            black_box(bus.get_parameter(&next).unwrap());
            next = (next + 1) % TABLE_SIZE;
        });
    });

    group.bench_function("lookup_prebuilt", |b| {
        let bus = populated_bus(1);
        b.iter(|| black_box(bus.get_parameter(black_box(&0)).unwrap()));
    });

    group.bench_function("removal", |b| {
        b.iter_batched(
            || populated_bus(1),
            |bus| black_box(bus.remove_parameter(&0).unwrap()),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_access_callbacks(c: &mut Criterion) {
    let mut group = c.benchmark_group("access_callback");

    for (name, mask) in [
        ("read", AccessMask::READ),
        ("write", AccessMask::WRITE),
        ("any", AccessMask::ANY),
    ] {
        let bus = populated_bus(1);
        bus.add_parameter_listener(0, mask, &zero_listener())
            .unwrap();

        group.bench_function(BenchmarkId::new(name, "on_read"), |b| {
            b.iter(|| black_box(bus.get_parameter(&0).unwrap()));
        });
        group.bench_function(BenchmarkId::new(name, "on_write"), |b| {
            b.iter(|| bus.set_parameter(0, black_box(0)).unwrap());
        });
    }

    group.finish();
}

fn bench_scaled_listeners(c: &mut Criterion) {
    let mut group = c.benchmark_group("any_callback_on_read");

    for count in [10, 100, 1_000] {
        let vertical = populated_bus(count);
        for key in 0..count {
            vertical
                .add_parameter_listener(key, AccessMask::ANY, &zero_listener())
                .unwrap();
        }
        group.bench_with_input(BenchmarkId::new("vertically_scaled", count), &count, |b, &count| {
            let mut next = 0;
            b.iter(|| {
                black_box(vertical.get_parameter(&next).unwrap());
                next = (next + 1) % count;
            });
        });

        let horizontal = populated_bus(1);
        for _ in 0..count {
            horizontal
                .add_parameter_listener(0, AccessMask::ANY, &zero_listener())
                .unwrap();
        }
        group.bench_with_input(BenchmarkId::new("horizontally_scaled", count), &count, |b, _| {
            b.iter(|| black_box(horizontal.get_parameter(&0).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kv, bench_access_callbacks, bench_scaled_listeners);
criterion_main!(benches);
