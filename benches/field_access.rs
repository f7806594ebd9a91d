use criterion::{Criterion, criterion_group, criterion_main};
use nativestruct::{Proxy, native_struct};

native_struct! {
    pub struct Telemetry {
        pub id: u32,
        pub status: u8,
        pub temperature: f32,
        pub uptime: u64,
    }
}

fn bench_field_access(c: &mut Criterion) {
    let mut proxy = Proxy::<Telemetry>::new();

    c.bench_function("typed_write_read", |b| {
        b.iter(|| {
            proxy.write(Telemetry::uptime, 123_456);
            proxy.read(Telemetry::uptime)
        })
    });

    c.bench_function("dynamic_set_get", |b| {
        b.iter(|| {
            proxy.set("uptime", 123_456u64).unwrap();
            proxy.get("uptime").unwrap()
        })
    });

    c.bench_function("dynamic_set_out_of_range", |b| {
        b.iter(|| proxy.set("status", 1_000u32).is_err())
    });
}

criterion_group!(benches, bench_field_access);
criterion_main!(benches);
