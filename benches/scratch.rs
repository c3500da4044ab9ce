//! Benchmarks for scratch memory.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nexvi::mem::{GrowableBuffer, ScratchArena};
use nexvi::message::MessageQueue;

fn bench_shared_acquire_release(c: &mut Criterion) {
    let arena = ScratchArena::with_capacity(4096).unwrap();
    let mut sink = MessageQueue::new();
    c.bench_function("scratch_shared", |b| {
        b.iter(|| {
            let mut buf = arena.acquire(black_box(1024), &mut sink).unwrap();
            buf[0] = 1;
            buf.release();
        })
    });
}

fn bench_nested_acquire(c: &mut Criterion) {
    let arena = ScratchArena::with_capacity(4096).unwrap();
    let mut sink = MessageQueue::new();
    let _outer = arena.acquire(16, &mut sink).unwrap();
    c.bench_function("scratch_private", |b| {
        b.iter(|| {
            let mut buf = arena.acquire(black_box(1024), &mut sink).unwrap();
            buf[0] = 1;
            buf.release();
        })
    });
}

fn bench_grow_from_empty(c: &mut Criterion) {
    c.bench_function("growable_grow_to_64k", |b| {
        b.iter(|| {
            let mut buf = GrowableBuffer::new();
            let mut size = 1;
            while size <= 65536 {
                buf.ensure_capacity(black_box(size)).unwrap();
                size *= 2;
            }
            buf
        })
    });
}

criterion_group!(
    benches,
    bench_shared_acquire_release,
    bench_nested_acquire,
    bench_grow_from_empty
);
criterion_main!(benches);
