use criterion::{Criterion, criterion_group, criterion_main};
use std::sync::mpsc;
use std::thread;
use stoplight::channel::Channel;

fn bench_crate_channel(c: &mut Criterion) {
    c.bench_function("crate_channel", |b| {
        b.iter(|| {
            let ch = Channel::new();
            thread::scope(|s| {
                s.spawn(|| {
                    for i in 0..1000 {
                        ch.send(i);
                    }
                });
                s.spawn(|| {
                    for _ in 0..1000 {
                        ch.receive();
                    }
                });
            });
        });
    });
}

fn bench_std_mpsc(c: &mut Criterion) {
    c.bench_function("std_mpsc", |b| {
        b.iter(|| {
            let (tx, rx) = mpsc::channel();
            thread::scope(|s| {
                s.spawn(move || {
                    for i in 0..1000 {
                        tx.send(i).unwrap();
                    }
                });
                s.spawn(move || {
                    for _ in 0..1000 {
                        rx.recv().unwrap();
                    }
                });
            });
        });
    });
}

criterion_group!(benches, bench_std_mpsc, bench_crate_channel);
criterion_main!(benches);
