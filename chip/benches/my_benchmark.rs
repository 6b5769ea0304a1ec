use chip::{chip8::ChipSet, resources::Rom};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::mock::StepRng;

const ROM_NAME: &str = "COUNTER";

/// `7001 8014 A300 F255 1200` keeps the alu and the memory busy.
static BASE_ROM: once_cell::sync::Lazy<Rom> = once_cell::sync::Lazy::new(|| {
    Rom::new(
        ROM_NAME,
        vec![0x70, 0x01, 0x80, 0x14, 0xA3, 0x00, 0xF2, 0x55, 0x12, 0x00],
    )
    .expect("The benchmark rom fits into memory.")
});

fn get_base() -> Rom {
    BASE_ROM.clone()
}

/// will setup the default configured chip
fn get_default_chip() -> ChipSet {
    setup_chip(get_base())
}

fn setup_chip(rom: Rom) -> ChipSet {
    ChipSet::with_rng(rom, Box::new(StepRng::new(0, 1)))
}

pub fn next_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    c.bench_function("next_bench", |b| {
        b.iter(|| {
            let _ = chip.next();
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let chip = get_default_chip();
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = format!("{}", chip);
        });
    });
}

criterion_group!(benches, next_bench, print_bench);
criterion_main!(benches);
