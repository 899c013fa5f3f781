use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ember_core::config::LedgerConfig;
use ember_core::constants::UNIT;
use ember_core::traits::NoShield;
use ember_core::types::Address;
use ember_ledger::{DecayingLedger, DecaySchedule};

fn bench_decayed_amount(c: &mut Criterion) {
    let schedule = DecaySchedule::rebuild(1_000_000 * UNIT, 250_000 * UNIT, 0, 60 * 86_400);
    c.bench_function("decayed_amount_mid_window", |b| {
        b.iter(|| black_box(schedule).decayed_amount(black_box(30 * 86_400)))
    });
}

fn bench_transfer(c: &mut Criterion) {
    c.bench_function("transfer_with_rebuild", |b| {
        let mut ledger = DecayingLedger::new(Address([0; 32]), LedgerConfig::default());
        ledger
            .mint(Address([0; 32]), Address([1; 32]), 1_000_000_000 * UNIT, &NoShield, 0)
            .unwrap();
        let mut now = 1u64;
        b.iter(|| {
            ledger
                .transfer(Address([1; 32]), Address([2; 32]), UNIT, &NoShield, now)
                .unwrap();
            now += 1;
        })
    });
}

criterion_group!(benches, bench_decayed_amount, bench_transfer);
criterion_main!(benches);
