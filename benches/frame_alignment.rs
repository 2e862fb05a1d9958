use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stabsim::constants::DPI;
use stabsim::frame::{align, apply_inverse};
use stabsim::orbit::{semi_major_axis_from_period, OrbitalElements, OrbitalPhase};
use stabsim::reduction::{extract::extract, reinsert::reinsert, TrioSelection};
use stabsim::system::SystemState;

/// Compact system of `n` bodies with period ratios in [1.2, 1.6).
fn random_system(rng: &mut StdRng, n: usize) -> SystemState {
    let g = DPI * DPI;
    let mut state = SystemState::new(g);
    state.add_primary(1.0);
    let mut period = 1.0;
    for _ in 0..n {
        let mass = rng.random_range(1e-7..1e-4);
        let elements = OrbitalElements {
            semi_major_axis: semi_major_axis_from_period(period, g * (1.0 + mass)),
            eccentricity: rng.random_range(0.0..0.2),
            inclination: rng.random_range(0.0..0.1),
            longitude_of_node: rng.random::<f64>() * DPI,
            longitude_of_pericenter: rng.random::<f64>() * DPI,
            phase: OrbitalPhase::MeanLongitude(rng.random::<f64>() * DPI),
        };
        state.add_orbiting(mass, &elements).unwrap();
        period *= rng.random_range(1.2..1.6);
    }
    state
}

fn bench_align(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    c.bench_function("frame/align_round_trip_10_bodies", |b| {
        b.iter_batched(
            || random_system(&mut rng, 10),
            |state| {
                let (aligned, angles) = align(black_box(state)).unwrap();
                black_box(apply_inverse(aligned, &angles));
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_extract_reinsert(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFACADE);
    let selection = TrioSelection::new(&[2, 3, 4]).unwrap();

    c.bench_function("reduction/extract_reinsert_6_bodies", |b| {
        b.iter_batched(
            || align(random_system(&mut rng, 6)).unwrap(),
            |(aligned, angles)| {
                let reduced = extract(&aligned, &selection, true).unwrap();
                black_box(reinsert(&aligned, &reduced, &angles).unwrap());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_align, bench_extract_reinsert);
criterion_main!(benches);
