//! Integrator benchmarks for drift_core.
//!
//! Run with: `cargo bench -p drift_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drift_core::compensator::{extrapolate, Snapshot};
use drift_core::integrator::advance;
use drift_core::kinematics::{EntityLimits, KinematicState, RotationDir};
use drift_core::math::Vec2;
use drift_core::profiles::{MotionModel, MotionProfile};

fn bench_limits() -> EntityLimits {
    EntityLimits {
        max_speed: 2.0,
        thrust_acceleration: 0.001,
        rotation_speed: 0.002,
    }
}

/// Catch-up cost for one second of lag on a turning, thrusting entity.
pub fn integrator_benchmark(c: &mut Criterion) {
    let limits = bench_limits();

    c.bench_function("advance_1000_steps", |b| {
        b.iter(|| {
            let mut state = KinematicState {
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
                heading: 0.0,
                rotation: RotationDir::Cw,
                thrust_active: true,
                last_update: 0,
            };
            advance(&mut state, black_box(&limits), black_box(1000));
            black_box(state)
        })
    });

    c.bench_function("extrapolate_100ms_lag", |b| {
        let profile = MotionProfile {
            model: MotionModel::Powered,
            limits,
        };
        let snapshot = Snapshot {
            entity_id: 1,
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(0.5, -0.5),
            heading: 1.2,
            thrust_active: true,
            rotation: RotationDir::Ccw,
            server_timestamp: 0,
        };

        b.iter(|| black_box(extrapolate(black_box(&snapshot), &profile, 100)))
    });
}

criterion_group!(benches, integrator_benchmark);
criterion_main!(benches);
