//! Integration test: end-to-end Simulator + Observer scenarios.
//!
//! Drives [`LockstepRun`] through the worked examples: the first step on a
//! 20-shelf ring, a full 19-step observation period, an empty ring and a
//! ring filled to capacity.

use proptest::prelude::*;
use shelf_core::{ShelfId, StepError, StepId};
use shelf_engine::metrics::{mean_absolute_error, unobservable_shelf_error};
use shelf_engine::{LockstepRun, RunConfig};
use shelf_obs::Uncertainty;
use shelf_sim::{MoveOutcome, ShelfLayout};
use shelf_test_utils::fixtures::{empty_layout, full_layout, reference_layout};

fn run(layout: ShelfLayout, seed: u64) -> LockstepRun {
    LockstepRun::new(RunConfig::with_layout(layout).seeded(seed)).unwrap()
}

// ── First step on the reference ring ─────────────────────────────────

#[test]
fn first_step_observes_shelf_one_and_infers_shelf_zero() {
    let mut r = run(reference_layout(), 2024);
    let step = r.step_sync().unwrap();

    let observed = step.observation;
    assert_eq!(observed.shelf, ShelfId(1));
    assert_eq!(observed.step, StepId(1));
    let truth1 = r.simulator().quantity_of(ShelfId(1)).unwrap();
    assert_eq!(observed.true_quantity, truth1);

    let obs = r.observer();
    let rec1 = obs.estimate_of(ShelfId(1)).unwrap();
    assert_eq!(rec1.estimated_quantity, Some(i64::from(truth1)));
    assert_eq!(rec1.uncertainty, Uncertainty::ZERO);
    for i in 2..20 {
        let rec = obs.estimate_of(ShelfId(i)).unwrap();
        assert_eq!(rec.uncertainty, Uncertainty(1), "shelf {i}");
        assert_eq!(rec.estimated_quantity, None);
    }
    assert_eq!(obs.inferred_unobservable(), Some(50 - i64::from(truth1)));
}

// ── Full observation period ──────────────────────────────────────────

#[test]
fn nineteen_steps_visit_every_observable_shelf_once() {
    let mut r = run(reference_layout(), 7);
    let mut seen = Vec::new();
    for _ in 0..19 {
        seen.push(r.step_sync().unwrap().observation.shelf.0);
    }
    assert_eq!(seen, (1..20).collect::<Vec<_>>());

    let est = r.estimates().unwrap();
    for (shelf, rec) in est.observable() {
        assert_eq!(rec.last_observed_step, Some(StepId(u64::from(shelf.0))));
    }
    assert_eq!(
        est.inferred_unobservable().unwrap() + est.observable_estimate_sum(),
        50
    );

    // Step 20 wraps back to shelf 1.
    assert_eq!(r.step_sync().unwrap().observation.shelf, ShelfId(1));
}

// ── Boundary layouts ─────────────────────────────────────────────────

#[test]
fn empty_ring_cannot_step() {
    let mut r = run(empty_layout(20), 0);
    assert_eq!(r.step_sync(), Err(StepError::NoMovableItems));
}

#[test]
fn full_ring_first_step_is_a_no_op() {
    let mut r = run(full_layout(10, 4), 99);
    let before = r.truth().unwrap();
    let step = r.step_sync().unwrap();
    assert!(matches!(step.movement.outcome, MoveOutcome::Blocked { .. }));
    let after = r.truth().unwrap();
    assert_eq!(before.quantities(), after.quantities());
    assert_eq!(step.observation.true_quantity, 4);
}

// ── Metrics on a live run ────────────────────────────────────────────

#[test]
fn metrics_agree_with_snapshots() {
    let mut r = run(reference_layout(), 31);
    for _ in 0..60 {
        r.step_sync().unwrap();
    }
    let truth = r.truth().unwrap();
    let est = r.estimates().unwrap();
    let report = r.analytics().unwrap();
    assert_eq!(
        report.mean_absolute_error,
        mean_absolute_error(&truth, &est).unwrap()
    );
    assert_eq!(
        report.unobservable_error,
        unobservable_shelf_error(&truth, &est, ShelfId(0)).unwrap()
    );
    assert_eq!(report.true_total_system, 50);
    assert_eq!(report.max_observable_staleness, Uncertainty(18));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lockstep_invariants_hold(
        shelves in 3u32..25,
        capacity in 1u32..12,
        fill in 0.05f64..=1.0,
        unobs in 0u32..25,
        seed in any::<u64>(),
        steps in 1u64..200,
    ) {
        let total = ((shelves * capacity) as f64 * fill).max(1.0) as u64;
        let cfg = RunConfig {
            unobservable: ShelfId(unobs % shelves),
            ..RunConfig::with_layout(ShelfLayout::new(shelves, capacity, total)).seeded(seed)
        };
        let mut r = LockstepRun::new(cfg).unwrap();
        for _ in 0..steps {
            let step = r.step_sync().unwrap();
            let truth = r.truth().unwrap();
            prop_assert_eq!(truth.total(), total);
            prop_assert!(truth.quantities().iter().all(|&q| q <= capacity));

            let rec = r.observer().estimate_of(step.observation.shelf).unwrap();
            prop_assert_eq!(rec.uncertainty, Uncertainty::ZERO);

            let est = r.estimates().unwrap();
            prop_assert_eq!(
                est.inferred_unobservable().unwrap() + est.observable_estimate_sum(),
                total as i64
            );
        }
    }
}
