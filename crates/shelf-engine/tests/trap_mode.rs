//! Integration test: trap shelf accumulation.
//!
//! With a trap on the unobservable shelf, items leak in and never leave
//! once trapping starts. The observer cannot see the shelf directly, so
//! the Kalman total of observable shelves should fall while the inferred
//! unobservable estimate tracks the growing trap.

use shelf_core::ShelfId;
use shelf_engine::{LockstepRun, RunConfig};
use shelf_sim::{ShelfLayout, TrapPolicy};

fn trap_config(from_step: u64) -> RunConfig {
    RunConfig {
        trap: Some(TrapPolicy {
            shelf: ShelfId(0),
            from_step,
        }),
        ..RunConfig::with_layout(ShelfLayout::new(10, 200, 100)).seeded(17)
    }
}

#[test]
fn trap_shelf_never_loses_items_after_start() {
    let results = LockstepRun::new(trap_config(200))
        .unwrap()
        .run(5_000, 100)
        .unwrap();
    let mut last = None;
    for report in results.reports.values().filter(|r| r.step.0 >= 200) {
        let trapped = report.trap_items.unwrap();
        if let Some(prev) = last {
            assert!(trapped >= prev, "trap shelf lost items at {}", report.step);
        }
        last = Some(trapped);
        assert_eq!(report.true_total_system, 100);
    }
    let final_report = results.last_report().unwrap();
    assert!(final_report.trap_items.unwrap() > 50);
}

#[test]
fn observer_tracks_the_leak() {
    let results = LockstepRun::new(trap_config(0))
        .unwrap()
        .run(5_000, 1_000)
        .unwrap();
    let last = results.last_report().unwrap();
    // Nearly everything ends up trapped and the estimates follow it.
    assert!(last.true_total_observable < 20);
    assert!(last.kalman_estimate < 30.0);
    assert!(last.inferred_unobservable.unwrap() > 70);
}

#[test]
fn trap_shelf_must_be_on_the_ring() {
    let mut cfg = trap_config(0);
    cfg.trap = Some(TrapPolicy {
        shelf: ShelfId(10),
        from_step: 0,
    });
    assert!(LockstepRun::new(cfg).is_err());
}
