//! End-to-end inventory run example.
//!
//! Demonstrates: build config → LockstepRun → run with periodic analytics →
//! reset → leak-then-trap run → batch over seeds.
//!
//! Set `RUST_LOG=shelf_engine=debug` to see per-report logging, or
//! `RUST_LOG=trace` for every move and observation.

use shelf_bench::{reference_profile, trap_profile};
use shelf_core::ShelfId;
use shelf_engine::digest::snapshot_digest;
use shelf_engine::{run_batch, LockstepRun, RunResults};
use tracing_subscriber::EnvFilter;

fn print_reports(results: &RunResults) {
    for report in results.reports.values() {
        println!(
            "  step {:>5}: kalman={:>7.2} (var {:>8.3}), true_obs={:>4}, err={:>5.1}%, \
             mae={:>5.2}, inferred={:>5}, actual={:>4}, staleness={}",
            report.step,
            report.kalman_estimate,
            report.kalman_variance,
            report.true_total_observable,
            report.total_error_pct,
            report.mean_absolute_error,
            report
                .inferred_unobservable
                .map_or_else(|| "-".to_string(), |v| v.to_string()),
            report.unobservable_items,
            report.max_observable_staleness,
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,shelf_engine=info")),
        )
        .init();

    println!("=== Shelf Inventory Example ===\n");

    let config = reference_profile(42);
    println!(
        "{} shelves, capacity {}, {} items, shelf {} unobservable",
        config.layout.shelf_count,
        config.layout.capacity,
        config.layout.total_items,
        config.unobservable,
    );
    let mut run = LockstepRun::new(config).unwrap();

    // --- Run 1: normal dynamics ---
    println!("\nRun 1: 5000 steps, analytics every 500");
    let first = run.run(5_000, 500).unwrap();
    print_reports(&first);
    println!(
        "  moves: {} of 5000 steps, final digest {:016x}",
        first.moves(),
        snapshot_digest(&first.final_truth)
    );

    // --- Reset: same seed replays exactly ---
    println!("\nResetting run...");
    run.reset().unwrap();
    let replay = run.run(5_000, 500).unwrap();
    println!(
        "  replay digest {:016x} (matches: {})",
        snapshot_digest(&replay.final_truth),
        snapshot_digest(&replay.final_truth) == snapshot_digest(&first.final_truth)
    );

    // --- Run 2: leak then trap ---
    println!("\nRun 2: shelf 0 traps items from step 150");
    let trap = LockstepRun::new(trap_profile(42))
        .unwrap()
        .run(5_000, 500)
        .unwrap();
    print_reports(&trap);
    let trapped = trap
        .final_truth
        .quantity(ShelfId(0))
        .unwrap_or_default();
    println!("  items trapped on shelf 0: {trapped}");

    // --- Batch over seeds ---
    println!("\nBatch: 8 seeds x 2000 steps");
    let configs: Vec<_> = (0..8).map(reference_profile).collect();
    for (seed, result) in run_batch(configs, 2_000, 1_000).iter().enumerate() {
        match result {
            Ok(r) => {
                let last = r.last_report().unwrap();
                println!(
                    "  seed {seed}: mae={:>5.2}, unobservable_error={:>3}, kalman_err={:>5.1}%",
                    last.mean_absolute_error, last.unobservable_error, last.total_error_pct,
                );
            }
            Err(e) => println!("  seed {seed}: {e}"),
        }
    }

    println!("\n=== Done ===");
}
