//! End-to-end runs exercising the full simulation pipeline.

use kagomc::prelude::*;

/// A fixed budget runs for exactly that many cycles, no matter how the
/// conversion goes.
#[test]
fn fixed_budget_runs_exact_cycle_count() {
    let report = Simulation::new(16, 16)
        .with_modifier(ReactivityModifier::base_rate(0.1))
        .with_cycle_budget(CycleBudget::Fixed(1_000))
        .with_rng_seed(100)
        .run()
        .unwrap();
    assert_eq!(report.state.cycle, 1_000);
    assert!(report.state.converted <= report.state.total);
}

/// Unbounded mode on a tiny lattice with always-certain reactions stops
/// once everything is converted.
#[test]
fn saturation_mode_converts_everything() {
    let report = Simulation::new(4, 2)
        .with_rng_seed(5)
        .run()
        .unwrap();
    assert_eq!(report.state.converted, report.state.total);
}

/// Conversion never decreases across snapshots, and cadenced snapshots
/// arrive at the configured cycles with one final snapshot on top.
#[test]
fn conversion_is_monotone_across_snapshots() {
    let mut last_converted = 0;
    let mut snapshot_cycles = Vec::new();
    let mut finals = 0;

    Simulation::new(16, 16)
        .with_modifier(ReactivityModifier::base_rate(0.4))
        .with_cycle_budget(CycleBudget::Fixed(500))
        .with_snapshot_cadence(100)
        .with_rng_seed(77)
        .run_with(|snapshot| {
            assert!(snapshot.state.converted >= last_converted);
            last_converted = snapshot.state.converted;
            if snapshot.is_final {
                finals += 1;
            } else {
                snapshot_cycles.push(snapshot.state.cycle);
            }
            let reacted = snapshot.lattice.rhombs().filter(|r| r.reacted).count();
            assert_eq!(reacted, snapshot.state.converted);
            Ok(())
        })
        .unwrap();

    assert_eq!(snapshot_cycles, vec![100, 200, 300, 400]);
    assert_eq!(finals, 1);
}

/// Zero cadence emits the final snapshot only.
#[test]
fn zero_cadence_emits_only_final_snapshot() {
    let mut snapshots = 0;
    Simulation::new(8, 8)
        .with_cycle_budget(CycleBudget::Fixed(200))
        .with_rng_seed(8)
        .run_with(|snapshot| {
            assert!(snapshot.is_final);
            snapshots += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(snapshots, 1);
}

/// The same RNG seed replays the same trajectory.
#[test]
fn seeded_runs_are_deterministic() {
    let run = || {
        Simulation::new(16, 16)
            .with_modifier(ReactivityModifier::base_rate(0.35))
            .with_modifier(ReactivityModifier::new(0.6, 2).with_reacted_min(2))
            .with_seed_sites(4)
            .with_cycle_budget(CycleBudget::Fixed(2_000))
            .with_rng_seed(4242)
            .run_with(|snapshot| {
                if snapshot.is_final {
                    // Reaction pattern, not just the count, must replay.
                    let pattern: Vec<bool> =
                        snapshot.lattice.rhombs().map(|r| r.reacted).collect();
                    assert!(!pattern.is_empty());
                }
                Ok(())
            })
            .unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.state.converted, b.state.converted);
    assert_eq!(a.state.cycle, b.state.cycle);
}

/// Deterministic replay extends to the full reaction pattern.
#[test]
fn seeded_runs_replay_the_same_pattern() {
    let pattern_of = |seed: u64| {
        let mut pattern = Vec::new();
        Simulation::new(12, 12)
            .with_modifier(ReactivityModifier::base_rate(0.5))
            .with_seed_sites(2)
            .with_cycle_budget(CycleBudget::Fixed(800))
            .with_rng_seed(seed)
            .run_with(|snapshot| {
                if snapshot.is_final {
                    pattern = snapshot.lattice.rhombs().map(|r| r.reacted).collect();
                }
                Ok(())
            })
            .unwrap();
        pattern
    };
    assert_eq!(pattern_of(31), pattern_of(31));
    assert_ne!(pattern_of(31), pattern_of(32));
}

/// An observer error aborts the run and surfaces as the run result.
#[test]
fn observer_errors_abort_the_run() {
    let result = Simulation::new(8, 8)
        .with_cycle_budget(CycleBudget::Fixed(100))
        .with_snapshot_cadence(10)
        .with_rng_seed(6)
        .run_with(|_| {
            Err(SimulationError::Log(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        });
    assert!(matches!(result, Err(SimulationError::Log(_))));
}

/// Full pipeline: run with rendering and logging wired up, then check the
/// artifacts landed on disk.
#[test]
fn snapshots_and_series_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let render_config = RenderConfig {
        image_width: 120,
        image_height: 120,
        cell_width: 20.0,
        ..RenderConfig::default()
    };
    let mut log = RunLog::create(dir.path(), "conversion").unwrap();

    Simulation::new(8, 8)
        .with_modifier(ReactivityModifier::base_rate(0.7))
        .with_cycle_budget(CycleBudget::Fixed(60))
        .with_snapshot_cadence(30)
        .with_rng_seed(55)
        .run_with(|snapshot| {
            log.log_xy(snapshot.state.cycle, snapshot.state.conversion())?;
            save_snapshot(snapshot.lattice, &render_config, dir.path(), snapshot.state.cycle)?;
            Ok(())
        })
        .unwrap();

    for cycle in [30, 60] {
        assert!(dir.path().join(format!("grid_{}.png", cycle)).exists());
    }
    let series = std::fs::read_to_string(log.path()).unwrap();
    let lines: Vec<&str> = series.lines().collect();
    // One cadenced snapshot at cycle 30 plus the final one at 60.
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("30;"));
    assert!(lines[1].starts_with("60;"));
}
