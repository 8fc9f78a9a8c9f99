use std::path::PathBuf;
use std::process::ExitCode;

use kagomc::prelude::*;

fn main() -> ExitCode {
    match run() {
        Ok(report) => {
            println!(
                "done: {}/{} sites converted after {} cycles",
                report.state.converted, report.state.total, report.state.cycle
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<RunReport, SimulationError> {
    let out_dir = PathBuf::from("out");
    std::fs::create_dir_all(&out_dir)?;

    let render_config = RenderConfig::default();
    let (points_x, points_y) = render_config.lattice_points();

    let mut log = RunLog::create(&out_dir, "conversion")?;
    log.log_text(&format!("lattice {} x {} points", points_x, points_y))?;

    let inhibit = ReactivityModifier::new(0.3, 1).with_unreacted_min(3);
    Simulation::new(points_x, points_y)
        .with_modifier(ReactivityModifier::base_rate(0.9))
        .with_modifier(inhibit)
        .with_modifier(inhibit.complementary())
        .with_seed_sites(5)
        .with_cycle_budget(CycleBudget::Fixed(50_000))
        .with_snapshot_cadence(5_000)
        .with_progress(true)
        .run_with(|snapshot| {
            log.log_xy(snapshot.state.cycle, snapshot.state.conversion())?;
            save_snapshot(
                snapshot.lattice,
                &render_config,
                &out_dir,
                snapshot.state.cycle,
            )?;
            Ok(())
        })
}
