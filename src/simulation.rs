//! Simulation builder and Monte Carlo driver.
//!
//! A run moves through four phases: `Initializing` (build lattice, expand
//! neighbor shells), `SeedGeneration` (flip a configured number of random
//! sites to bootstrap nucleation), `Running` (the Monte Carlo loop) and
//! `Terminated`.
//!
//! Each Monte Carlo cycle samples one uniformly random site over the whole
//! lattice. Sampling an already-reacted site is a no-op cycle that still
//! counts; this rejection-style sampling fixes the effective rate per cycle
//! and is part of the model, not an inefficiency to optimize away.
//!
//! # Example
//!
//! ```
//! use kagomc::prelude::*;
//!
//! let report = Simulation::new(16, 16)
//!     .with_modifier(ReactivityModifier::base_rate(0.5))
//!     .with_cycle_budget(CycleBudget::Fixed(200))
//!     .with_rng_seed(7)
//!     .run()
//!     .unwrap();
//! assert_eq!(report.state.cycle, 200);
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{ConfigError, SimulationError};
use crate::lattice::Lattice;
use crate::rules::{ReactivityModifier, RuleSet, ShellOccupancy};
use crate::shells::ShellCache;

/// Where a run currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Building the lattice and expanding neighbor shells.
    Initializing,
    /// Flipping the configured number of random seed sites.
    SeedGeneration,
    /// The Monte Carlo loop.
    Running,
    /// Budget exhausted or lattice fully converted.
    Terminated,
}

/// When the Monte Carlo loop stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleBudget {
    /// Stop after exactly this many cycles.
    Fixed(u64),
    /// Run until every site has reacted.
    Saturation,
}

/// Scalar state of a run at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationState {
    /// Monte Carlo cycles completed.
    pub cycle: u64,
    /// Sites that have reacted so far.
    pub converted: usize,
    /// Total sites on the lattice. Fixed at construction.
    pub total: usize,
}

impl SimulationState {
    /// Fraction of sites converted, in `[0, 1]`.
    pub fn conversion(&self) -> f64 {
        self.converted as f64 / self.total as f64
    }
}

/// One progress report handed to the observer.
pub struct Snapshot<'a> {
    /// Scalar run state at the time of the snapshot.
    pub state: SimulationState,
    /// Full lattice state, for rendering.
    pub lattice: &'a Lattice,
    /// True for the one unconditional snapshot emitted at termination.
    pub is_final: bool,
}

/// What a finished run reports back.
#[derive(Clone, Copy, Debug)]
pub struct RunReport {
    /// Final scalar state.
    pub state: SimulationState,
}

/// Observer invoked with periodic and final snapshots. Wire this to the
/// rendering and logging collaborators; an error aborts the run.
pub type Observer<'a> = dyn FnMut(&Snapshot) -> Result<(), SimulationError> + 'a;

/// A Monte Carlo simulation builder.
///
/// Use method chaining to configure, then call [`run`](Self::run) (or
/// [`run_with`](Self::run_with) to observe snapshots), or
/// [`start`](Self::start) to drive the run cycle by cycle.
pub struct Simulation {
    points_x: u32,
    points_y: u32,
    modifiers: Vec<ReactivityModifier>,
    seed_sites: usize,
    budget: CycleBudget,
    snapshot_cadence: u64,
    rng_seed: Option<u64>,
    show_progress: bool,
}

impl Simulation {
    /// Create a simulation on a lattice with the given points per axis.
    /// Odd dimensions are rounded up to even at construction.
    pub fn new(points_x: u32, points_y: u32) -> Self {
        Self {
            points_x,
            points_y,
            modifiers: Vec::new(),
            seed_sites: 0,
            budget: CycleBudget::Saturation,
            snapshot_cadence: 0,
            rng_seed: None,
            show_progress: false,
        }
    }

    /// Add one reactivity modifier.
    pub fn with_modifier(mut self, modifier: ReactivityModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Add several reactivity modifiers in evaluation order.
    pub fn with_modifiers<I>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = ReactivityModifier>,
    {
        self.modifiers.extend(modifiers);
        self
    }

    /// Flip this many uniformly random sites to reacted before the loop
    /// starts (nucleation bootstrap). Default 0.
    pub fn with_seed_sites(mut self, count: usize) -> Self {
        self.seed_sites = count;
        self
    }

    /// Stop condition. Default: run until saturation.
    pub fn with_cycle_budget(mut self, budget: CycleBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Emit a snapshot to the observer every `cadence` cycles. 0 (the
    /// default) disables periodic snapshots; the final snapshot at
    /// termination is emitted regardless.
    pub fn with_snapshot_cadence(mut self, cadence: u64) -> Self {
        self.snapshot_cadence = cadence;
        self
    }

    /// Seed the random stream for deterministic replay. Without this the
    /// seed is taken from the system clock.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Show a progress bar while shells are precomputed. Off by default
    /// (tests and benches want quiet output).
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run to termination without observing snapshots.
    pub fn run(self) -> Result<RunReport, SimulationError> {
        self.run_with(|_| Ok(()))
    }

    /// Run to termination, passing every snapshot to `observer`.
    pub fn run_with<F>(self, mut observer: F) -> Result<RunReport, SimulationError>
    where
        F: FnMut(&Snapshot) -> Result<(), SimulationError>,
    {
        let mut run = self.start()?;
        run.run_to_end(&mut observer)
    }

    /// Perform initialization and seeding, returning a [`Run`] that can be
    /// stepped cycle by cycle.
    pub fn start(self) -> Result<Run, SimulationError> {
        // Initializing: validate rules, build topology, expand shells.
        let rules = RuleSet::new(self.modifiers)?;
        let lattice = Lattice::new(self.points_x, self.points_y)?;
        if self.seed_sites > lattice.site_count() {
            return Err(ConfigError::TooManySeeds {
                requested: self.seed_sites,
                sites: lattice.site_count(),
            }
            .into());
        }

        let progress = self.show_progress.then(|| {
            let bar = ProgressBar::new(lattice.site_count() as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "  {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} shells ({per_sec})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
            );
            bar
        });
        let shells = ShellCache::build(&lattice, rules.max_order(), progress.as_ref())?;
        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        let rng = match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut run = Run {
            lattice,
            shells,
            rules,
            rng,
            cycle: 0,
            converted: 0,
            budget: self.budget,
            snapshot_cadence: self.snapshot_cadence,
            phase: Phase::SeedGeneration,
        };
        run.generate_seeds(self.seed_sites);
        Ok(run)
    }
}

/// An initialized, seeded simulation, ready to step.
pub struct Run {
    lattice: Lattice,
    shells: ShellCache,
    rules: RuleSet,
    rng: SmallRng,
    cycle: u64,
    converted: usize,
    budget: CycleBudget,
    snapshot_cadence: u64,
    phase: Phase,
}

impl Run {
    /// Current phase of the run.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current scalar state.
    pub fn state(&self) -> SimulationState {
        SimulationState {
            cycle: self.cycle,
            converted: self.converted,
            total: self.lattice.site_count(),
        }
    }

    /// The lattice, with current reaction flags.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// The precomputed shell cache.
    pub fn shells(&self) -> &ShellCache {
        &self.shells
    }

    /// Flip `count` distinct uniformly random sites to reacted.
    fn generate_seeds(&mut self, count: usize) {
        debug_assert_eq!(self.phase, Phase::SeedGeneration);
        let total = self.lattice.site_count();
        let mut seeded = 0;
        while seeded < count {
            let site = self.rng.gen_range(0..total);
            if self.lattice.react(site) {
                self.converted += 1;
                seeded += 1;
            }
        }
        self.phase = if self.finished() {
            Phase::Terminated
        } else {
            Phase::Running
        };
    }

    fn saturated(&self) -> bool {
        self.converted == self.lattice.site_count()
    }

    fn finished(&self) -> bool {
        match self.budget {
            CycleBudget::Fixed(max) => self.cycle >= max,
            CycleBudget::Saturation => self.saturated(),
        }
    }

    /// Composite reaction probability for one site, per the configured
    /// modifier list.
    fn site_probability(&self, site: usize) -> f64 {
        let (lattice, shells) = (&self.lattice, &self.shells);
        self.rules.probability(|order| {
            let (reacted, total) = shells.count_reacted(lattice, site, order);
            ShellOccupancy { reacted, total }
        })
    }

    /// Advance one Monte Carlo cycle. Returns `true` if a site reacted.
    ///
    /// Does nothing once the run is terminated.
    pub fn step(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let site = self.rng.gen_range(0..self.lattice.site_count());
        let mut flipped = false;
        if !self.lattice.rhomb_at(site).reacted {
            let probability = self.site_probability(site);
            if self.rng.gen::<f64>() < probability {
                self.lattice.react(site);
                self.converted += 1;
                flipped = true;
            }
        }
        self.cycle += 1;

        if self.finished() {
            self.phase = Phase::Terminated;
        }
        flipped
    }

    /// Step until termination, emitting cadenced snapshots plus the one
    /// unconditional final snapshot.
    pub fn run_to_end(&mut self, observer: &mut Observer) -> Result<RunReport, SimulationError> {
        while self.phase == Phase::Running {
            self.step();
            if self.snapshot_cadence > 0
                && self.cycle % self.snapshot_cadence == 0
                && self.phase == Phase::Running
            {
                observer(&Snapshot {
                    state: self.state(),
                    lattice: &self.lattice,
                    is_final: false,
                })?;
            }
        }
        observer(&Snapshot {
            state: self.state(),
            lattice: &self.lattice,
            is_final: true,
        })?;
        Ok(RunReport { state: self.state() })
    }
}
