//! # kagomc - Kagome lattice Monte Carlo
//!
//! Monte Carlo simulation of irreversible site dimerization on a
//! torus-wrapped Kagome-derived rhombille tiling, with reaction
//! probabilities shaped by composable neighbor-shell rules.
//!
//! ## Quick Start
//!
//! ```
//! use kagomc::prelude::*;
//!
//! let report = Simulation::new(32, 32)
//!     .with_modifier(ReactivityModifier::base_rate(0.8))
//!     .with_modifier(ReactivityModifier::new(0.2, 1).with_unreacted_min(4))
//!     .with_seed_sites(3)
//!     .with_cycle_budget(CycleBudget::Fixed(5_000))
//!     .with_rng_seed(42)
//!     .run()
//!     .unwrap();
//!
//! println!("conversion: {:.3}", report.state.conversion());
//! ```
//!
//! ## Core Concepts
//!
//! ### Lattice
//!
//! The [`Lattice`] is a rhombille tiling wrapped into a torus: even rows
//! hold `W` sites, odd rows `W / 2`, and every site has exactly four
//! immediate neighbors. All wrap-around arithmetic runs through
//! [`Lattice::normalize`].
//!
//! ### Neighbor shells
//!
//! The order-`n` shell of a site holds the sites exactly `n` hops away.
//! [`ShellCache`] precomputes shells for every site (in parallel, with a
//! progress bar for large lattices) before the Monte Carlo loop starts;
//! topology never changes mid-run, so shells are computed once.
//!
//! ### Reactivity modifiers
//!
//! A [`ReactivityModifier`] multiplies the reaction probability by a factor
//! when its neighbor-count conditions at one shell order hold. All
//! applicable factors compose multiplicatively; with no applicable rule a
//! site reacts with probability 1. See [`ReactivityModifier::complementary`]
//! for "otherwise apply `1 - factor`" pairs.
//!
//! ### Driver
//!
//! [`Simulation`] is a builder; [`Simulation::run_with`] drives the
//! sequential Monte Carlo loop and reports periodic and final
//! [`Snapshot`]s to an observer, which wires in the rendering
//! ([`render()`](crate::render::render)) and logging ([`RunLog`])
//! collaborators.
//!
//! ## Feature Overview
//!
//! | Category | Items |
//! |----------|-------|
//! | Topology | [`Lattice`], [`Coord`], [`Rhomb`] |
//! | Shells | [`ShellCache`], [`MAX_SHELL_SIZES`] |
//! | Rules | [`ReactivityModifier`], [`RuleSet`], [`ShellOccupancy`] |
//! | Driver | [`Simulation`], [`Run`], [`Phase`], [`CycleBudget`] |
//! | Output | [`render()`](crate::render::render), [`RenderConfig`], [`RunLog`] |

pub mod error;
pub mod lattice;
pub mod logger;
pub mod render;
pub mod rules;
pub mod shells;
pub mod simulation;

pub use error::{ConfigError, SimulationError};
pub use lattice::{Coord, Lattice, Rhomb};
pub use logger::RunLog;
pub use render::{cell_height, render, save_snapshot, Orientation, RenderConfig};
pub use rules::{ReactivityModifier, RuleSet, ShellOccupancy};
pub use shells::{ShellCache, MAX_SHELL_SIZES};
pub use simulation::{
    CycleBudget, Observer, Phase, Run, RunReport, Simulation, SimulationState, Snapshot,
};

/// Convenient re-exports for common usage.
///
/// ```
/// use kagomc::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ConfigError, SimulationError};
    pub use crate::lattice::{Coord, Lattice, Rhomb};
    pub use crate::logger::RunLog;
    pub use crate::render::{render, save_snapshot, RenderConfig};
    pub use crate::rules::{ReactivityModifier, RuleSet, ShellOccupancy};
    pub use crate::shells::ShellCache;
    pub use crate::simulation::{
        CycleBudget, Phase, Run, RunReport, Simulation, SimulationState, Snapshot,
    };
}
