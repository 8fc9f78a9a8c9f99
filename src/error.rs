//! Error types for kagomc.
//!
//! This module provides error types for configuration validation and for
//! the run-time failures a simulation can hit (log I/O, image encoding).

use std::fmt;

use crate::shells::MAX_SHELL_SIZES;

/// Errors detected while validating a simulation configuration.
///
/// All of these are reported before the Monte Carlo loop starts; a
/// simulation that begins running has a fully validated configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A lattice dimension is zero.
    ZeroDimension { points_x: u32, points_y: u32 },
    /// A modifier's factor is outside `[0, 1]` (or not finite).
    FactorOutOfRange(f64),
    /// A modifier references neighbor order 0 or one beyond the supported
    /// maximum shell order.
    OrderOutOfRange(usize),
    /// More seed sites requested than the lattice has sites.
    TooManySeeds { requested: usize, sites: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDimension { points_x, points_y } => write!(
                f,
                "Lattice dimensions must be positive (got {points_x} x {points_y} points)"
            ),
            ConfigError::FactorOutOfRange(v) => {
                write!(f, "Reactivity factor must be within [0, 1], got {v}")
            }
            ConfigError::OrderOutOfRange(order) => write!(
                f,
                "Neighbor order must be within 1..={}, got {order}",
                MAX_SHELL_SIZES.len()
            ),
            ConfigError::TooManySeeds { requested, sites } => {
                write!(f, "Cannot seed {requested} sites on a lattice of {sites}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur while running a simulation.
#[derive(Debug)]
pub enum SimulationError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// Writing to the run log or scalar series failed. Fatal: the logged
    /// conversion history is part of the result, not an optional side
    /// channel.
    Log(std::io::Error),
    /// Encoding or saving a lattice snapshot failed.
    Image(image::ImageError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Invalid configuration: {}", e),
            SimulationError::Log(e) => write!(f, "Failed to write run log: {}", e),
            SimulationError::Image(e) => write!(f, "Failed to save snapshot: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Log(e) => Some(e),
            SimulationError::Image(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<std::io::Error> for SimulationError {
    fn from(e: std::io::Error) -> Self {
        SimulationError::Log(e)
    }
}

impl From<image::ImageError> for SimulationError {
    fn from(e: image::ImageError) -> Self {
        SimulationError::Image(e)
    }
}
