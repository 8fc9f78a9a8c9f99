//! Reactivity modifier rules.
//!
//! Modifiers define how the reaction state of a site's neighborhood shapes
//! its reaction probability. Each modifier watches one neighbor order and
//! gates on minimum counts of reacted and/or unreacted neighbors at that
//! order; every modifier whose conditions hold contributes its factor
//! multiplicatively.
//!
//! With no applicable modifier the probability is 1: a reaction always
//! proceeds absent an inhibiting or promoting rule. A constant base rate ω
//! below 1 is expressed as one more modifier with no conditions
//! ([`ReactivityModifier::base_rate`]) rather than as a separate parameter.
//!
//! # Example
//!
//! Sites with at least two reacted immediate neighbors react at half the
//! rate; everything else is untouched:
//!
//! ```
//! use kagomc::{ReactivityModifier, RuleSet};
//!
//! let rules = RuleSet::new(vec![
//!     ReactivityModifier::new(0.5, 1).with_reacted_min(2),
//! ]).unwrap();
//! assert_eq!(rules.max_order(), 1);
//! ```

use crate::error::ConfigError;
use crate::shells::MAX_SHELL_SIZES;

/// Neighbor occupancy of one shell: how many members have reacted, out of
/// how many total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellOccupancy {
    /// Reacted members of the shell.
    pub reacted: u32,
    /// Total shell size.
    pub total: u32,
}

impl ShellOccupancy {
    /// Members of the shell that have not reacted.
    pub fn unreacted(&self) -> u32 {
        self.total - self.reacted
    }
}

/// A conditional multiplicative adjustment to the reaction probability.
///
/// The modifier *applies* to a site when its reacted-neighbor count at
/// `order` meets or exceeds `reacted_min` (when set) and its
/// unreacted-neighbor count meets or exceeds `unreacted_min` (when set).
/// An unset threshold always passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactivityModifier {
    /// Multiplicative probability factor in `[0, 1]`.
    pub factor: f64,
    /// Neighbor order this rule watches (1 = immediate neighbors).
    pub order: usize,
    /// Minimum reacted neighbors required, if any.
    pub reacted_min: Option<u32>,
    /// Minimum unreacted neighbors required, if any.
    pub unreacted_min: Option<u32>,
}

impl ReactivityModifier {
    /// An unconditional modifier at `order` with the given factor.
    ///
    /// Add thresholds with [`with_reacted_min`](Self::with_reacted_min) and
    /// [`with_unreacted_min`](Self::with_unreacted_min).
    pub fn new(factor: f64, order: usize) -> Self {
        Self {
            factor,
            order,
            reacted_min: None,
            unreacted_min: None,
        }
    }

    /// A modifier with no conditions at all: a constant base rate ω
    /// multiplied into every reaction attempt.
    pub fn base_rate(omega: f64) -> Self {
        Self::new(omega, 1)
    }

    /// Require at least `count` reacted neighbors at this order.
    pub fn with_reacted_min(mut self, count: u32) -> Self {
        self.reacted_min = Some(count);
        self
    }

    /// Require at least `count` unreacted neighbors at this order.
    pub fn with_unreacted_min(mut self, count: u32) -> Self {
        self.unreacted_min = Some(count);
        self
    }

    /// The `1 - factor` counterpart of this rule: threshold roles swapped,
    /// factor inverted.
    ///
    /// Pairing a rule with its complement expresses "if the condition holds
    /// apply `factor`, otherwise apply `1 - factor`".
    pub fn complementary(&self) -> Self {
        Self {
            factor: 1.0 - self.factor,
            order: self.order,
            reacted_min: self.unreacted_min,
            unreacted_min: self.reacted_min,
        }
    }

    /// Whether this rule's conditions hold for the given shell occupancy.
    pub fn applies(&self, occupancy: ShellOccupancy) -> bool {
        let reacted_ok = self.reacted_min.map_or(true, |min| occupancy.reacted >= min);
        let unreacted_ok = self
            .unreacted_min
            .map_or(true, |min| occupancy.unreacted() >= min);
        reacted_ok && unreacted_ok
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.factor.is_finite() || !(0.0..=1.0).contains(&self.factor) {
            return Err(ConfigError::FactorOutOfRange(self.factor));
        }
        if self.order == 0 || self.order > MAX_SHELL_SIZES.len() {
            return Err(ConfigError::OrderOutOfRange(self.order));
        }
        Ok(())
    }
}

/// An ordered, validated collection of reactivity modifiers.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    modifiers: Vec<ReactivityModifier>,
}

impl RuleSet {
    /// Validate and wrap a modifier list. An empty list is valid; every
    /// site then reacts with probability 1.
    pub fn new(modifiers: Vec<ReactivityModifier>) -> Result<Self, ConfigError> {
        for modifier in &modifiers {
            modifier.validate()?;
        }
        Ok(Self { modifiers })
    }

    /// The modifiers, in evaluation order.
    pub fn modifiers(&self) -> &[ReactivityModifier] {
        &self.modifiers
    }

    /// Highest neighbor order any modifier consults. Zero for an empty
    /// rule set; this is how deep the shell cache must be precomputed.
    pub fn max_order(&self) -> usize {
        self.modifiers.iter().map(|m| m.order).max().unwrap_or(0)
    }

    /// Composite reaction probability for a site whose shell occupancies
    /// are supplied by `occupancy_of` (queried once per modifier, keyed by
    /// order).
    pub fn probability<F>(&self, mut occupancy_of: F) -> f64
    where
        F: FnMut(usize) -> ShellOccupancy,
    {
        let mut probability = 1.0;
        for modifier in &self.modifiers {
            if modifier.applies(occupancy_of(modifier.order)) {
                probability *= modifier.factor;
            }
        }
        probability
    }
}
