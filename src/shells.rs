//! Nth-order neighbor shells.
//!
//! The order-`n` shell of a site is the set of sites reachable in exactly
//! `n` hops of the immediate-neighbor relation, excluding every closer
//! shell. Shell 1 is the four immediate neighbors; shell `n` is derived by
//! expanding shell `n - 1` one hop outward and subtracting shells `n - 1`
//! and `n - 2`.
//!
//! Shells depend only on the (immutable) lattice topology, never on
//! reaction state, so they are computed once up front for every site and
//! cached for the whole run. The per-site computations are independent and
//! run on the rayon thread pool; for large lattices at high orders this
//! pre-pass dominates startup, so it reports progress through an optional
//! [`indicatif::ProgressBar`].
//!
//! ```
//! use kagomc::{Coord, Lattice, ShellCache};
//!
//! let lattice = Lattice::new(16, 16).unwrap();
//! let shells = ShellCache::build(&lattice, 2, None).unwrap();
//! let site = lattice.site_index(Coord::new(1, 1));
//! assert_eq!(shells.shell(site, 1).len(), 4);
//! assert_eq!(shells.shell(site, 2).len(), 8);
//! ```

use std::collections::HashSet;

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::ConfigError;
use crate::lattice::{Coord, Lattice};

/// Largest possible shell cardinality per order (orders 1..=10).
///
/// Upper bounds for validation, not hard caps: torus folding on a small
/// lattice can legitimately produce smaller shells.
pub const MAX_SHELL_SIZES: [usize; 10] = [4, 8, 14, 18, 22, 28, 30, 38, 38, 48];

/// Precomputed neighbor shells for every site of a lattice.
///
/// Shells are stored as flat site indices (not coordinates) so the Monte
/// Carlo hot loop can count reacted neighbors with plain array lookups.
pub struct ShellCache {
    max_order: usize,
    /// `shells[site][order - 1]` -> shell members as flat site indices.
    shells: Vec<Vec<Box<[u32]>>>,
}

impl ShellCache {
    /// Compute shells `1..=max_order` for every site of `lattice`.
    ///
    /// `max_order == 0` yields an empty cache (no modifier consults any
    /// neighbors). Orders beyond [`MAX_SHELL_SIZES`] are rejected. Pass a
    /// progress bar with length `lattice.site_count()` to get incremental
    /// progress; it is advanced once per completed site.
    pub fn build(
        lattice: &Lattice,
        max_order: usize,
        progress: Option<&ProgressBar>,
    ) -> Result<Self, ConfigError> {
        if max_order > MAX_SHELL_SIZES.len() {
            return Err(ConfigError::OrderOutOfRange(max_order));
        }

        let shells = (0..lattice.site_count())
            .into_par_iter()
            .map(|i| {
                let site_shells = expand_site(lattice, lattice.rhomb_at(i).coord, max_order);
                if let Some(bar) = progress {
                    bar.inc(1);
                }
                site_shells
            })
            .collect();

        Ok(Self { max_order, shells })
    }

    /// Highest order held by this cache.
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// The order-`order` shell of `site`, as flat site indices.
    ///
    /// Panics if `order` is 0 or beyond [`Self::max_order`]; the driver
    /// validates modifier orders before building the cache.
    pub fn shell(&self, site: usize, order: usize) -> &[u32] {
        &self.shells[site][order - 1]
    }

    /// Count of reacted members of the order-`order` shell of `site`,
    /// paired with the shell size.
    pub fn count_reacted(&self, lattice: &Lattice, site: usize, order: usize) -> (u32, u32) {
        let shell = self.shell(site, order);
        let reacted = shell
            .iter()
            .filter(|&&i| lattice.rhomb_at(i as usize).reacted)
            .count() as u32;
        (reacted, shell.len() as u32)
    }
}

/// Expand all shells of one site by repeated one-hop growth and
/// set-subtraction against the two inner shells.
fn expand_site(lattice: &Lattice, origin: Coord, max_order: usize) -> Vec<Box<[u32]>> {
    let mut result = Vec::with_capacity(max_order);
    if max_order == 0 {
        return result;
    }

    // Shell "0" is the site itself; it seeds the n-2 subtraction for n == 2.
    let mut inner: HashSet<Coord> = HashSet::from([origin]);
    let mut current: HashSet<Coord> = lattice
        .immediate_neighbors(origin)
        .iter()
        .map(|&c| lattice.normalize(c))
        .filter(|c| *c != origin)
        .collect();
    result.push(to_indices(lattice, &current));

    for _ in 2..=max_order {
        let mut next = HashSet::new();
        for &member in &current {
            for neighbor in lattice.immediate_neighbors(member) {
                let neighbor = lattice.normalize(neighbor);
                if neighbor != origin && !current.contains(&neighbor) && !inner.contains(&neighbor)
                {
                    next.insert(neighbor);
                }
            }
        }
        result.push(to_indices(lattice, &next));
        inner = std::mem::replace(&mut current, next);
    }

    result
}

/// Sorted flat indices of a coordinate set. Sorting makes the cache layout
/// independent of hash iteration order, so runs replay deterministically.
fn to_indices(lattice: &Lattice, coords: &HashSet<Coord>) -> Box<[u32]> {
    let mut indices: Vec<u32> = coords
        .iter()
        .map(|&c| lattice.site_index(c) as u32)
        .collect();
    indices.sort_unstable();
    indices.into_boxed_slice()
}
