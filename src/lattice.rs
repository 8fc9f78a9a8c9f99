//! Kagome-derived rhombille lattice topology.
//!
//! The simulation runs on a rhombille tiling: rows of rhomb-shaped sites
//! where even rows hold `W` sites and odd rows `W / 2` (odd rows contain the
//! lying rhombs, which are twice as wide). The lattice is wrapped into a
//! torus, so every site has exactly four immediate neighbors and there are
//! no boundary effects.
//!
//! All wrap-around arithmetic goes through [`Lattice::normalize`]. Neighbor
//! coordinates produced by [`Lattice::immediate_neighbors`] are *not*
//! pre-wrapped; callers normalize before lookup.
//!
//! # Coordinates
//!
//! A site is addressed by an integer pair `(x, y)`: `y` is the row,
//! `x` the column within the row. The valid `x` range depends on the row
//! parity, see [`Lattice::row_width`].
//!
//! ```
//! use kagomc::{Coord, Lattice};
//!
//! let lattice = Lattice::new(8, 8).unwrap();
//! let wrapped = lattice.normalize(Coord::new(-1, 0));
//! assert_eq!(wrapped, Coord::new(7, 0));
//! ```

use crate::error::ConfigError;

/// A lattice coordinate.
///
/// Structural value type: two coordinates are the same site exactly when
/// their components are equal (after [`Lattice::normalize`]). Used directly
/// as a set and map key during shell expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column within the row.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One site of the rhombille tiling.
///
/// The reaction flag only ever flips `false -> true`; the transition being
/// modeled is irreversible.
#[derive(Clone, Copy, Debug)]
pub struct Rhomb {
    /// Normalized lattice coordinate of this site.
    pub coord: Coord,
    /// Whether the site has undergone the irreversible transition.
    pub reacted: bool,
}

/// The torus-wrapped rhombille lattice.
///
/// Geometry only: the lattice owns the sites and their reaction flags, but
/// never mutates them itself. Construction is the single place where the
/// dimensions are validated and rounded up to even.
pub struct Lattice {
    points_x: i64,
    points_y: i64,
    sites: Vec<Rhomb>,
}

impl Lattice {
    /// Create a lattice with the given number of points per axis.
    ///
    /// Odd dimensions are silently incremented to the next even value; the
    /// row-doubling arithmetic requires both axes to be even. Zero on either
    /// axis is a configuration error.
    pub fn new(points_x: u32, points_y: u32) -> Result<Self, ConfigError> {
        if points_x == 0 || points_y == 0 {
            return Err(ConfigError::ZeroDimension { points_x, points_y });
        }
        let points_x = i64::from(points_x + points_x % 2);
        let points_y = i64::from(points_y + points_y % 2);

        let mut sites = Vec::new();
        for y in 0..points_y {
            let width = if y % 2 == 0 { points_x } else { points_x / 2 };
            for x in 0..width {
                sites.push(Rhomb {
                    coord: Coord::new(x, y),
                    reacted: false,
                });
            }
        }

        Ok(Self {
            points_x,
            points_y,
            sites,
        })
    }

    /// Number of lattice points along x (even rows; odd rows hold half).
    pub fn points_x(&self) -> i64 {
        self.points_x
    }

    /// Number of rows.
    pub fn points_y(&self) -> i64 {
        self.points_y
    }

    /// Total number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Number of sites in row `y` (`y` may be un-wrapped).
    pub fn row_width(&self, y: i64) -> i64 {
        if y.rem_euclid(2) == 0 {
            self.points_x
        } else {
            self.points_x / 2
        }
    }

    /// Wrap a coordinate onto the torus.
    ///
    /// `y` wraps into `[0, points_y)`, then `x` into `[0, row_width(y))`.
    /// Every lookup routes through here; wrap-around arithmetic lives
    /// nowhere else.
    pub fn normalize(&self, c: Coord) -> Coord {
        let y = c.y.rem_euclid(self.points_y);
        let x = c.x.rem_euclid(self.row_width(y));
        Coord::new(x, y)
    }

    /// Flat storage index of a *normalized* coordinate.
    ///
    /// Rows are stored contiguously; a pair of rows (one full, one half
    /// density) spans `3/2 * points_x` sites.
    fn index_of(&self, c: Coord) -> usize {
        let pair = 3 * self.points_x / 2;
        let offset = c.y / 2 * pair + if c.y % 2 == 1 { self.points_x } else { 0 };
        (offset + c.x) as usize
    }

    /// Flat index of an arbitrary coordinate, wrapping first.
    pub fn site_index(&self, c: Coord) -> usize {
        self.index_of(self.normalize(c))
    }

    /// Look up a site, wrapping the coordinate first.
    pub fn rhomb(&self, c: Coord) -> &Rhomb {
        &self.sites[self.site_index(c)]
    }

    /// Site by flat storage index.
    pub fn rhomb_at(&self, index: usize) -> &Rhomb {
        &self.sites[index]
    }

    /// Mark a site as reacted. Returns `false` if it already was.
    ///
    /// The flag never reverts; there is deliberately no way to clear it.
    pub fn react(&mut self, index: usize) -> bool {
        let rhomb = &mut self.sites[index];
        if rhomb.reacted {
            false
        } else {
            rhomb.reacted = true;
            true
        }
    }

    /// Iterate over all sites in storage order.
    pub fn rhombs(&self) -> impl Iterator<Item = &Rhomb> {
        self.sites.iter()
    }

    /// The four immediate neighbors of a site, *un-normalized*.
    ///
    /// Four cases on `y mod 4`, because the screen offset pattern of the
    /// tiling repeats with period four rows and the column index doubles or
    /// halves when stepping between a full-density and a half-density row.
    ///
    /// Near the row seams the produced coordinates can fall outside the
    /// valid range or coincide; that is expected. Callers normalize, and the
    /// shell set-algebra filters duplicates. Do not "repair" the formula.
    pub fn immediate_neighbors(&self, c: Coord) -> [Coord; 4] {
        let Coord { x, y } = c;
        match y.rem_euclid(4) {
            0 => [
                Coord::new(x - 1, y),
                Coord::new(x + 1, y),
                Coord::new(x.div_euclid(2), y - 1),
                Coord::new((x + 1).div_euclid(2), y + 1),
            ],
            1 => [
                Coord::new(2 * x - 1, y - 1),
                Coord::new(2 * x, y - 1),
                Coord::new(2 * x - 1, y + 1),
                Coord::new(2 * x, y + 1),
            ],
            2 => [
                Coord::new(x - 1, y),
                Coord::new(x + 1, y),
                Coord::new((x + 1).div_euclid(2), y - 1),
                Coord::new(x.div_euclid(2), y + 1),
            ],
            _ => [
                Coord::new(2 * x, y - 1),
                Coord::new(2 * x + 1, y - 1),
                Coord::new(2 * x, y + 1),
                Coord::new(2 * x + 1, y + 1),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_dimensions_round_up() {
        let lattice = Lattice::new(7, 9).unwrap();
        assert_eq!(lattice.points_x(), 8);
        assert_eq!(lattice.points_y(), 10);
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(Lattice::new(0, 8).is_err());
        assert!(Lattice::new(8, 0).is_err());
    }

    #[test]
    fn row_widths_alternate() {
        let lattice = Lattice::new(8, 8).unwrap();
        assert_eq!(lattice.row_width(0), 8);
        assert_eq!(lattice.row_width(1), 4);
        assert_eq!(lattice.row_width(2), 8);
        assert_eq!(lattice.row_width(-1), 4);
    }

    #[test]
    fn site_count_matches_rows() {
        let lattice = Lattice::new(8, 8).unwrap();
        // 4 full rows of 8, 4 half rows of 4.
        assert_eq!(lattice.site_count(), 4 * 8 + 4 * 4);
    }

    #[test]
    fn torus_symmetry() {
        let lattice = Lattice::new(8, 8).unwrap();
        for &(x, y) in &[(0, 0), (3, 1), (7, 2), (2, 3), (5, 6)] {
            let c = Coord::new(x, y);
            let w = lattice.row_width(y);
            assert_eq!(lattice.normalize(c), lattice.normalize(Coord::new(x + w, y)));
            assert_eq!(lattice.normalize(c), lattice.normalize(Coord::new(x, y + 8)));
            assert_eq!(lattice.normalize(c), lattice.normalize(Coord::new(x - w, y - 8)));
        }
    }

    #[test]
    fn normalize_is_identity_on_normalized() {
        let lattice = Lattice::new(8, 8).unwrap();
        for rhomb in lattice.rhombs() {
            assert_eq!(lattice.normalize(rhomb.coord), rhomb.coord);
        }
    }

    #[test]
    fn flat_index_roundtrips() {
        let lattice = Lattice::new(8, 8).unwrap();
        for (i, rhomb) in lattice.rhombs().enumerate() {
            assert_eq!(lattice.site_index(rhomb.coord), i);
        }
    }

    #[test]
    fn neighbor_counts_are_four_after_wrapping() {
        let lattice = Lattice::new(8, 8).unwrap();
        for rhomb in lattice.rhombs() {
            let mut seen = std::collections::HashSet::new();
            for n in lattice.immediate_neighbors(rhomb.coord) {
                seen.insert(lattice.normalize(n));
            }
            assert_eq!(seen.len(), 4, "site {}", rhomb.coord);
            assert!(!seen.contains(&rhomb.coord));
        }
    }

    #[test]
    fn neighbor_relation_is_symmetric() {
        let lattice = Lattice::new(8, 8).unwrap();
        for rhomb in lattice.rhombs() {
            for n in lattice.immediate_neighbors(rhomb.coord) {
                let n = lattice.normalize(n);
                let back: Vec<_> = lattice
                    .immediate_neighbors(n)
                    .iter()
                    .map(|&b| lattice.normalize(b))
                    .collect();
                assert!(
                    back.contains(&rhomb.coord),
                    "{} lists {} but not vice versa",
                    rhomb.coord,
                    n
                );
            }
        }
    }

    #[test]
    fn known_neighbors_of_origin() {
        let lattice = Lattice::new(8, 8).unwrap();
        let mut n: Vec<_> = lattice
            .immediate_neighbors(Coord::new(0, 0))
            .iter()
            .map(|&c| lattice.normalize(c))
            .collect();
        n.sort();
        assert_eq!(
            n,
            vec![
                Coord::new(0, 1),
                Coord::new(0, 7),
                Coord::new(1, 0),
                Coord::new(7, 0),
            ]
        );
    }

    #[test]
    fn react_is_monotone() {
        let mut lattice = Lattice::new(4, 4).unwrap();
        let i = lattice.site_index(Coord::new(1, 1));
        assert!(lattice.react(i));
        assert!(!lattice.react(i));
        assert!(lattice.rhomb_at(i).reacted);
    }
}
