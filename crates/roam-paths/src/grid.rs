//! Dense 2D grid map with per-cell terrain costs and obstacles.

use std::f64::consts::SQRT_2;
use std::fmt;

use roam_core::Point;

use crate::error::GridError;
use crate::graph::Graph;

/// Terrain classification for a grid cell, mapped to a cost multiplier.
///
/// The reference multipliers grow monotonically with difficulty; the exact
/// constants are policy, not contract. `Obstacle` is impassable rather than
/// merely expensive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainType {
    Road,
    #[default]
    Open,
    Grass,
    Difficult,
    VeryDifficult,
    Water,
    Obstacle,
}

impl TerrainType {
    /// Cost multiplier applied per step into a cell of this terrain.
    ///
    /// Finite and positive for every traversable terrain; `f64::INFINITY`
    /// for [`TerrainType::Obstacle`].
    pub fn multiplier(self) -> f64 {
        match self {
            TerrainType::Road => 0.5,
            TerrainType::Open => 1.0,
            TerrainType::Grass => 1.5,
            TerrainType::Difficult => 2.5,
            TerrainType::VeryDifficult => 4.0,
            TerrainType::Water => 6.0,
            TerrainType::Obstacle => f64::INFINITY,
        }
    }
}

/// Movement model of a [`GridMap`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Cardinal moves only.
    Four,
    /// Cardinal and diagonal moves; diagonals cost √2 and may not squeeze
    /// between two orthogonally adjacent obstacles.
    #[default]
    Eight,
}

/// A bounded 2D grid implementing [`Graph`] over [`Point`] nodes.
///
/// Owns an obstacle flag and a [`TerrainType`] per cell in flat row-major
/// storage. The map is mutated only through [`set_obstacle`](Self::set_obstacle)
/// and the terrain setters; searches treat it as read-only, so independent
/// searches may share one map across threads as long as no thread mutates it
/// mid-search.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    width: i32,
    height: i32,
    connectivity: Connectivity,
    blocked: Vec<bool>,
    terrain: Vec<TerrainType>,
}

impl GridMap {
    /// Create an all-open map. Rejects non-positive dimensions.
    pub fn new(width: i32, height: i32, connectivity: Connectivity) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            connectivity,
            blocked: vec![false; len],
            terrain: vec![TerrainType::Open; len],
        })
    }

    /// Map width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Map height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The movement model this map was built with.
    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Whether `p` lies inside the map bounds.
    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.in_bounds(p) {
            return None;
        }
        Some(p.y as usize * self.width as usize + p.x as usize)
    }

    /// Whether `p` carries an explicit obstacle flag. Out-of-bounds points
    /// report `false`; use [`in_bounds`](Self::in_bounds) to distinguish.
    pub fn has_obstacle(&self, p: Point) -> bool {
        self.idx(p).map(|i| self.blocked[i]).unwrap_or(false)
    }

    /// Terrain of the cell at `p`, or `None` out of bounds.
    pub fn terrain(&self, p: Point) -> Option<TerrainType> {
        self.idx(p).map(|i| self.terrain[i])
    }

    /// Whether `p` can be stood on: in bounds, not flagged as an obstacle,
    /// and not obstacle terrain.
    pub fn is_passable(&self, p: Point) -> bool {
        match self.idx(p) {
            Some(i) => !self.blocked[i] && self.terrain[i] != TerrainType::Obstacle,
            None => false,
        }
    }

    /// Set or clear the obstacle flag at `p`. Out of bounds is an error.
    pub fn set_obstacle(&mut self, p: Point, blocked: bool) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        self.blocked[i] = blocked;
        Ok(())
    }

    /// Set the terrain at `p`. Out of bounds is an error.
    pub fn set_terrain(&mut self, p: Point, terrain: TerrainType) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        self.terrain[i] = terrain;
        Ok(())
    }

    /// Set every cell's terrain, leaving obstacle flags untouched.
    pub fn fill_terrain(&mut self, terrain: TerrainType) {
        self.terrain.fill(terrain);
    }

    /// Whether every passable cell shares one terrain multiplier.
    ///
    /// Jump point search is only valid on such maps: its jump-skipping
    /// assumes every step of a given kind costs the same.
    pub fn has_uniform_cost(&self) -> bool {
        self.uniform_cost_multiplier().is_some()
    }

    /// The single terrain multiplier shared by every passable cell, or
    /// `None` when terrain costs vary. An all-blocked map reports `Some(1.0)`.
    pub fn uniform_cost_multiplier(&self) -> Option<f64> {
        let mut mult = None;
        for i in 0..self.terrain.len() {
            if self.blocked[i] || self.terrain[i] == TerrainType::Obstacle {
                continue;
            }
            let m = self.terrain[i].multiplier();
            match mult {
                None => mult = Some(m),
                Some(prev) if prev != m => return None,
                Some(_) => {}
            }
        }
        mult.or(Some(1.0))
    }

    /// Append the passable neighbours of `p` under the map's connectivity.
    ///
    /// Diagonal steps are kept only when at least one of their two orthogonal
    /// component cells is passable, so a path never squeezes between two
    /// orthogonally adjacent obstacles.
    pub fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        const CARDINAL: [Point; 4] = [
            Point::new(0, -1),
            Point::new(1, 0),
            Point::new(0, 1),
            Point::new(-1, 0),
        ];
        const DIAGONAL: [Point; 4] = [
            Point::new(1, -1),
            Point::new(1, 1),
            Point::new(-1, 1),
            Point::new(-1, -1),
        ];

        for d in CARDINAL {
            let n = p + d;
            if self.is_passable(n) {
                buf.push(n);
            }
        }
        if self.connectivity == Connectivity::Eight {
            for d in DIAGONAL {
                let n = p + d;
                if self.is_passable(n) && self.diagonal_open(p, d) {
                    buf.push(n);
                }
            }
        }
    }

    /// Corner rule: the diagonal step `d` out of `p` is open when at least
    /// one of its orthogonal component cells is passable.
    #[inline]
    pub(crate) fn diagonal_open(&self, p: Point, d: Point) -> bool {
        self.is_passable(Point::new(p.x + d.x, p.y)) || self.is_passable(Point::new(p.x, p.y + d.y))
    }

    /// Edge cost from `from` into adjacent `to`: the destination cell's
    /// terrain multiplier, times √2 for diagonal steps. `f64::INFINITY` when
    /// `to` is impassable.
    pub fn cost(&self, from: Point, to: Point) -> f64 {
        let Some(i) = self.idx(to) else {
            return f64::INFINITY;
        };
        if self.blocked[i] {
            return f64::INFINITY;
        }
        let d = to - from;
        let step = if d.x != 0 && d.y != 0 { SQRT_2 } else { 1.0 };
        self.terrain[i].multiplier() * step
    }

    /// Supercover line-of-sight test: true iff no obstacle cell intersects
    /// the straight segment between the centres of `a` and `b`.
    ///
    /// A segment crossing a lattice corner exactly needs at least one of the
    /// two cells beside the corner to be passable, matching the diagonal
    /// corner rule.
    pub fn has_line_of_sight(&self, a: Point, b: Point) -> bool {
        if !self.is_passable(a) || !self.is_passable(b) {
            return false;
        }
        let nx = i64::from((b.x - a.x).abs());
        let ny = i64::from((b.y - a.y).abs());
        let sx = (b.x - a.x).signum();
        let sy = (b.y - a.y).signum();

        let mut p = a;
        let mut ix: i64 = 0;
        let mut iy: i64 = 0;
        while ix < nx || iy < ny {
            // Compare the fractional progress of the next x- and y-crossing.
            // The products exceed i32 once both axis deltas are large, so the
            // walk runs in i64.
            let tx = (1 + 2 * ix) * ny;
            let ty = (1 + 2 * iy) * nx;
            if tx == ty {
                // Exact corner crossing.
                if !self.is_passable(Point::new(p.x + sx, p.y))
                    && !self.is_passable(Point::new(p.x, p.y + sy))
                {
                    return false;
                }
                p = Point::new(p.x + sx, p.y + sy);
                ix += 1;
                iy += 1;
            } else if tx < ty {
                p = Point::new(p.x + sx, p.y);
                ix += 1;
            } else {
                p = Point::new(p.x, p.y + sy);
                iy += 1;
            }
            if !self.is_passable(p) {
                return false;
            }
        }
        true
    }
}

impl Graph for GridMap {
    type Node = Point;

    fn neighbors(&self, n: &Point, buf: &mut Vec<Point>) {
        GridMap::neighbors(self, *n, buf);
    }

    fn cost(&self, from: &Point, to: &Point) -> f64 {
        GridMap::cost(self, *from, *to)
    }

    fn is_valid_node(&self, n: &Point) -> bool {
        self.is_passable(*n)
    }

    fn estimate_path_length(&self, from: &Point, to: &Point) -> Option<usize> {
        let d = match self.connectivity {
            Connectivity::Four => from.manhattan(*to),
            Connectivity::Eight => from.chebyshev(*to),
        };
        Some(d as usize + 1)
    }
}

impl fmt::Display for GridMap {
    /// ASCII render, one row per line: `#` blocked, `.` open, `r` road,
    /// `,` grass, `^` difficult, `&` very difficult, `~` water.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point::new(x, y);
                let c = if !self.is_passable(p) {
                    '#'
                } else {
                    match self.terrain(p).unwrap_or_default() {
                        TerrainType::Road => 'r',
                        TerrainType::Open => '.',
                        TerrainType::Grass => ',',
                        TerrainType::Difficult => '^',
                        TerrainType::VeryDifficult => '&',
                        TerrainType::Water => '~',
                        TerrainType::Obstacle => '#',
                    }
                };
                write!(f, "{c}")?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::grid_from_ascii;
    use super::*;

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            GridMap::new(0, 5, Connectivity::Four),
            Err(GridError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(GridMap::new(3, -1, Connectivity::Eight).is_err());
    }

    #[test]
    fn mutators_reject_out_of_bounds() {
        let mut map = GridMap::new(4, 4, Connectivity::Four).unwrap();
        let oob = Point::new(4, 0);
        assert_eq!(map.set_obstacle(oob, true), Err(GridError::OutOfBounds(oob)));
        assert_eq!(
            map.set_terrain(oob, TerrainType::Water),
            Err(GridError::OutOfBounds(oob))
        );
        assert!(map.set_obstacle(Point::new(3, 3), true).is_ok());
        assert!(map.has_obstacle(Point::new(3, 3)));
    }

    #[test]
    fn terrain_ordering_is_monotonic() {
        let order = [
            TerrainType::Road,
            TerrainType::Open,
            TerrainType::Grass,
            TerrainType::Difficult,
            TerrainType::VeryDifficult,
            TerrainType::Water,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].multiplier() < pair[1].multiplier());
            assert!(pair[0].multiplier() > 0.0 && pair[0].multiplier().is_finite());
        }
        assert!(TerrainType::Obstacle.multiplier().is_infinite());
    }

    #[test]
    fn four_connected_neighbors() {
        let map = grid_from_ascii(Connectivity::Four, &[
            "...",
            ".#.",
            "...",
        ]);
        let mut buf = Vec::new();
        map.neighbors(Point::new(0, 1), &mut buf);
        assert_eq!(buf, vec![Point::new(0, 0), Point::new(0, 2)]);
    }

    #[test]
    fn eight_connected_corner_rule() {
        // Diagonal from (0,1) to (1,0) passes beside a single obstacle at
        // (1,1): allowed. The (1,0)/(0,1) squeeze in the second map is not.
        let map = grid_from_ascii(Connectivity::Eight, &[
            "...",
            ".#.",
            "...",
        ]);
        let mut buf = Vec::new();
        map.neighbors(Point::new(0, 1), &mut buf);
        assert!(buf.contains(&Point::new(1, 0)));
        assert!(buf.contains(&Point::new(1, 2)));

        let squeeze = grid_from_ascii(Connectivity::Eight, &[
            ".#",
            "#.",
        ]);
        buf.clear();
        squeeze.neighbors(Point::new(0, 0), &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn cost_uses_destination_terrain() {
        let mut map = GridMap::new(3, 1, Connectivity::Eight).unwrap();
        map.set_terrain(Point::new(1, 0), TerrainType::Water).unwrap();
        let a = Point::new(0, 0);
        let b = Point::new(1, 0);
        assert_eq!(map.cost(a, b), 6.0);
        // Stepping back out of water onto open ground costs 1.
        assert_eq!(map.cost(b, a), 1.0);
        map.set_obstacle(b, true).unwrap();
        assert!(map.cost(a, b).is_infinite());
    }

    #[test]
    fn diagonal_cost_is_sqrt2() {
        let map = GridMap::new(3, 3, Connectivity::Eight).unwrap();
        let c = map.cost(Point::new(0, 0), Point::new(1, 1));
        assert!((c - SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn uniform_cost_probe() {
        let mut map = GridMap::new(4, 4, Connectivity::Eight).unwrap();
        assert!(map.has_uniform_cost());
        // Obstacles do not break uniformity.
        map.set_obstacle(Point::new(1, 1), true).unwrap();
        assert!(map.has_uniform_cost());
        map.set_terrain(Point::new(2, 2), TerrainType::Grass).unwrap();
        assert!(!map.has_uniform_cost());
    }

    #[test]
    fn line_of_sight_straight_and_blocked() {
        let map = grid_from_ascii(Connectivity::Eight, &[
            ".....",
            "..#..",
            ".....",
        ]);
        assert!(map.has_line_of_sight(Point::new(0, 0), Point::new(4, 0)));
        assert!(map.has_line_of_sight(Point::new(0, 2), Point::new(4, 2)));
        // Straight through the wall cell.
        assert!(!map.has_line_of_sight(Point::new(2, 0), Point::new(2, 2)));
        assert!(!map.has_line_of_sight(Point::new(0, 1), Point::new(4, 1)));
    }

    #[test]
    fn line_of_sight_corner_crossing() {
        // The diagonal from (0,0) to (2,2) passes exactly through the corner
        // at (1,1); with both side cells blocked it must fail.
        let open = grid_from_ascii(Connectivity::Eight, &[
            "...",
            "...",
            "...",
        ]);
        assert!(open.has_line_of_sight(Point::new(0, 0), Point::new(2, 2)));

        let squeeze = grid_from_ascii(Connectivity::Eight, &[
            ".#.",
            "#..",
            "...",
        ]);
        assert!(!squeeze.has_line_of_sight(Point::new(0, 0), Point::new(2, 2)));
    }

    #[test]
    #[ignore = "allocates a multi-gigabyte map"]
    fn line_of_sight_spans_huge_maps() {
        // Crossing products reach ~2.4e9 on this diagonal, past i32::MAX;
        // the i64 walk must neither panic nor wrap.
        let map = GridMap::new(40_000, 30_000, Connectivity::Eight).unwrap();
        let a = Point::new(0, 0);
        let b = Point::new(39_999, 29_999);
        assert!(map.has_line_of_sight(a, b));
        assert!(map.has_line_of_sight(b, a));
    }

    #[test]
    fn display_round_trips_through_fixture() {
        let rows = ["r..", ",#~", "..^"];
        let map = grid_from_ascii(Connectivity::Eight, &rows);
        assert_eq!(map.to_string(), rows.join("\n"));
    }
}
