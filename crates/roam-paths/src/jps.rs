//! Jump Point Search on uniform-cost grids.
//!
//! JPS is an optimised A* for grids where every passable step of a given kind
//! costs the same. Instead of expanding immediate neighbours it "jumps" along
//! straight lines, entering the open set only at *jump points* — cells with a
//! forced neighbour, where an adjacent obstacle would otherwise hide a
//! shorter route.
//!
//! All jumps are explicit loops: straight corridors can be as long as the map
//! dimension, so nothing here recurses. A diagonal jump probes its two
//! cardinal component directions with straight-jump loops at every cell.

use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;
use std::time::Instant;

use roam_core::{Direction, Point};

use crate::error::SearchError;
use crate::finder::{OpenEntry, PathFinder, SearchArena};
use crate::graph::Graph;
use crate::grid::{Connectivity, GridMap};

impl GridMap {
    /// Whether `p`, reached travelling in `dir`, has a forced neighbour: a
    /// cell that only stays reachable at optimal cost by turning at `p`.
    pub fn has_forced_neighbor(&self, p: Point, dir: Direction) -> bool {
        let d = dir.delta();
        match self.connectivity() {
            Connectivity::Eight => {
                if d.x != 0 && d.y != 0 {
                    // Diagonal travel: an obstacle beside the path exposes the
                    // cell diagonally behind it.
                    (!self.is_passable(Point::new(p.x - d.x, p.y))
                        && self.is_passable(Point::new(p.x - d.x, p.y + d.y)))
                        || (!self.is_passable(Point::new(p.x, p.y - d.y))
                            && self.is_passable(Point::new(p.x + d.x, p.y - d.y)))
                } else if d.x != 0 {
                    (!self.is_passable(Point::new(p.x, p.y - 1))
                        && self.is_passable(Point::new(p.x + d.x, p.y - 1)))
                        || (!self.is_passable(Point::new(p.x, p.y + 1))
                            && self.is_passable(Point::new(p.x + d.x, p.y + 1)))
                } else {
                    (!self.is_passable(Point::new(p.x - 1, p.y))
                        && self.is_passable(Point::new(p.x - 1, p.y + d.y)))
                        || (!self.is_passable(Point::new(p.x + 1, p.y))
                            && self.is_passable(Point::new(p.x + 1, p.y + d.y)))
                }
            }
            Connectivity::Four => {
                // Cardinal-only movement: a turn is forced when the cell
                // beside the path is open but was unreachable from the
                // previous cell.
                if d.x != 0 {
                    (self.is_passable(Point::new(p.x, p.y - 1))
                        && !self.is_passable(Point::new(p.x - d.x, p.y - 1)))
                        || (self.is_passable(Point::new(p.x, p.y + 1))
                            && !self.is_passable(Point::new(p.x - d.x, p.y + 1)))
                } else {
                    (self.is_passable(Point::new(p.x - 1, p.y))
                        && !self.is_passable(Point::new(p.x - 1, p.y - d.y)))
                        || (self.is_passable(Point::new(p.x + 1, p.y))
                            && !self.is_passable(Point::new(p.x + 1, p.y - d.y)))
                }
            }
        }
    }

    /// Append the pruned successor directions for a node reached travelling
    /// in `arrival`, or every direction of the movement model for the search
    /// root (`None`).
    ///
    /// This is the heart of JPS: natural neighbours in the travel direction
    /// plus any forced neighbours, instead of the full 4/8-way fan-out.
    pub fn jps_successor_dirs(&self, p: Point, arrival: Option<Direction>, buf: &mut Vec<Point>) {
        let Some(dir) = arrival else {
            let dirs: &[Direction] = match self.connectivity() {
                Connectivity::Four => &Direction::CARDINAL,
                Connectivity::Eight => &Direction::ALL,
            };
            buf.extend(dirs.iter().map(|d| d.delta()));
            return;
        };
        let d = dir.delta();

        match self.connectivity() {
            Connectivity::Eight => {
                if d.x != 0 && d.y != 0 {
                    let x_open = self.is_passable(Point::new(p.x + d.x, p.y));
                    let y_open = self.is_passable(Point::new(p.x, p.y + d.y));
                    if y_open {
                        buf.push(Point::new(0, d.y));
                    }
                    if x_open {
                        buf.push(Point::new(d.x, 0));
                    }
                    if (x_open || y_open) && self.is_passable(p + d) {
                        buf.push(d);
                    }
                    // Forced turns; the replacement diagonal is only legal
                    // when its remaining open component cell is passable.
                    if !self.is_passable(Point::new(p.x - d.x, p.y))
                        && self.is_passable(Point::new(p.x - d.x, p.y + d.y))
                        && y_open
                    {
                        buf.push(Point::new(-d.x, d.y));
                    }
                    if !self.is_passable(Point::new(p.x, p.y - d.y))
                        && self.is_passable(Point::new(p.x + d.x, p.y - d.y))
                        && x_open
                    {
                        buf.push(Point::new(d.x, -d.y));
                    }
                } else {
                    let ahead_open = self.is_passable(p + d);
                    if ahead_open {
                        buf.push(d);
                    }
                    let (perp_a, perp_b) = if d.x != 0 {
                        (Point::new(0, -1), Point::new(0, 1))
                    } else {
                        (Point::new(-1, 0), Point::new(1, 0))
                    };
                    for perp in [perp_a, perp_b] {
                        if !self.is_passable(p + perp)
                            && self.is_passable(p + d + perp)
                            && ahead_open
                        {
                            buf.push(d + perp);
                        }
                    }
                }
            }
            Connectivity::Four => {
                if self.is_passable(p + d) {
                    buf.push(d);
                }
                let (side_a, side_b) = if d.x != 0 {
                    (Point::new(0, -1), Point::new(0, 1))
                } else {
                    (Point::new(-1, 0), Point::new(1, 0))
                };
                for side in [side_a, side_b] {
                    if self.is_passable(p + side) {
                        buf.push(side);
                    }
                }
            }
        }
    }
}

impl PathFinder {
    /// Compute a shortest path on a uniform-cost [`GridMap`] using Jump Point
    /// Search.
    ///
    /// Produces paths of equal cost to
    /// [`find_path`](Self::find_path) with the matching admissible heuristic,
    /// typically exploring far fewer nodes. Maps with variable terrain are
    /// rejected with [`SearchError::NonUniformCost`] — jump skipping is only
    /// sound when every step of a given kind costs the same.
    ///
    /// The returned path is interpolated to single steps, so consecutive
    /// points are always grid neighbours.
    pub fn find_jps_path(
        &mut self,
        map: &GridMap,
        start: Point,
        goal: Point,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        let started = Instant::now();
        let Some(mult) = map.uniform_cost_multiplier() else {
            self.record("jps", started, 0, 0, 0.0, false);
            return Err(SearchError::NonUniformCost);
        };
        if !map.is_passable(start) {
            self.record("jps", started, 0, 0, 0.0, false);
            return Err(SearchError::InvalidStart);
        }
        if !map.is_passable(goal) {
            self.record("jps", started, 0, 0, 0.0, false);
            return Err(SearchError::InvalidGoal);
        }
        if start == goal {
            self.record("jps", started, 0, 0, 0.0, true);
            return Ok(Some(vec![start]));
        }

        let heuristic = |a: Point, b: Point| -> f64 {
            match map.connectivity() {
                Connectivity::Four => mult * f64::from(a.manhattan(b)),
                Connectivity::Eight => {
                    let dx = f64::from((a.x - b.x).abs());
                    let dy = f64::from((a.y - b.y).abs());
                    mult * (dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy))
                }
            }
        };

        let cap = map.estimate_path_length(&start, &goal).unwrap_or(32).max(16);
        let mut arena: SearchArena<Point> = SearchArena::with_capacity(cap);
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::with_capacity(cap);
        let mut dirs: Vec<Point> = Vec::with_capacity(8);
        let mut seq: u64 = 0;
        let mut explored = 0usize;
        let mut closed = 0usize;

        let start_idx = arena.intern(&start);
        let goal_idx = arena.intern(&goal);
        {
            let h = heuristic(start, goal);
            let node = arena.get_mut(start_idx);
            node.g = 0.0;
            node.h = h;
            node.open = true;
            open.push(OpenEntry {
                f: h,
                h,
                seq,
                idx: start_idx,
            });
            explored += 1;
        }

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };
            let ci = current.idx;
            if !arena.get(ci).open {
                continue;
            }
            if ci == goal_idx {
                break 'search true;
            }
            arena.get_mut(ci).open = false;
            closed += 1;

            let cp = arena.get(ci).node;
            let current_g = arena.get(ci).g;
            let arrival = match arena.get(ci).parent {
                usize::MAX => None,
                pi => Direction::between(arena.get(pi).node, cp),
            };

            dirs.clear();
            map.jps_successor_dirs(cp, arrival, &mut dirs);

            for di in 0..dirs.len() {
                let dir = dirs[di];
                let Some((jp, steps)) = jump(map, cp, dir, goal) else {
                    continue;
                };
                let step_cost = if dir.x != 0 && dir.y != 0 {
                    mult * SQRT_2
                } else {
                    mult
                };
                let tentative_g = current_g + f64::from(steps) * step_cost;
                let ji = arena.intern(&jp);
                if tentative_g >= arena.get(ji).g {
                    continue;
                }
                let h = heuristic(jp, goal);
                let node = arena.get_mut(ji);
                node.g = tentative_g;
                node.h = h;
                node.parent = ci;
                node.open = true;
                seq += 1;
                open.push(OpenEntry {
                    f: tentative_g + h,
                    h,
                    seq,
                    idx: ji,
                });
                explored += 1;
            }
        };

        if !found {
            self.record("jps", started, explored, closed, 0.0, false);
            return Ok(None);
        }

        let jp_path = arena.path_to(goal_idx);
        let path = interpolate(&jp_path);
        let cost: f64 = path.windows(2).map(|w| map.cost(w[0], w[1])).sum();
        self.record("jps", started, explored, closed, cost, true);
        Ok(Some(path))
    }
}

/// Jump from `p` along `dir` until a jump point, the goal, or a dead end.
/// Returns the jump point and the number of steps taken to reach it.
fn jump(map: &GridMap, p: Point, dir: Point, goal: Point) -> Option<(Point, i32)> {
    if dir.x != 0 && dir.y != 0 {
        jump_diagonal(map, p, dir, goal)
    } else {
        jump_straight(map, p, dir, goal)
    }
}

/// Straight-line jump: a plain loop, one cell per iteration.
fn jump_straight(map: &GridMap, p: Point, dir: Point, goal: Point) -> Option<(Point, i32)> {
    debug_assert!(dir.x == 0 || dir.y == 0);
    let heading = Direction::between(p, p + dir)?;
    let probe_axis = map.connectivity() == Connectivity::Four && dir.y != 0;
    let mut n = p + dir;
    let mut steps = 1;
    loop {
        if !map.is_passable(n) {
            return None;
        }
        if n == goal {
            return Some((n, steps));
        }
        if map.has_forced_neighbor(n, heading) {
            return Some((n, steps));
        }
        // Cardinal-only movement covers the plane by letting vertical jumps
        // probe a horizontal jump at every cell.
        if probe_axis
            && (probe_straight(map, n, Point::new(1, 0), goal)
                || probe_straight(map, n, Point::new(-1, 0), goal))
        {
            return Some((n, steps));
        }
        n = n + dir;
        steps += 1;
    }
}

/// Whether a straight jump from `p` along `dir` finds any jump point.
/// Used as a probe from diagonal and 4-way vertical jumps.
fn probe_straight(map: &GridMap, p: Point, dir: Point, goal: Point) -> bool {
    let Some(heading) = Direction::between(p, p + dir) else {
        return false;
    };
    let mut n = p + dir;
    loop {
        if !map.is_passable(n) {
            return false;
        }
        if n == goal {
            return true;
        }
        if map.has_forced_neighbor(n, heading) {
            return true;
        }
        n = n + dir;
    }
}

/// Diagonal jump: advances one diagonal cell per iteration, probing both
/// cardinal components with straight-jump loops at each cell.
fn jump_diagonal(map: &GridMap, p: Point, dir: Point, goal: Point) -> Option<(Point, i32)> {
    let heading = Direction::between(p, p + dir)?;
    let mut prev = p;
    let mut n = p + dir;
    let mut steps = 1;
    loop {
        // The diagonal step is only legal when it does not squeeze between
        // two orthogonally adjacent obstacles.
        if !map.is_passable(n) || !map.diagonal_open(prev, dir) {
            return None;
        }
        if n == goal {
            return Some((n, steps));
        }
        if map.has_forced_neighbor(n, heading) {
            return Some((n, steps));
        }
        if probe_straight(map, n, Point::new(dir.x, 0), goal)
            || probe_straight(map, n, Point::new(0, dir.y), goal)
        {
            return Some((n, steps));
        }
        prev = n;
        n = n + dir;
        steps += 1;
    }
}

/// Expand a jump-point path into a step-by-step path.
fn interpolate(jp_path: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(jp_path.len());
    if let Some(&first) = jp_path.first() {
        out.push(first);
    }
    for w in jp_path.windows(2) {
        let mut c = w[0];
        while c != w[1] {
            c = c + (w[1] - c).signum();
            out.push(c);
        }
    }
    out
}
