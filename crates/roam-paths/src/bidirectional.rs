//! Bidirectional A*: two alternating frontiers meeting in the middle.

use std::collections::BinaryHeap;
use std::time::Instant;

use crate::error::SearchError;
use crate::finder::{OpenEntry, PathFinder, SearchArena};
use crate::graph::Graph;

/// One search frontier with its own arena, heap, and insertion counter.
struct Frontier<N> {
    arena: SearchArena<N>,
    open: BinaryHeap<OpenEntry>,
    seq: u64,
}

impl<N: Clone + Eq + std::hash::Hash> Frontier<N> {
    fn new(cap: usize) -> Self {
        Self {
            arena: SearchArena::with_capacity(cap),
            open: BinaryHeap::with_capacity(cap),
            seq: 0,
        }
    }

    fn push(&mut self, idx: usize, f: f64, h: f64) {
        self.seq += 1;
        self.open.push(OpenEntry {
            f,
            h,
            seq: self.seq,
            idx,
        });
    }

    /// Drop stale entries, then return the smallest open `f`, or `None` when
    /// the frontier is exhausted.
    fn min_f(&mut self) -> Option<f64> {
        while let Some(top) = self.open.peek() {
            if self.arena.get(top.idx).open {
                return Some(top.f);
            }
            self.open.pop();
        }
        None
    }
}

impl PathFinder {
    /// Compute the shortest path by searching from both endpoints at once.
    ///
    /// A forward search from `start` and a backward search from `goal`
    /// (expanding reversed edges, `cost(to, from)`) alternate expansion steps.
    /// The best known meeting cost `g_fwd(n) + g_bwd(n)` is tracked over all
    /// nodes seen by both frontiers; the search stops once a frontier's
    /// minimum `f` proves no remaining route can beat it, and the path is
    /// spliced at the meeting node.
    ///
    /// The backward search enumerates predecessors with [`Graph::neighbors`],
    /// so the adjacency relation must be symmetric (true for [`GridMap`]
    /// (crate::GridMap) and any undirected graph).
    ///
    /// Returns the same cost as [`find_path`](Self::find_path) for an
    /// admissible `heuristic`, `Ok(None)` when the endpoints lie in different
    /// components.
    pub fn find_bidirectional_path<G, H>(
        &mut self,
        graph: &G,
        start: G::Node,
        goal: G::Node,
        heuristic: H,
    ) -> Result<Option<Vec<G::Node>>, SearchError>
    where
        G: Graph,
        H: Fn(&G::Node, &G::Node) -> f64,
    {
        let started = Instant::now();
        if !graph.is_valid_node(&start) {
            self.record("bidirectional", started, 0, 0, 0.0, false);
            return Err(SearchError::InvalidStart);
        }
        if !graph.is_valid_node(&goal) {
            self.record("bidirectional", started, 0, 0, 0.0, false);
            return Err(SearchError::InvalidGoal);
        }
        if start == goal {
            self.record("bidirectional", started, 0, 0, 0.0, true);
            return Ok(Some(vec![start]));
        }

        let cap = graph.estimate_path_length(&start, &goal).unwrap_or(32).max(16);
        let mut fwd: Frontier<G::Node> = Frontier::new(cap);
        let mut bwd: Frontier<G::Node> = Frontier::new(cap);
        let mut explored = 0usize;
        let mut closed = 0usize;

        {
            let si = fwd.arena.intern(&start);
            let h = heuristic(&start, &goal);
            let node = fwd.arena.get_mut(si);
            node.g = 0.0;
            node.h = h;
            node.open = true;
            fwd.push(si, h, h);
            explored += 1;

            let gi = bwd.arena.intern(&goal);
            let h = heuristic(&goal, &start);
            let node = bwd.arena.get_mut(gi);
            node.g = 0.0;
            node.h = h;
            node.open = true;
            bwd.push(gi, h, h);
            explored += 1;
        }

        // Best meeting: minimal g_fwd(n) + g_bwd(n), with the node's index in
        // each arena.
        let mut best_cost = f64::INFINITY;
        let mut best_meet: Option<(usize, usize)> = None;
        let mut nbuf: Vec<G::Node> = Vec::with_capacity(8);
        let mut forward_turn = true;

        loop {
            // Either frontier emptying ends the search: every start-goal
            // route crosses both frontiers, so nothing better remains.
            let (Some(top_f), Some(top_b)) = (fwd.min_f(), bwd.min_f()) else {
                break;
            };
            // A frontier whose minimum f reaches the best meeting cost cannot
            // improve it: f lower-bounds any remaining route through that
            // frontier.
            if best_cost <= top_f || best_cost <= top_b {
                break;
            }

            let (this, other) = if forward_turn {
                (&mut fwd, &mut bwd)
            } else {
                (&mut bwd, &mut fwd)
            };
            forward_turn = !forward_turn;

            let Some(current) = this.open.pop() else {
                continue;
            };
            let ci = current.idx;
            if !this.arena.get(ci).open {
                continue;
            }
            this.arena.get_mut(ci).open = false;
            closed += 1;

            let current_g = this.arena.get(ci).g;
            let current_node = this.arena.get(ci).node.clone();

            if let Some(oi) = other.arena.lookup(&current_node) {
                let og = other.arena.get(oi).g;
                if current_g + og < best_cost {
                    best_cost = current_g + og;
                    best_meet = Some(if forward_turn {
                        // `this` was the backward frontier this turn.
                        (oi, ci)
                    } else {
                        (ci, oi)
                    });
                }
            }

            nbuf.clear();
            graph.neighbors(&current_node, &mut nbuf);
            // `forward_turn` has already been flipped for the next iteration,
            // so it is true exactly when this expansion is backward.
            let backward = forward_turn;

            for n in nbuf.iter() {
                let edge = if backward {
                    graph.cost(n, &current_node)
                } else {
                    graph.cost(&current_node, n)
                };
                if !edge.is_finite() {
                    continue;
                }
                let tentative_g = current_g + edge;
                let ni = this.arena.intern(n);
                if tentative_g >= this.arena.get(ni).g {
                    continue;
                }
                let h = if backward {
                    heuristic(n, &start)
                } else {
                    heuristic(n, &goal)
                };
                let node = this.arena.get_mut(ni);
                node.g = tentative_g;
                node.h = h;
                node.parent = ci;
                node.open = true;
                this.push(ni, tentative_g + h, h);
                explored += 1;

                if let Some(oi) = other.arena.lookup(n) {
                    let og = other.arena.get(oi).g;
                    if tentative_g + og < best_cost {
                        best_cost = tentative_g + og;
                        best_meet = Some(if backward { (oi, ni) } else { (ni, oi) });
                    }
                }
            }
        }

        let Some((fi, bi)) = best_meet else {
            self.record("bidirectional", started, explored, closed, 0.0, false);
            return Ok(None);
        };

        // Forward chain runs start -> meet; backward chain root is the goal,
        // so its walk gives goal -> meet and is reversed onto the tail.
        let mut path = fwd.arena.path_to(fi);
        let mut tail = bwd.arena.path_to(bi);
        tail.reverse();
        path.extend(tail.into_iter().skip(1));

        self.record("bidirectional", started, explored, closed, best_cost, true);
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::fixtures::{assert_connected, grid_from_ascii, path_cost};
    use crate::grid::{Connectivity, GridMap};
    use crate::heuristics;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};
    use roam_core::Point;

    #[test]
    fn matches_astar_on_fixed_maps() {
        let maps = [
            grid_from_ascii(Connectivity::Eight, &[
                ".....",
                ".###.",
                ".....",
                ".###.",
                ".....",
            ]),
            grid_from_ascii(Connectivity::Four, &[
                "..#..",
                "..#..",
                "..#..",
                "..#..",
                ".....",
            ]),
        ];
        let mut pf = PathFinder::new();
        for map in &maps {
            let (start, goal) = (Point::new(0, 0), Point::new(4, 0));
            let h = match map.connectivity() {
                Connectivity::Four => heuristics::manhattan,
                Connectivity::Eight => heuristics::octile,
            };
            let uni = pf.find_path(map, start, goal, h).unwrap().unwrap();
            let bi = pf.find_bidirectional_path(map, start, goal, h).unwrap().unwrap();
            assert_eq!(bi.first(), Some(&start));
            assert_eq!(bi.last(), Some(&goal));
            assert_connected(map, &bi);
            assert!((path_cost(map, &uni) - path_cost(map, &bi)).abs() < 1e-9);
        }
    }

    #[test]
    fn matches_astar_on_random_pairs() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut map = GridMap::new(20, 20, Connectivity::Eight).unwrap();
        for y in 0..20 {
            for x in 0..20 {
                if rng.random_range(0..100) < 20 {
                    map.set_obstacle(Point::new(x, y), true).unwrap();
                }
            }
        }
        let mut pf = PathFinder::new();
        let mut checked = 0;
        while checked < 200 {
            let start = Point::new(rng.random_range(0..20), rng.random_range(0..20));
            let goal = Point::new(rng.random_range(0..20), rng.random_range(0..20));
            if !map.is_passable(start) || !map.is_passable(goal) {
                continue;
            }
            checked += 1;
            let uni = pf.find_path(&map, start, goal, heuristics::octile).unwrap();
            let bi = pf
                .find_bidirectional_path(&map, start, goal, heuristics::octile)
                .unwrap();
            match (uni, bi) {
                (Some(u), Some(b)) => {
                    assert_connected(&map, &b);
                    assert!(
                        (path_cost(&map, &u) - path_cost(&map, &b)).abs() < 1e-9,
                        "cost mismatch for {start} -> {goal}"
                    );
                }
                (None, None) => {}
                (u, b) => panic!(
                    "reachability mismatch for {start} -> {goal}: {:?} vs {:?}",
                    u.is_some(),
                    b.is_some()
                ),
            }
        }
    }

    #[test]
    fn partitioned_map_is_no_path() {
        let map = grid_from_ascii(Connectivity::Eight, &[
            "..#..",
            "..#..",
            "..#..",
        ]);
        let mut pf = PathFinder::new();
        let got = pf
            .find_bidirectional_path(&map, Point::new(0, 1), Point::new(4, 1), heuristics::octile)
            .unwrap();
        assert_eq!(got, None);
        assert!(!pf.last_stats().success);
    }

    #[test]
    fn start_equals_goal() {
        let map = GridMap::new(3, 3, Connectivity::Four).unwrap();
        let mut pf = PathFinder::new();
        let p = Point::new(2, 2);
        let path = pf
            .find_bidirectional_path(&map, p, p, heuristics::manhattan)
            .unwrap()
            .unwrap();
        assert_eq!(path, vec![p]);
    }

    #[test]
    fn validates_endpoints() {
        let mut map = GridMap::new(3, 3, Connectivity::Four).unwrap();
        map.set_obstacle(Point::new(0, 0), true).unwrap();
        let mut pf = PathFinder::new();
        assert_eq!(
            pf.find_bidirectional_path(&map, Point::new(0, 0), Point::new(2, 2), heuristics::manhattan),
            Err(SearchError::InvalidStart)
        );
    }
}
