//! A* shortest-path search (Dijkstra with the zero heuristic).

use std::collections::BinaryHeap;
use std::time::Instant;

use crate::error::SearchError;
use crate::finder::{OpenEntry, PathFinder, SearchArena};
use crate::graph::Graph;

impl PathFinder {
    /// Compute the shortest path from `start` to `goal` over any [`Graph`].
    ///
    /// `heuristic` estimates the remaining cost between two nodes and must be
    /// admissible (never overestimate) for the result to be optimal. Passing
    /// [`heuristics::zero`](crate::heuristics::zero) makes this Dijkstra's
    /// algorithm. A non-admissible heuristic may return a suboptimal path but
    /// always terminates.
    ///
    /// Returns the full path including both endpoints, `Ok(None)` when no
    /// route exists, or an error when an endpoint fails
    /// [`Graph::is_valid_node`].
    pub fn find_path<G, H>(
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
            self.record("astar", started, 0, 0, 0.0, false);
            return Err(SearchError::InvalidStart);
        }
        if !graph.is_valid_node(&goal) {
            self.record("astar", started, 0, 0, 0.0, false);
            return Err(SearchError::InvalidGoal);
        }
        if start == goal {
            self.record("astar", started, 0, 0, 0.0, true);
            return Ok(Some(vec![start]));
        }

        let cap = graph.estimate_path_length(&start, &goal).unwrap_or(32);
        let mut arena: SearchArena<G::Node> = SearchArena::with_capacity(cap.max(16));
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::with_capacity(cap.max(16));
        let mut nbuf: Vec<G::Node> = Vec::with_capacity(8);
        let mut seq: u64 = 0;
        let mut explored = 0usize;
        let mut closed = 0usize;

        let goal_idx;
        {
            let start_idx = arena.intern(&start);
            goal_idx = arena.intern(&goal);
            let h = heuristic(&start, &goal);
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

            // Skip stale queue entries for already-closed nodes.
            if !arena.get(ci).open {
                continue;
            }
            if ci == goal_idx {
                break 'search true;
            }
            arena.get_mut(ci).open = false;
            closed += 1;

            let current_g = arena.get(ci).g;
            let current_node = arena.get(ci).node.clone();

            nbuf.clear();
            graph.neighbors(&current_node, &mut nbuf);

            for n in nbuf.iter() {
                let edge = graph.cost(&current_node, n);
                if !edge.is_finite() {
                    continue;
                }
                let tentative_g = current_g + edge;
                let ni = arena.intern(n);
                if tentative_g >= arena.get(ni).g {
                    continue;
                }
                let h = heuristic(n, &goal);
                let node = arena.get_mut(ni);
                node.g = tentative_g;
                node.h = h;
                node.parent = ci;
                node.open = true;
                seq += 1;
                open.push(OpenEntry {
                    f: tentative_g + h,
                    h,
                    seq,
                    idx: ni,
                });
                explored += 1;
            }
        };

        if !found {
            self.record("astar", started, explored, closed, 0.0, false);
            return Ok(None);
        }

        let cost = arena.get(goal_idx).g;
        let path = arena.path_to(goal_idx);
        self.record("astar", started, explored, closed, cost, true);
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::fixtures::{assert_connected, grid_from_ascii, path_cost};
    use crate::grid::{Connectivity, GridMap, TerrainType};
    use crate::heuristics;
    use roam_core::Point;

    #[test]
    fn open_five_by_five_four_connected() {
        let map = GridMap::new(5, 5, Connectivity::Four).unwrap();
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&map, Point::new(0, 0), Point::new(4, 4), heuristics::manhattan)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.last(), Some(&Point::new(4, 4)));
        assert_connected(&map, &path);
        assert!((path_cost(&map, &path) - 8.0).abs() < 1e-9);
        let stats = pf.last_stats();
        assert!(stats.success);
        assert!((stats.path_cost - 8.0).abs() < 1e-9);
        assert!(stats.nodes_explored > 0);
    }

    #[test]
    fn routes_through_the_single_gap() {
        let map = grid_from_ascii(Connectivity::Four, &[
            "..#..",
            "..#..",
            "..#..",
            "..#..",
            ".....",
        ]);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&map, Point::new(0, 0), Point::new(4, 0), heuristics::manhattan)
            .unwrap()
            .unwrap();
        assert!(path.contains(&Point::new(2, 4)));
        assert_connected(&map, &path);
    }

    #[test]
    fn start_equals_goal() {
        let map = GridMap::new(3, 3, Connectivity::Eight).unwrap();
        let mut pf = PathFinder::new();
        let p = Point::new(1, 1);
        let path = pf.find_path(&map, p, p, heuristics::octile).unwrap().unwrap();
        assert_eq!(path, vec![p]);
        assert!(pf.last_stats().success);
        assert_eq!(pf.last_stats().path_cost, 0.0);
    }

    #[test]
    fn invalid_endpoints_are_errors_not_no_path() {
        let mut map = GridMap::new(5, 5, Connectivity::Four).unwrap();
        map.set_obstacle(Point::new(2, 2), true).unwrap();
        let mut pf = PathFinder::new();
        assert_eq!(
            pf.find_path(&map, Point::new(0, 0), Point::new(2, 2), heuristics::manhattan),
            Err(SearchError::InvalidGoal)
        );
        assert_eq!(
            pf.find_path(&map, Point::new(-1, 0), Point::new(1, 1), heuristics::manhattan),
            Err(SearchError::InvalidStart)
        );
    }

    #[test]
    fn enclosed_goal_is_no_path() {
        let map = grid_from_ascii(Connectivity::Eight, &[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        let mut pf = PathFinder::new();
        let got = pf
            .find_path(&map, Point::new(0, 0), Point::new(2, 2), heuristics::octile)
            .unwrap();
        assert_eq!(got, None);
        assert!(!pf.last_stats().success);
    }

    #[test]
    fn zero_heuristic_matches_astar_cost() {
        let map = grid_from_ascii(Connectivity::Eight, &[
            "......",
            ".##...",
            "..#.#.",
            ".##.#.",
            "....#.",
            "......",
        ]);
        let mut pf = PathFinder::new();
        let start = Point::new(0, 0);
        let goal = Point::new(5, 5);
        let astar = pf.find_path(&map, start, goal, heuristics::octile).unwrap().unwrap();
        let dijkstra = pf.find_path(&map, start, goal, heuristics::zero).unwrap().unwrap();
        assert!((path_cost(&map, &astar) - path_cost(&map, &dijkstra)).abs() < 1e-9);
    }

    #[test]
    fn dijkstra_prefers_cheap_terrain() {
        // Straight line crosses water; the road detour is cheaper overall.
        let map = grid_from_ascii(Connectivity::Four, &[
            ".~.",
            "r.r",
            "rrr",
        ]);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&map, Point::new(0, 0), Point::new(2, 0), heuristics::zero)
            .unwrap()
            .unwrap();
        assert!(!path.contains(&Point::new(1, 0)));
        assert_connected(&map, &path);
        assert_eq!(map.terrain(Point::new(0, 1)), Some(TerrainType::Road));
    }

    #[test]
    fn results_are_reproducible() {
        let map = grid_from_ascii(Connectivity::Eight, &[
            ".....",
            ".#.#.",
            ".....",
            ".#.#.",
            ".....",
        ]);
        let mut pf = PathFinder::new();
        let a = pf
            .find_path(&map, Point::new(0, 0), Point::new(4, 4), heuristics::octile)
            .unwrap();
        let b = pf
            .find_path(&map, Point::new(0, 0), Point::new(4, 4), heuristics::octile)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn inadmissible_heuristic_still_terminates() {
        let map = grid_from_ascii(Connectivity::Eight, &[
            ".....",
            "####.",
            ".....",
            ".####",
            ".....",
        ]);
        let mut pf = PathFinder::new();
        // Manhattan overestimates on an 8-connected map (dx+dy exceeds the
        // octile cost), so optimality is off the table; the search must still
        // finish and return some valid path.
        let path = pf
            .find_path(&map, Point::new(0, 0), Point::new(4, 4), heuristics::manhattan)
            .unwrap()
            .unwrap();
        assert_connected(&map, &path);
    }
}
