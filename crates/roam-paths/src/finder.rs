//! The [`PathFinder`] engine and its per-call search bookkeeping.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Diagnostics from the most recent `find_path`-family call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfindingStats {
    /// Nodes pushed into the open set, counting duplicates.
    pub nodes_explored: usize,
    /// Nodes whose cost was finalized.
    pub nodes_closed: usize,
    /// Wall-clock duration of the call.
    pub elapsed: Duration,
    /// Total cost of the returned path; 0 when no path was found.
    pub path_cost: f64,
    /// Whether a path was found.
    pub success: bool,
}

/// Multi-strategy shortest-path search engine.
///
/// The search methods live in their own modules:
/// [`find_path`](Self::find_path) (A* / Dijkstra),
/// [`find_bidirectional_path`](Self::find_bidirectional_path), and
/// [`find_jps_path`](Self::find_jps_path).
///
/// A `PathFinder` holds nothing across calls except the stats of the most
/// recent one; all open/closed/parent state is allocated per call and dropped
/// on return. For concurrent searches give each thread its own instance.
#[derive(Debug, Default)]
pub struct PathFinder {
    stats: PathfindingStats,
}

impl PathFinder {
    /// Create a new engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics snapshot of the most recent search call.
    pub fn last_stats(&self) -> PathfindingStats {
        self.stats
    }

    pub(crate) fn record(
        &mut self,
        algorithm: &str,
        started: Instant,
        explored: usize,
        closed: usize,
        cost: f64,
        success: bool,
    ) {
        self.stats = PathfindingStats {
            nodes_explored: explored,
            nodes_closed: closed,
            elapsed: started.elapsed(),
            path_cost: if success { cost } else { 0.0 },
            success,
        };
        log::debug!(
            "{algorithm}: success={success} cost={cost:.3} explored={explored} closed={closed} in {:?}",
            self.stats.elapsed,
        );
    }
}

// ---------------------------------------------------------------------------
// Per-call search state
// ---------------------------------------------------------------------------

/// A node's search bookkeeping inside a [`SearchArena`].
#[derive(Clone)]
pub(crate) struct SearchNode<N> {
    pub(crate) node: N,
    pub(crate) g: f64,
    pub(crate) h: f64,
    /// Arena index of the parent, or `usize::MAX` for the root.
    pub(crate) parent: usize,
    pub(crate) open: bool,
}

/// Dense node storage with hash interning: nodes live in a vector and link
/// to their parents by index, so reconstruction is a simple backward walk.
pub(crate) struct SearchArena<N> {
    nodes: Vec<SearchNode<N>>,
    index: HashMap<N, usize>,
}

impl<N: Clone + Eq + Hash> SearchArena<N> {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(cap),
            index: HashMap::with_capacity(cap),
        }
    }

    /// Index of `node`, interning it with unreachable cost on first sight.
    pub(crate) fn intern(&mut self, node: &N) -> usize {
        if let Some(&i) = self.index.get(node) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(SearchNode {
            node: node.clone(),
            g: f64::INFINITY,
            h: 0.0,
            parent: usize::MAX,
            open: false,
        });
        self.index.insert(node.clone(), i);
        i
    }

    /// Index of `node` if it has been seen by this search.
    pub(crate) fn lookup(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    #[inline]
    pub(crate) fn get(&self, i: usize) -> &SearchNode<N> {
        &self.nodes[i]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, i: usize) -> &mut SearchNode<N> {
        &mut self.nodes[i]
    }

    /// Walk parent links from `i` back to the root, returning the node
    /// sequence root-first.
    pub(crate) fn path_to(&self, i: usize) -> Vec<N> {
        let mut path = Vec::new();
        let mut cur = i;
        while cur != usize::MAX {
            path.push(self.nodes[cur].node.clone());
            cur = self.nodes[cur].parent;
        }
        path.reverse();
        path
    }
}

/// Open-set entry ordered for a min-heap `BinaryHeap`.
///
/// Tie-break between equal priorities is deterministic: lower `f`, then lower
/// `h` (nodes nearer the goal first), then earlier insertion sequence.
#[derive(Clone, Copy)]
pub(crate) struct OpenEntry {
    pub(crate) f: f64,
    pub(crate) h: f64,
    pub(crate) seq: u64,
    pub(crate) idx: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the smallest f first.
        other
            .f
            .total_cmp(&self.f)
            .then(other.h.total_cmp(&self.h))
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
