use std::hash::Hash;

/// A weighted graph the search engine can explore.
///
/// Implement this to run [`PathFinder`](crate::PathFinder) over any structure:
/// a grid, an abstract city graph, a navmesh. The bundled
/// [`GridMap`](crate::GridMap) is the dense 2D implementation.
pub trait Graph {
    /// Node identifier. Cloned freely; keep it small.
    type Node: Clone + Eq + Hash;

    /// Append the nodes reachable from `n` in one step into `buf`.
    ///
    /// The caller clears `buf` before calling. A node with no outgoing edges
    /// appends nothing.
    fn neighbors(&self, n: &Self::Node, buf: &mut Vec<Self::Node>);

    /// Edge weight from `from` to adjacent `to`.
    ///
    /// Must be positive and finite for traversable edges. Returns
    /// `f64::INFINITY` when the edge is not actually traversable; the engine
    /// skips such edges rather than crossing them.
    fn cost(&self, from: &Self::Node, to: &Self::Node) -> f64;

    /// Whether `n` is a usable search endpoint.
    ///
    /// Checked before a search starts; an invalid start or goal is reported
    /// as an error, distinct from a well-formed query with no route.
    fn is_valid_node(&self, n: &Self::Node) -> bool;

    /// Non-binding hint of how many nodes a path between the endpoints may
    /// hold, used to pre-size internal containers. Inaccuracy never affects
    /// correctness.
    fn estimate_path_length(&self, _from: &Self::Node, _to: &Self::Node) -> Option<usize> {
        None
    }
}
