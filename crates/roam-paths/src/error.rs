use roam_core::Point;
use thiserror::Error;

/// Errors from constructing or mutating a [`GridMap`](crate::GridMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Map dimensions must both be positive.
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    /// The point lies outside the map. Mutating out of bounds is an error,
    /// not a no-op, so caller bugs surface instead of vanishing.
    #[error("point {0} is out of bounds")]
    OutOfBounds(Point),
}

/// Errors reported before a search starts.
///
/// A well-formed query with no connecting route is *not* an error: the
/// `find_path`-family methods report that as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The start node is out of bounds or not traversable.
    #[error("start node is not a valid search endpoint")]
    InvalidStart,
    /// The goal node is out of bounds or not traversable.
    #[error("goal node is not a valid search endpoint")]
    InvalidGoal,
    /// Jump point search requires uniform step costs; this map has variable
    /// terrain. Fall back to [`find_path`](crate::PathFinder::find_path).
    #[error("jump point search requires a uniform-cost map")]
    NonUniformCost,
}
