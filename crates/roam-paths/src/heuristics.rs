//! Distance estimates for A*-family searches.
//!
//! Every function estimates the remaining cost between two points and takes
//! its arguments by reference, matching the `Fn(&Node, &Node) -> f64` bound
//! of the search methods so each can be passed directly. A* returns optimal
//! paths only when the estimate is *admissible* — it never exceeds the true
//! remaining cost. Which estimate is admissible depends on the movement
//! model:
//!
//! | Heuristic | Admissible for |
//! |---|---|
//! | [`manhattan`] | 4-connected grids |
//! | [`octile`] | 8-connected grids with √2 diagonals |
//! | [`euclidean`] | unrestricted movement (weakest grid bound) |
//! | [`chebyshev`] | only when diagonal cost equals orthogonal cost |
//! | [`zero`] | everything (degrades A* to Dijkstra) |

use roam_core::Point;

/// Manhattan (L1) distance. Admissible on 4-connected grids.
#[inline]
pub fn manhattan(a: &Point, b: &Point) -> f64 {
    f64::from(a.manhattan(*b))
}

/// Euclidean (L2) straight-line distance. Admissible for unrestricted
/// movement; a loose but safe bound on any grid.
#[inline]
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    a.euclidean(*b)
}

/// Octile distance: `max + (√2 − 1)·min` of the axis deltas. The exact
/// remaining cost on an open 8-connected grid with √2 diagonals.
#[inline]
pub fn octile(a: &Point, b: &Point) -> f64 {
    let dx = f64::from((a.x - b.x).abs());
    let dy = f64::from((a.y - b.y).abs());
    dx.max(dy) + (std::f64::consts::SQRT_2 - 1.0) * dx.min(dy)
}

/// Chebyshev (L∞) distance.
///
/// Overestimates when diagonal steps cost more than orthogonal ones (as with
/// √2 diagonals), making A* fast but potentially suboptimal. Offered as a
/// deliberately non-optimal option; prefer [`octile`] on 8-connected grids.
#[inline]
pub fn chebyshev(a: &Point, b: &Point) -> f64 {
    f64::from(a.chebyshev(*b))
}

/// Constant zero. Turns A* into Dijkstra's algorithm: guaranteed optimal with
/// no spatial bias, at the price of exploring more nodes. Use it for abstract
/// graphs where coordinates mean nothing.
#[inline]
pub fn zero(_a: &Point, _b: &Point) -> f64 {
    0.0
}
