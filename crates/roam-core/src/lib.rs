//! Geometry primitives shared by the `roam` pathfinding crates.
//!
//! [`Point`] is an integer 2D coordinate with vector arithmetic, a total
//! order, and distance helpers. [`Direction`] names the eight compass
//! directions used to classify grid movement.

mod direction;
mod geom;

pub use direction::Direction;
pub use geom::Point;
