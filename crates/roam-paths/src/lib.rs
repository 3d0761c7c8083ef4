//! Multi-strategy shortest-path search over abstract graphs and 2D grids.
//!
//! This crate provides interchangeable search strategies plus geometry-aware
//! path post-processing:
//!
//! - **A\*** generic shortest-path search ([`PathFinder::find_path`]); pass
//!   [`heuristics::zero`] for Dijkstra behaviour
//! - **Bidirectional A\*** two-frontier search ([`PathFinder::find_bidirectional_path`])
//! - **Jump Point Search** optimised uniform-cost grid search ([`PathFinder::find_jps_path`])
//! - **Post-processing**: line-of-sight smoothing ([`smooth_path`]), funnel
//!   string pulling ([`funnel_path`]), Ramer–Douglas–Peucker simplification
//!   ([`rdp_simplify`])
//!
//! The generic searches operate on anything implementing [`Graph`];
//! [`GridMap`] is the bundled dense 2D implementation with per-cell terrain
//! costs and obstacles. JPS is grid-only and requires uniform terrain.
//!
//! Search calls allocate their open/closed bookkeeping per call and drop it on
//! return, so independent [`PathFinder`] instances may search the same map
//! from separate threads as long as nobody mutates the map mid-search.

mod astar;
mod bidirectional;
mod error;
mod finder;
mod graph;
mod grid;
pub mod heuristics;
mod jps;
mod postprocess;

pub use error::{GridError, SearchError};
pub use finder::{PathFinder, PathfindingStats};
pub use graph::Graph;
pub use grid::{Connectivity, GridMap, TerrainType};
pub use postprocess::{funnel_path, rdp_simplify, smooth_path};
pub use roam_core::{Direction, Point};
