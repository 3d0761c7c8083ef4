//! Path post-processing: shortcut smoothing, funnel string pulling, and
//! Ramer–Douglas–Peucker simplification.
//!
//! All three consume the raw node sequence produced by the
//! [`PathFinder`](crate::PathFinder) methods and leave the original
//! endpoints untouched.

use roam_core::Point;

use crate::grid::GridMap;

/// Shorten a step path by greedy line-of-sight shortcutting.
///
/// From each anchor, connects directly to the farthest later waypoint with a
/// clear [line of sight](GridMap::has_line_of_sight), skipping everything in
/// between, then repeats from there. Start and goal are preserved exactly and
/// the result never routes through an obstacle. Applying the function to its
/// own output returns it unchanged.
pub fn smooth_path(path: &[Point], map: &GridMap) -> Vec<Point> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    let mut i = 0;
    while i < path.len() - 1 {
        let mut furthest = i + 1;
        for j in (i + 2)..path.len() {
            if map.has_line_of_sight(path[i], path[j]) {
                furthest = j;
            }
        }
        out.push(path[furthest]);
        i = furthest;
    }
    out
}

/// Pull a step path taut through its corridor of portals (Simple Stupid
/// Funnel Algorithm).
///
/// Each path cell is a unit square whose centre is `(x + 0.5, y + 0.5)`;
/// consecutive cells share an edge (orthogonal step) or a corner (diagonal
/// step), forming the portal sequence the taut string is pulled through. The
/// result is a sequence of world-space waypoints — bends land on portal
/// corners, not cell centres, which is why this returns `[f64; 2]` rather
/// than [`Point`]. The first and last waypoints are the centres of the start
/// and goal cells.
pub fn funnel_path(path: &[Point]) -> Vec<[f64; 2]> {
    const EPS: f64 = 1e-9;

    if path.len() <= 2 {
        return path.iter().map(|&p| center(p)).collect();
    }
    let start = center(path[0]);
    let goal = center(path[path.len() - 1]);
    let portals: Vec<([f64; 2], [f64; 2])> = path
        .windows(2)
        .map(|w| oriented_portal(w[0], w[1]))
        .collect();

    let mut out = vec![start];
    let mut apex = start;
    let (mut left, mut right) = portals[0];
    let (mut left_idx, mut right_idx) = (0usize, 0usize);

    // Restarting from the apex portal makes the scan quadratic in the worst
    // case; the guard only trips if numeric noise ever stalls progress.
    let n = portals.len() + 1;
    let mut guard = 8 * n * n + 64;

    let mut i = 1;
    while i <= portals.len() {
        guard -= 1;
        if guard == 0 {
            break;
        }
        let (pl, pr) = if i < portals.len() {
            portals[i]
        } else {
            (goal, goal)
        };

        // Tighten the right edge.
        if area2(apex, right, pr) >= -EPS {
            if vequal(apex, right) || area2(apex, left, pr) <= EPS {
                right = pr;
                right_idx = i;
            } else {
                // Right crossed over left: the left corner becomes the apex.
                if !vequal(apex, left) {
                    out.push(left);
                }
                apex = left;
                right = apex;
                right_idx = left_idx;
                i = left_idx + 1;
                continue;
            }
        }

        // Tighten the left edge.
        if area2(apex, left, pl) <= EPS {
            if vequal(apex, left) || area2(apex, right, pl) >= -EPS {
                left = pl;
                left_idx = i;
            } else {
                if !vequal(apex, right) {
                    out.push(right);
                }
                apex = right;
                left = apex;
                left_idx = right_idx;
                i = right_idx + 1;
                continue;
            }
        }

        i += 1;
    }

    if !vequal(*out.last().unwrap_or(&start), goal) {
        out.push(goal);
    }
    out
}

/// Simplify a polyline with Ramer–Douglas–Peucker.
///
/// Removes points whose perpendicular deviation from the line between the
/// surviving neighbours is at most `epsilon`; the first and last point are
/// always retained. Pure geometry — it knows nothing about obstacles, so
/// re-validate line of sight before using the result on an obstacle-bearing
/// map. Runs on an explicit work stack.
pub fn rdp_simplify(path: &[Point], epsilon: f64) -> Vec<Point> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut keep = vec![false; path.len()];
    keep[0] = true;
    keep[path.len() - 1] = true;

    let mut stack = vec![(0usize, path.len() - 1)];
    while let Some((s, e)) = stack.pop() {
        if e <= s + 1 {
            continue;
        }
        let mut best = s;
        let mut best_d = -1.0;
        for i in (s + 1)..e {
            let d = perpendicular_distance(path[i], path[s], path[e]);
            if d > best_d {
                best_d = d;
                best = i;
            }
        }
        if best_d > epsilon {
            keep[best] = true;
            stack.push((s, best));
            stack.push((best, e));
        }
    }

    path.iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

#[inline]
fn center(p: Point) -> [f64; 2] {
    [f64::from(p.x) + 0.5, f64::from(p.y) + 0.5]
}

/// Twice the signed area of triangle `abc`.
#[inline]
fn area2(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

#[inline]
fn vequal(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
}

/// The portal between two adjacent cells, ordered (left, right) relative to
/// the travel direction. Orthogonal steps share an edge; diagonal steps share
/// a corner, yielding a degenerate point portal.
fn oriented_portal(a: Point, b: Point) -> ([f64; 2], [f64; 2]) {
    let d = b - a;
    let ca = center(a);
    let (p, q) = match (d.x, d.y) {
        (1, 0) => corners(a, [1, 0], [1, 1]),
        (-1, 0) => corners(a, [0, 0], [0, 1]),
        (0, 1) => corners(a, [0, 1], [1, 1]),
        (0, -1) => corners(a, [0, 0], [1, 0]),
        (1, 1) => dup(corner(a, 1, 1)),
        (1, -1) => dup(corner(a, 1, 0)),
        (-1, 1) => dup(corner(a, 0, 1)),
        (-1, -1) => dup(corner(a, 0, 0)),
        // Not a unit step; degrade to the midpoint between the two centres.
        _ => {
            let cb = center(b);
            dup([(ca[0] + cb[0]) / 2.0, (ca[1] + cb[1]) / 2.0])
        }
    };
    // Order so that right-to-left is counterclockwise about the source cell.
    let dir = [f64::from(d.x), f64::from(d.y)];
    let cross_p = dir[0] * (p[1] - ca[1]) - dir[1] * (p[0] - ca[0]);
    let cross_q = dir[0] * (q[1] - ca[1]) - dir[1] * (q[0] - ca[0]);
    if cross_p >= cross_q { (p, q) } else { (q, p) }
}

#[inline]
fn corner(p: Point, dx: i32, dy: i32) -> [f64; 2] {
    [f64::from(p.x + dx), f64::from(p.y + dy)]
}

#[inline]
fn corners(p: Point, a: [i32; 2], b: [i32; 2]) -> ([f64; 2], [f64; 2]) {
    (corner(p, a[0], a[1]), corner(p, b[0], b[1]))
}

#[inline]
fn dup(v: [f64; 2]) -> ([f64; 2], [f64; 2]) {
    (v, v)
}

/// Distance from `p` to the infinite line through `a` and `b` (point
/// distance when the segment is degenerate).
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let (dx, dy) = (bx - ax, by - ay);
    let len = dx.hypot(dy);
    if len < 1e-12 {
        return (px - ax).hypot(py - ay);
    }
    ((px - ax) * dy - (py - ay) * dx).abs() / len
}
