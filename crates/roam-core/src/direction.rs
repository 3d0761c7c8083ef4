//! The eight compass directions of grid movement.

use crate::Point;

/// One of the eight compass directions, with Y growing down: [`Direction::N`]
/// is `(0, -1)`.
///
/// Used by grid maps to classify the step that reached a cell and to detect
/// forced neighbours during jump point search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// All eight directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// The four cardinal directions, clockwise from north.
    pub const CARDINAL: [Direction; 4] =
        [Direction::N, Direction::E, Direction::S, Direction::W];

    /// Unit step for this direction.
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Direction::N => Point::new(0, -1),
            Direction::NE => Point::new(1, -1),
            Direction::E => Point::new(1, 0),
            Direction::SE => Point::new(1, 1),
            Direction::S => Point::new(0, 1),
            Direction::SW => Point::new(-1, 1),
            Direction::W => Point::new(-1, 0),
            Direction::NW => Point::new(-1, -1),
        }
    }

    /// Classify the movement from `from` to `to` by the signum of its delta.
    ///
    /// Returns `None` when the two points are equal. The step need not be a
    /// unit step; `(0,0) -> (5, -3)` classifies as [`Direction::NE`].
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        let d = (to - from).signum();
        match (d.x, d.y) {
            (0, -1) => Some(Direction::N),
            (1, -1) => Some(Direction::NE),
            (1, 0) => Some(Direction::E),
            (1, 1) => Some(Direction::SE),
            (0, 1) => Some(Direction::S),
            (-1, 1) => Some(Direction::SW),
            (-1, 0) => Some(Direction::W),
            (-1, -1) => Some(Direction::NW),
            _ => None,
        }
    }

    /// Whether this direction moves along both axes.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        let d = self.delta();
        d.x != 0 && d.y != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_round_trips_through_between() {
        for dir in Direction::ALL {
            let got = Direction::between(Point::ZERO, dir.delta());
            assert_eq!(got, Some(dir));
        }
    }

    #[test]
    fn between_uses_signum() {
        let from = Point::new(2, 2);
        assert_eq!(Direction::between(from, Point::new(9, 2)), Some(Direction::E));
        assert_eq!(
            Direction::between(from, Point::new(0, 7)),
            Some(Direction::SW)
        );
        assert_eq!(Direction::between(from, from), None);
    }

    #[test]
    fn diagonals() {
        assert!(Direction::NE.is_diagonal());
        assert!(!Direction::S.is_diagonal());
        assert_eq!(
            Direction::ALL.iter().filter(|d| d.is_diagonal()).count(),
            4
        );
    }
}
