//! Ping-pong traversal of enemy patrol paths.

use sneaky_doctor_core::{Facing, PathCursor, PatrolPath, RealPosition};

/// Advances `cursor` by its step, reflecting off both ends of `path`.
///
/// Running past the last index by `n` entries lands `n` entries before it and
/// reverses the direction; running below zero reflects off the first entry
/// the same way. Steps longer than the path keep reflecting until the index
/// is back in range.
#[must_use]
pub fn advance_cursor(cursor: PathCursor, path: &PatrolPath) -> PathCursor {
    let last = path.last_index() as i64;
    let mut step = cursor.step();
    let mut index = cursor.index() as i64 + i64::from(step);

    loop {
        if index > last {
            index = 2 * last - index;
            step = -step.abs();
        } else if index < 0 {
            index = -index;
            step = step.abs();
        } else {
            break;
        }
    }

    PathCursor::new(index as usize, step)
}

/// Facing derived from the dominant axis of a displacement.
///
/// Horizontal wins ties, so a zero displacement faces left.
#[must_use]
pub fn facing_between(from: RealPosition, to: RealPosition) -> Facing {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    if dx.abs() >= dy.abs() {
        if dx > 0 {
            Facing::Right
        } else {
            Facing::Left
        }
    } else if dy > 0 {
        Facing::Front
    } else {
        Facing::Back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(len: i32) -> PatrolPath {
        PatrolPath::new((0..len).map(|x| RealPosition::new(x, 0)).collect())
            .expect("path")
    }

    #[test]
    fn forward_overshoot_mirrors_off_the_last_index() {
        let path = straight_path(10);
        let next = advance_cursor(PathCursor::new(8, 3), &path);
        assert_eq!(next, PathCursor::new(7, -3));
    }

    #[test]
    fn backward_overshoot_mirrors_off_zero() {
        let path = straight_path(10);
        let next = advance_cursor(PathCursor::new(1, -3), &path);
        assert_eq!(next, PathCursor::new(2, 3));
    }

    #[test]
    fn landing_on_an_end_keeps_direction() {
        let path = straight_path(10);
        assert_eq!(
            advance_cursor(PathCursor::new(6, 3), &path),
            PathCursor::new(9, 3)
        );
        assert_eq!(
            advance_cursor(PathCursor::new(9, 3), &path),
            PathCursor::new(6, -3)
        );
    }

    #[test]
    fn steps_longer_than_the_path_stay_in_range() {
        let path = straight_path(3);
        let next = advance_cursor(PathCursor::new(0, 7), &path);
        assert_eq!(next, PathCursor::new(1, -7));
    }

    #[test]
    fn facing_prefers_horizontal_on_ties() {
        let origin = RealPosition::new(10, 10);
        assert_eq!(facing_between(origin, RealPosition::new(13, 13)), Facing::Right);
        assert_eq!(facing_between(origin, RealPosition::new(7, 13)), Facing::Left);
        assert_eq!(facing_between(origin, RealPosition::new(11, 14)), Facing::Front);
        assert_eq!(facing_between(origin, RealPosition::new(11, 6)), Facing::Back);
        assert_eq!(facing_between(origin, origin), Facing::Left);
    }
}
