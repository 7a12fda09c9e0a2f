//! Free player movement with wall collision resolution.

use sneaky_doctor_core::{GameConfig, MoveIntent, RealRect, Velocity};
use tracing::warn;

/// How a tick's wall collision was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionOutcome {
    /// The player touches no wall.
    Clear,
    /// The player was pushed out sideways, flush against the given wall.
    PushedHorizontally {
        /// Index of the wall the player now touches.
        wall: usize,
    },
    /// The player was pushed out vertically, flush against the given wall.
    PushedVertically {
        /// Index of the wall the player now touches.
        wall: usize,
    },
    /// The player ran diagonally into an inside corner and was snapped onto
    /// the corner point of the given wall.
    SnappedToCorner {
        /// Index of the wall anchoring the corner.
        wall: usize,
    },
    /// The overlap did not match a known layout and was left as is.
    Unresolved {
        /// Number of overlapping walls.
        colliding: usize,
    },
}

/// Result of moving the player for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStep {
    /// Rectangle after movement, bounds clamping and collision resolution.
    pub rect: RealRect,
    /// Displacement requested by the input.
    pub velocity: Velocity,
    /// How walls were handled.
    pub collision: CollisionOutcome,
}

/// Moves the player's rectangle according to the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerController {
    speed: i32,
    diagonal_divisor: f32,
    bounds: RealRect,
}

impl PlayerController {
    /// Creates a controller using the configured speed and level bounds.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            speed: config.player_speed,
            diagonal_divisor: config.diagonal_divisor,
            bounds: config.real_bounds(),
        }
    }

    /// Displacement for one tick of `intent`.
    ///
    /// Diagonal movement divides both components and truncates towards zero,
    /// so the default speed of 5 becomes 3 on each axis.
    #[must_use]
    pub fn velocity(&self, intent: MoveIntent) -> Velocity {
        let dx = intent.horizontal * self.speed;
        let dy = intent.vertical * self.speed;
        if !intent.is_diagonal() {
            return Velocity::new(dx, dy);
        }
        let scale = |component: i32| (component as f32 / self.diagonal_divisor) as i32;
        Velocity::new(scale(dx), scale(dy))
    }

    /// Moves `rect` for one tick, keeps it inside the level and resolves
    /// overlaps with `walls`.
    #[must_use]
    pub fn step(&self, rect: RealRect, intent: MoveIntent, walls: &[RealRect]) -> PlayerStep {
        let velocity = self.velocity(intent);
        let mut moved = rect.translated(velocity.dx, velocity.dy);
        moved.clamp_within(&self.bounds);
        let collision = resolve_wall_collisions(&mut moved, velocity, walls, self.speed);
        PlayerStep {
            rect: moved,
            velocity,
            collision,
        }
    }
}

/// Pushes `rect` out of the walls it overlaps after moving by `velocity`.
///
/// One or two overlapping walls are treated as a straight wall segment: the
/// player is first pushed out horizontally against the first wall, which is
/// kept only if it clears every wall and needs at most `speed` units of
/// correction; otherwise the player is pushed out vertically. Three
/// overlapping walls form an inside corner and the player's leading corner is
/// snapped onto the anchoring wall. Anything else is left unresolved.
pub fn resolve_wall_collisions(
    rect: &mut RealRect,
    velocity: Velocity,
    walls: &[RealRect],
    speed: i32,
) -> CollisionOutcome {
    let colliding = rect.colliding_indices(walls);
    match *colliding.as_slice() {
        [] => CollisionOutcome::Clear,
        [first] | [first, _] => push_out(rect, velocity, walls, first, speed),
        [low, middle, high] => snap_to_corner(rect, velocity, walls, [low, middle, high]),
        _ => {
            warn!(
                colliding = colliding.len(),
                dx = velocity.dx,
                dy = velocity.dy,
                "player_collision_unresolved"
            );
            CollisionOutcome::Unresolved {
                colliding: colliding.len(),
            }
        }
    }
}

fn push_out(
    rect: &mut RealRect,
    velocity: Velocity,
    walls: &[RealRect],
    index: usize,
    speed: i32,
) -> CollisionOutcome {
    let wall = walls[index];

    let mut sideways = *rect;
    if velocity.dx > 0 {
        sideways.set_right(wall.left());
    } else {
        sideways.set_left(wall.right());
    }
    let correction = rect.left() - sideways.left();
    if !sideways.collides_any(walls) && (-speed..=speed).contains(&correction) {
        *rect = sideways;
        return CollisionOutcome::PushedHorizontally { wall: index };
    }

    if velocity.dy > 0 {
        rect.set_bottom(wall.top());
    } else {
        rect.set_top(wall.bottom());
    }
    CollisionOutcome::PushedVertically { wall: index }
}

fn snap_to_corner(
    rect: &mut RealRect,
    velocity: Velocity,
    walls: &[RealRect],
    [low, middle, high]: [usize; 3],
) -> CollisionOutcome {
    let (index, right, down) = match (velocity.dx.signum(), velocity.dy.signum()) {
        (1, 1) => (high, true, true),
        (1, -1) => (middle, true, false),
        (-1, 1) => (middle, false, true),
        (-1, -1) => (low, false, false),
        _ => {
            warn!(
                colliding = 3,
                dx = velocity.dx,
                dy = velocity.dy,
                "player_corner_without_diagonal_motion"
            );
            return CollisionOutcome::Unresolved { colliding: 3 };
        }
    };

    let anchor = walls[index];
    if right {
        rect.set_right(anchor.left());
    } else {
        rect.set_left(anchor.right());
    }
    if down {
        rect.set_bottom(anchor.top());
    } else {
        rect.set_top(anchor.bottom());
    }
    CollisionOutcome::SnappedToCorner { wall: index }
}

#[cfg(test)]
mod tests {
    use sneaky_doctor_core::RealPosition;

    use super::*;

    fn block(column: i32, row: i32) -> RealRect {
        RealRect::square(RealPosition::new(column * 30, row * 30), 30)
    }

    fn controller() -> PlayerController {
        PlayerController::new(&GameConfig::default())
    }

    #[test]
    fn diagonal_velocity_truncates_towards_zero() {
        let controller = controller();
        let up_left = MoveIntent {
            horizontal: -1,
            vertical: -1,
        };
        let right = MoveIntent {
            horizontal: 1,
            vertical: 0,
        };
        assert_eq!(controller.velocity(up_left), Velocity::new(-3, -3));
        assert_eq!(controller.velocity(right), Velocity::new(5, 0));
        assert_eq!(controller.velocity(MoveIntent::default()), Velocity::new(0, 0));
    }

    #[test]
    fn movement_is_clamped_to_level_bounds() {
        let controller = controller();
        let rect = RealRect::square(RealPosition::new(2, 927), 30);
        let step = controller.step(
            rect,
            MoveIntent {
                horizontal: -1,
                vertical: 1,
            },
            &[],
        );
        assert_eq!(step.rect.origin(), RealPosition::new(0, 900));
        assert_eq!(step.collision, CollisionOutcome::Clear);
    }

    #[test]
    fn more_than_three_walls_are_left_unresolved() {
        let walls = [block(0, 0), block(1, 0), block(0, 1), block(1, 1)];
        let mut rect = RealRect::square(RealPosition::new(15, 15), 30);
        let outcome = resolve_wall_collisions(&mut rect, Velocity::new(3, 3), &walls, 5);
        assert_eq!(outcome, CollisionOutcome::Unresolved { colliding: 4 });
        assert_eq!(rect.origin(), RealPosition::new(15, 15));
    }
}
