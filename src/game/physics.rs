//! Circle geometry, world bounds and push-apart resolution

use super::constants::{WORLD_HEIGHT, WORLD_WIDTH};

/// Physics helpers for circular bodies in the world rectangle
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Two circles collide iff the distance between centers is strictly less
    /// than the sum of their radii
    pub fn check_collision(
        x1: f64,
        y1: f64,
        radius1: f64,
        x2: f64,
        y2: f64,
        radius2: f64,
    ) -> bool {
        let dx = x1 - x2;
        let dy = y1 - y2;
        let combined_radius = radius1 + radius2;
        dx * dx + dy * dy < combined_radius * combined_radius
    }

    /// Push two overlapping circles apart along the axis joining their centers,
    /// each by half the overlap.
    ///
    /// Returns `None` when the circles do not overlap or their centers coincide;
    /// coincident centers have no separating axis and are left in place.
    pub fn resolve_collision(
        x1: f64,
        y1: f64,
        radius1: f64,
        x2: f64,
        y2: f64,
        radius2: f64,
    ) -> Option<((f64, f64), (f64, f64))> {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist == 0.0 {
            return None;
        }

        let push = (radius1 + radius2 - dist) / 2.0;
        if push <= 0.0 {
            return None;
        }

        let push_x = dx / dist * push;
        let push_y = dy / dist * push;

        Some(((x1 - push_x, y1 - push_y), (x2 + push_x, y2 + push_y)))
    }

    /// Clamp a body's center so the whole circle stays inside the world
    pub fn clamp_to_world(x: f64, y: f64, radius: f64) -> (f64, f64) {
        (
            x.clamp(radius, WORLD_WIDTH - radius),
            y.clamp(radius, WORLD_HEIGHT - radius),
        )
    }

    /// Whether a point lies inside the world rectangle (edges included)
    pub fn in_world(x: f64, y: f64) -> bool {
        (0.0..=WORLD_WIDTH).contains(&x) && (0.0..=WORLD_HEIGHT).contains(&y)
    }

    pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
        let dx = x2 - x1;
        let dy = y2 - y1;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_is_symmetric() {
        let cases = [
            (0.0, 0.0, 15.0, 20.0, 0.0, 15.0),
            (100.0, 100.0, 3.0, 117.0, 100.0, 15.0),
            (5.0, 5.0, 1.0, 500.0, 500.0, 1.0),
        ];
        for (x1, y1, r1, x2, y2, r2) in cases {
            assert_eq!(
                PhysicsSystem::check_collision(x1, y1, r1, x2, y2, r2),
                PhysicsSystem::check_collision(x2, y2, r2, x1, y1, r1)
            );
        }
    }

    #[test]
    fn touching_circles_do_not_collide() {
        assert!(!PhysicsSystem::check_collision(0.0, 0.0, 15.0, 30.0, 0.0, 15.0));
        assert!(PhysicsSystem::check_collision(0.0, 0.0, 15.0, 29.9, 0.0, 15.0));
    }

    #[test]
    fn resolve_pushes_each_by_half_overlap() {
        let ((x1, y1), (x2, y2)) =
            PhysicsSystem::resolve_collision(100.0, 100.0, 15.0, 110.0, 100.0, 15.0).unwrap();
        assert_eq!((x1, y1), (90.0, 100.0));
        assert_eq!((x2, y2), (120.0, 100.0));
    }

    #[test]
    fn coincident_centers_are_left_alone() {
        assert!(PhysicsSystem::resolve_collision(50.0, 50.0, 15.0, 50.0, 50.0, 15.0).is_none());
    }

    #[test]
    fn clamp_keeps_radius_margin() {
        assert_eq!(PhysicsSystem::clamp_to_world(-10.0, 5000.0, 15.0), (15.0, 1185.0));
        assert_eq!(PhysicsSystem::clamp_to_world(800.0, 600.0, 15.0), (800.0, 600.0));
    }

    #[test]
    fn world_bounds_include_edges() {
        assert!(PhysicsSystem::in_world(0.0, 1200.0));
        assert!(PhysicsSystem::in_world(1600.0, 0.0));
        assert!(!PhysicsSystem::in_world(1601.0, 10.0));
        assert!(!PhysicsSystem::in_world(10.0, -0.5));
    }
}
