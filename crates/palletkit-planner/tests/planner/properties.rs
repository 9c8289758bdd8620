use super::fixtures::p;
use palletkit_core::{CartesianCoordinate, ObstacleCylinder, ObstacleOrigin};
use palletkit_planner::{level_path, DetourContext, Line, PathRouter};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = CartesianCoordinate> {
    // Snap to a coarse grid so duplicates, columns and home-plane visits occur.
    (-20i32..20, -20i32..20, 0i32..15)
        .prop_map(|(x, y, z)| p(x as f64 * 50.0, y as f64 * 50.0, z as f64 * 100.0))
}

fn obstacle() -> impl Strategy<Value = ObstacleCylinder> {
    (-800.0..800.0f64, -800.0..800.0f64, 300.0..1500.0f64, 50.0..400.0f64).prop_map(
        |(x, y, z, radius)| ObstacleCylinder::new(p(x, y, z), radius, ObstacleOrigin::Pallet(0)),
    )
}

fn context(box_radius: f64) -> DetourContext {
    DetourContext {
        box_radius,
        clearance_margin: 50.0,
        error_radius_factor: 1.1,
        negligible_fraction: 0.1,
        may_rise: true,
    }
}

proptest! {
    #[test]
    fn leveling_is_idempotent(points in prop::collection::vec(point(), 0..24)) {
        let once = level_path(&points);
        let twice = level_path(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn leveling_preserves_endpoints(points in prop::collection::vec(point(), 2..24)) {
        let leveled = level_path(&points);
        prop_assert!(leveled.len() >= 2);
        prop_assert_eq!(leveled[0], points[0]);
        prop_assert_eq!(leveled[leveled.len() - 1], points[points.len() - 1]);
    }

    #[test]
    fn routes_keep_endpoints_and_clear_obstacles(
        obstacles in prop::collection::vec(obstacle(), 1..6),
        start in (-1500.0..-1000.0f64, -300.0..300.0f64, 200.0..1400.0f64),
        end in (1000.0..1500.0f64, -300.0..300.0f64, 200.0..1400.0f64),
        payload in 0.0..250.0f64,
        box_radius in 0.0..150.0f64,
    ) {
        let start = p(start.0, start.1, start.2);
        let end = p(end.0, end.1, end.2);
        let router = PathRouter::new(&obstacles, payload, context(box_radius), 64);
        let route = router.route(start, end);

        prop_assert_eq!(route.points[0], start);
        prop_assert_eq!(route.points[route.points.len() - 1], end);
        for pair in route.points.windows(2) {
            let line = Line::new(pair[0], pair[1]);
            prop_assert!(
                router.first_violation(&line).is_none(),
                "segment {:?} still violates an obstacle",
                line
            );
        }
    }
}
