use palletkit_core::{
    BoxDimensions, BoxPath, BoxTransfer, CartesianCoordinate, Coordinate, IoPin,
    ObstacleCylinder, ObstacleOrigin, PalletGeometry, SavedPalletConfiguration,
};
use palletkit_planner::{
    project_constraint, BoxRadiusMode, Line, OptimizedPlan, OptimizerParameters,
};

pub fn p(x: f64, y: f64, z: f64) -> CartesianCoordinate {
    CartesianCoordinate::new(x, y, z)
}

pub fn c(x: f64, y: f64, z: f64, theta: f64) -> Coordinate {
    Coordinate::new(x, y, z, theta)
}

pub fn standard_box() -> BoxDimensions {
    BoxDimensions::new(300.0, 300.0, 200.0)
}

/// Deck at z = 1200 spanning x in -400..1600 and y in -400..400
pub fn floor_pallet() -> PalletGeometry {
    PalletGeometry::new(
        c(-400.0, 400.0, 1200.0, 0.0),
        c(-400.0, -400.0, 1200.0, 0.0),
        c(1600.0, -400.0, 1200.0, 0.0),
    )
}

pub fn far_pallet() -> PalletGeometry {
    PalletGeometry::new(
        c(5000.0, 5800.0, 1200.0, 0.0),
        c(5000.0, 5000.0, 1200.0, 0.0),
        c(6200.0, 5000.0, 1200.0, 0.0),
    )
}

pub fn detection_pins() -> Vec<IoPin> {
    vec![IoPin {
        machine_motion_index: 0,
        network_id: 1,
        pin: 2,
        pin_val: true,
    }]
}

pub fn single_box_job() -> SavedPalletConfiguration {
    let transfer = BoxTransfer::new(
        c(0.0, 0.0, 1000.0, 0.0),
        c(500.0, 500.0, 1000.0, 0.0),
        standard_box(),
        0,
        0,
    )
    .with_box_detection(detection_pins());
    SavedPalletConfiguration::new("single", vec![far_pallet()]).with_transfers(vec![transfer])
}

pub const STACK_PICK: (f64, f64, f64) = (-2000.0, 0.0, 1000.0);

/// Box A at the origin and box C at x = 1200 on the deck, then box B on top
/// of C. B's straight pick to drop move runs through A and C.
pub fn stacked_job() -> SavedPalletConfiguration {
    let pick = c(STACK_PICK.0, STACK_PICK.1, STACK_PICK.2, 0.0);
    let a = BoxTransfer::new(pick, c(0.0, 0.0, 1000.0, 0.0), standard_box(), 0, 0)
        .with_box_index(0);
    let b = BoxTransfer::new(pick, c(1200.0, 0.0, 800.0, 90.0), standard_box(), 0, 1)
        .with_box_index(1);
    let c_box = BoxTransfer::new(pick, c(1200.0, 0.0, 1000.0, 0.0), standard_box(), 0, 0)
        .with_box_index(2);
    SavedPalletConfiguration::new("stacked", vec![floor_pallet()])
        .with_transfers(vec![a, b, c_box])
}

pub fn obstacle_for(config: &SavedPalletConfiguration, origin: ObstacleOrigin) -> ObstacleCylinder {
    match origin {
        ObstacleOrigin::Pallet(i) => config.pallets()[i].obstacle(i),
        ObstacleOrigin::PlacedBox(i) => config.box_coordinates[i].top_obstacle(i),
    }
}

/// Every segment of `path`, starting at `start`
pub fn segments(start: CartesianCoordinate, path: &BoxPath) -> Vec<Line> {
    let mut previous = start;
    path.iter()
        .map(|w| {
            let line = Line::new(previous, w.cartesian());
            previous = w.cartesian();
            line
        })
        .collect()
}

/// Check that the approach and laden stroke of every planned box re-project
/// to no constraint against every obstacle active while it was planned.
pub fn assert_plan_clear(
    plan: &OptimizedPlan,
    config: &SavedPalletConfiguration,
    params: &OptimizerParameters,
) {
    let mut cursor = params.home.cartesian();
    for (k, trace) in plan.trace.iter().enumerate() {
        let transfer = &config.box_coordinates[trace.transfer_index];
        let approach = &plan.paths[2 * k];
        let laden = &plan.paths[2 * k + 1];

        let height = transfer.dimensions.height;
        let radius = match params.box_radius_mode {
            BoxRadiusMode::Zero => 0.0,
            BoxRadiusMode::Footprint => transfer.dimensions.footprint_radius(),
        };

        for &origin in &trace.obstacles {
            let obstacle = obstacle_for(config, origin);
            for line in segments(cursor, approach) {
                assert!(
                    project_constraint(&line, &obstacle, 0.0, params.negligible_fraction).is_none(),
                    "approach of transfer {} hits {origin}: {:?}",
                    trace.transfer_index,
                    line
                );
            }
            let raised = obstacle.raised_by(height);
            for line in segments(transfer.pick_location.cartesian(), laden) {
                assert!(
                    project_constraint(&line, &raised, radius, params.negligible_fraction)
                        .is_none(),
                    "laden stroke of transfer {} hits {origin}: {:?}",
                    trace.transfer_index,
                    line
                );
            }
        }
        cursor = transfer.drop_location.cartesian();
    }
}
