use super::fixtures::*;
use palletkit_core::{drop_coordinates, ActionTag, ObstacleOrigin, SpeedClass};
use palletkit_planner::{
    project_constraint, BoxRadiusMode, OptimizedPathGenerator, OptimizerParameters, PlannerError,
};

#[test]
fn test_single_box_minimal_strokes() {
    let config = single_box_job();
    let paths = OptimizedPathGenerator::new(OptimizerParameters::default())
        .generate(&config)
        .unwrap();

    assert_eq!(paths.len(), 3);

    let approach = paths[0].waypoints();
    assert_eq!(approach.len(), 2);
    assert_eq!(approach[0].action, ActionTag::DetectBox);
    assert_eq!(approach[0].position, c(0.0, 0.0, 1000.0, 0.0));
    assert_eq!(approach[0].box_detection, detection_pins());
    assert_eq!(approach[0].speed, SpeedClass::Fast);
    assert_eq!(approach[1].action, ActionTag::Pick);
    assert_eq!(approach[1].position, c(0.0, 0.0, 1000.0, 0.0));
    assert_eq!(approach[1].speed, SpeedClass::Slow);

    let laden = paths[1].waypoints();
    assert_eq!(laden.len(), 1);
    assert_eq!(laden[0].action, ActionTag::Drop);
    assert_eq!(laden[0].position, c(500.0, 500.0, 1000.0, 0.0));
    assert_eq!(laden[0].speed, SpeedClass::Slow);

    let home = paths[2].waypoints();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].action, ActionTag::None);
    assert_eq!(home[0].position, c(0.0, 0.0, 0.0, 0.0));

    assert!(paths.iter().flat_map(|p| p.iter()).all(|w| w.wait_for_completion));
}

#[test]
fn test_stacked_box_avoidance() {
    let config = stacked_job();
    let params = OptimizerParameters::default();
    let plan = OptimizedPathGenerator::new(params.clone())
        .plan(&config)
        .unwrap();

    // Two strokes per box plus the return home
    assert_eq!(plan.paths.len(), 7);
    assert_eq!(
        plan.trace.iter().map(|t| t.transfer_index).collect::<Vec<_>>(),
        vec![2, 0, 1]
    );

    let b_trace = &plan.trace[2];
    assert_eq!(b_trace.detours, 1);
    assert!(!b_trace.fell_back);

    let laden = plan.paths[5].waypoints();
    assert_eq!(laden.len(), 3);
    // Lifted straight up from the pick first
    assert_eq!(laden[0].position, c(-2000.0, 0.0, 750.0, 0.0));
    // Then across at the clearance height, already rotated
    let safe = standard_box().footprint_radius() * 1.1;
    assert!((laden[1].position.x - (1200.0 - safe)).abs() < 1e-6);
    assert_eq!(laden[1].position.z, 750.0);
    assert_eq!(laden[1].position.theta, 90.0);
    assert_eq!(laden[2].action, ActionTag::Drop);
    assert_eq!(laden[2].position, c(1200.0, 0.0, 800.0, 90.0));

    // A's top is at 1000; carrying 200 mm that is 800, minus the margin
    let a_top = config.box_coordinates[0].drop_location.z;
    let box_height = config.box_coordinates[1].dimensions.height;
    assert!(laden
        .iter()
        .any(|w| w.position.z <= a_top - box_height - params.clearance_margin));

    let a_obstacle = config.box_coordinates[0].top_obstacle(0).raised_by(box_height);
    for line in segments(c(-2000.0, 0.0, 1000.0, 0.0).cartesian(), &plan.paths[5]) {
        assert!(project_constraint(&line, &a_obstacle, 0.0, 0.0).is_none());
    }

    assert_plan_clear(&plan, &config, &params);
}

#[test]
fn test_stacked_box_avoidance_with_footprint_radius() {
    let config = stacked_job();
    let params = OptimizerParameters {
        box_radius_mode: BoxRadiusMode::Footprint,
        ..Default::default()
    };
    let plan = OptimizedPathGenerator::new(params.clone())
        .plan(&config)
        .unwrap();

    let laden = plan.paths[5].waypoints();
    assert_eq!(laden.len(), 3);
    assert_eq!(laden[0].position, c(-2000.0, 0.0, 750.0, 0.0));
    // The hop keeps both radii plus the error factor away from C
    let safe = 2.0 * standard_box().footprint_radius() * 1.1;
    assert!((laden[1].position.x - (1200.0 - safe)).abs() < 1e-6);
    assert_eq!(laden[1].position.z, 750.0);

    assert_plan_clear(&plan, &config, &params);
}

#[test]
fn test_endpoints_preserved() {
    let config = stacked_job();
    let plan = OptimizedPathGenerator::new(OptimizerParameters::default())
        .plan(&config)
        .unwrap();

    for (k, trace) in plan.trace.iter().enumerate() {
        let transfer = &config.box_coordinates[trace.transfer_index];
        let approach = &plan.paths[2 * k];
        let laden = &plan.paths[2 * k + 1];

        let pick = approach.last();
        assert_eq!(pick.action, ActionTag::Pick);
        assert_eq!(pick.position, transfer.pick_location);
        let detect = &approach.waypoints()[approach.len() - 2];
        assert_eq!(detect.action, ActionTag::DetectBox);
        assert_eq!(detect.position, transfer.pick_location);

        assert_eq!(laden.last().action, ActionTag::Drop);
        assert_eq!(laden.last().position, transfer.drop_location);
        assert!(laden.iter().all(|w| w.speed == SpeedClass::Slow));
    }

    let drops = drop_coordinates(&plan.paths);
    assert_eq!(drops.len(), 3);
    assert_eq!(drops[2], config.box_coordinates[1].drop_location);
}

#[test]
fn test_obstacles_grow_monotonically_without_own_footprint() {
    let config = stacked_job();
    let plan = OptimizedPathGenerator::new(OptimizerParameters::default())
        .plan(&config)
        .unwrap();

    let mut previous = 0;
    for trace in &plan.trace {
        assert!(trace.obstacles.len() >= previous);
        previous = trace.obstacles.len();
        assert!(!trace
            .obstacles
            .contains(&ObstacleOrigin::PlacedBox(trace.transfer_index)));
        assert!(trace.obstacles.contains(&ObstacleOrigin::Pallet(0)));
    }

    // Layer 0 is planned in one batch: its boxes do not see each other.
    assert_eq!(plan.trace[0].obstacles, vec![ObstacleOrigin::Pallet(0)]);
    assert_eq!(plan.trace[1].obstacles, vec![ObstacleOrigin::Pallet(0)]);
    assert_eq!(plan.trace[2].obstacles.len(), 3);
}

#[test]
fn test_small_batches_register_boxes_early() {
    let config = stacked_job();
    let plan = OptimizedPathGenerator::new(OptimizerParameters {
        batch_size: 1,
        ..Default::default()
    })
    .plan(&config)
    .unwrap();

    assert_eq!(plan.trace[0].obstacles, vec![ObstacleOrigin::Pallet(0)]);
    assert!(plan.trace[1]
        .obstacles
        .contains(&ObstacleOrigin::PlacedBox(2)));
}

#[test]
fn test_stack_gaps_are_skipped() {
    let mut config = stacked_job();
    config.box_coordinates[1].stack_index = 3;
    let plan = OptimizedPathGenerator::new(OptimizerParameters::default())
        .plan(&config)
        .unwrap();
    assert_eq!(plan.trace.len(), 3);
    assert_eq!(plan.trace[2].stack_index, 3);
}

#[test]
fn test_unknown_pallet_is_rejected() {
    let mut config = single_box_job();
    config.box_coordinates[0].pallet_index = 4;
    let err = OptimizedPathGenerator::new(OptimizerParameters::default())
        .generate(&config)
        .unwrap_err();
    assert!(matches!(err, PlannerError::Configuration(_)));
}

#[test]
fn test_home_return_keeps_last_orientation() {
    let config = stacked_job();
    let paths = OptimizedPathGenerator::new(OptimizerParameters::default())
        .generate(&config)
        .unwrap();
    let home = paths[paths.len() - 1].last();
    assert_eq!(home.position, c(0.0, 0.0, 0.0, 0.0));
    assert_eq!(home.speed, SpeedClass::Fast);
}
