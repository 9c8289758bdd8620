use super::fixtures::*;
use palletkit_core::{ActionTag, BoxTransfer, SavedPalletConfiguration, SpeedClass};
use palletkit_planner::{GridParameters, GridPathGenerator};

fn grid_job() -> SavedPalletConfiguration {
    let pick = c(-1500.0, 0.0, 900.0, 0.0);
    let transfers = vec![
        // Second band, nearer the far edge
        BoxTransfer::new(pick, c(0.0, 200.0, 1000.0, 90.0), standard_box(), 0, 0),
        // First band
        BoxTransfer::new(pick, c(0.0, -200.0, 1000.0, 90.0), standard_box(), 0, 0),
        BoxTransfer::new(pick, c(400.0, -200.0, 1000.0, 90.0), standard_box(), 0, 0),
        // Second layer on top of the first box of the first band
        BoxTransfer::new(pick, c(0.0, -200.0, 800.0, 0.0), standard_box(), 0, 1),
    ];
    SavedPalletConfiguration::new("grid", vec![floor_pallet()]).with_transfers(transfers)
}

#[test]
fn test_one_path_per_box_in_grid_order() {
    let config = grid_job();
    let paths = GridPathGenerator::new(GridParameters::default())
        .generate(&config)
        .unwrap();
    assert_eq!(paths.len(), 4);

    let drops: Vec<_> = paths.iter().map(|p| p.waypoints()[p.len() - 2].position).collect();
    assert_eq!(drops[0], config.box_coordinates[1].drop_location);
    assert_eq!(drops[1], config.box_coordinates[2].drop_location);
    assert_eq!(drops[2], config.box_coordinates[0].drop_location);
    assert_eq!(drops[3], config.box_coordinates[3].drop_location);
}

#[test]
fn test_fixed_path_shape() {
    let config = grid_job();
    let paths = GridPathGenerator::new(GridParameters::default())
        .generate(&config)
        .unwrap();

    // First box of a band: no lateral approach.
    let first = paths[0].waypoints();
    assert_eq!(first.len(), 7);
    // min(900 - 200, 1200 - 0 - 300) - 50
    let transit = 650.0;
    assert_eq!(first[0].action, ActionTag::DetectBox);
    assert_eq!(first[0].position, c(-1500.0, 0.0, transit, 0.0));
    assert_eq!(first[1].action, ActionTag::Pick);
    assert_eq!(first[1].position, c(-1500.0, 0.0, 900.0, 0.0));
    assert_eq!(first[2].position, c(-1500.0, 0.0, 700.0, 0.0));
    assert_eq!(first[3].position, c(-1500.0, 0.0, transit, 90.0));
    assert_eq!(first[4].position, c(0.0, -200.0, transit, 90.0));
    assert_eq!(first[4].speed, SpeedClass::Fast);
    assert_eq!(first[5].action, ActionTag::Drop);
    assert_eq!(first[5].speed, SpeedClass::Slow);
    assert_eq!(first[6].position, c(0.0, -200.0, transit, 90.0));

    // Second box of the band: lateral approach away from the deck center.
    let second = paths[1].waypoints();
    assert_eq!(second.len(), 8);
    let approach = &second[5];
    assert_eq!(approach.action, ActionTag::None);
    assert!(!approach.wait_for_completion);
    assert_eq!(approach.position.z, 950.0);
    let center = floor_pallet().center();
    let drop = config.box_coordinates[2].drop_location.cartesian();
    assert!(
        approach.position.cartesian().horizontal_distance_to(&center)
            > drop.horizontal_distance_to(&center)
    );
    assert!((approach.position.cartesian().horizontal_distance_to(&drop) - 40.0).abs() < 1e-9);
}

#[test]
fn test_transit_height_accounts_for_lower_layers() {
    let config = grid_job();
    let paths = GridPathGenerator::new(GridParameters::default())
        .generate(&config)
        .unwrap();

    // min(900 - 200, 1200 - 200 - 300) - 50
    let upper = paths[3].waypoints();
    assert_eq!(upper[0].position.z, 650.0);
    let paths_with_taller_stack = {
        let mut config = config.clone();
        for t in config.box_coordinates.iter_mut().filter(|t| t.stack_index == 0) {
            t.dimensions.height = 400.0;
        }
        GridPathGenerator::new(GridParameters::default())
            .generate(&config)
            .unwrap()
    };
    // min(900 - 200, 1200 - 400 - 300) - 50
    assert_eq!(paths_with_taller_stack[3].waypoints()[0].position.z, 450.0);
}

#[test]
fn test_empty_job() {
    let config = SavedPalletConfiguration::new("empty", vec![floor_pallet()]);
    let paths = GridPathGenerator::new(GridParameters::default())
        .generate(&config)
        .unwrap();
    assert!(paths.is_empty());
}
