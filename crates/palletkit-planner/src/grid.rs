//! Standard strategy: fixed-shape paths over a grid placement order.
//!
//! No obstacle math is involved. Boxes are placed layer by layer and pallet
//! by pallet in a raster order along the pallet diagonal, and every box
//! travels at a transit height chosen to clear the pick area and the stack
//! built so far.

use crate::error::{ParameterError, ParameterResult, PlannerResult};
use crate::PathStrategy;
use nalgebra::Vector2;
use palletkit_core::{
    ActionTag, BoxPath, BoxTransfer, CartesianCoordinate, Coordinate, PalletGeometry,
    SavedPalletConfiguration, SpeedClass, Waypoint,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Parameters for the standard strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParameters {
    /// Height kept between the transit plane and anything below it (mm)
    pub safety_margin: f64,
    /// Horizontal offset of the lateral approach point (mm)
    pub lateral_offset: f64,
    /// Height of the lateral approach point above the drop (mm)
    pub approach_raise: f64,
}

impl Default for GridParameters {
    fn default() -> Self {
        Self {
            safety_margin: 50.0,
            lateral_offset: 40.0,
            approach_raise: 50.0,
        }
    }
}

impl GridParameters {
    pub fn validate(&self) -> ParameterResult<()> {
        ParameterError::check_range("safety_margin", self.safety_margin, 0.0, 10_000.0)?;
        ParameterError::check_range("lateral_offset", self.lateral_offset, 0.0, 10_000.0)?;
        ParameterError::check_range("approach_raise", self.approach_raise, 0.0, 10_000.0)?;
        Ok(())
    }
}

fn horizontal(p: &CartesianCoordinate) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

/// A box together with its place in the grid order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSlot {
    pub transfer_index: usize,
    /// First box of its band; approached without the lateral offset
    pub band_start: bool,
}

/// Order the boxes of one layer of one pallet.
///
/// Boxes are banded by their distance from the `corner2 -> corner3` edge; a
/// band ends once a box lies more than half a box width beyond the band's
/// first box. Bands are walked from the edge outward and each band is walked
/// along the pallet diagonal.
pub fn band_order(
    pallet: &PalletGeometry,
    transfers: &[BoxTransfer],
    group: &[usize],
) -> Vec<GridSlot> {
    let origin = horizontal(&pallet.corner2.cartesian());
    let edge = horizontal(&pallet.x_edge());
    let diagonal = horizontal(&pallet.diagonal());
    let edge_unit = (edge.norm() > f64::EPSILON).then(|| edge.normalize());
    let diagonal_unit = (diagonal.norm() > f64::EPSILON).then(|| diagonal.normalize());

    let offset = |i: usize| horizontal(&transfers[i].drop_location.cartesian()) - origin;
    let edge_distance = |i: usize| match edge_unit {
        Some(u) => u.perp(&offset(i)).abs(),
        None => offset(i).norm(),
    };
    let along_diagonal = |i: usize| match diagonal_unit {
        Some(u) => u.dot(&offset(i)),
        None => 0.0,
    };

    let mut by_distance = group.to_vec();
    by_distance.sort_by(|&a, &b| edge_distance(a).total_cmp(&edge_distance(b)));

    let mut bands: Vec<Vec<usize>> = Vec::new();
    let mut band_start_distance = f64::NEG_INFINITY;
    for i in by_distance {
        let distance = edge_distance(i);
        let half_width = transfers[i].dimensions.width / 2.0;
        match bands.last_mut() {
            Some(band) if distance - band_start_distance <= half_width => band.push(i),
            _ => {
                band_start_distance = distance;
                bands.push(vec![i]);
            }
        }
    }

    bands
        .into_iter()
        .flat_map(|mut band| {
            band.sort_by(|&a, &b| along_diagonal(a).total_cmp(&along_diagonal(b)));
            band.into_iter().enumerate().map(|(n, transfer_index)| GridSlot {
                transfer_index,
                band_start: n == 0,
            })
        })
        .collect()
}

/// Generator for grid-ordered palletizing paths
pub struct GridPathGenerator {
    params: GridParameters,
}

impl GridPathGenerator {
    pub fn new(params: GridParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GridParameters {
        &self.params
    }

    /// Height at which a box of `height` travels over its pallet
    pub fn transit_height(&self, highest_pick: f64, deck: f64, stacked: f64, height: f64) -> f64 {
        let clear = (highest_pick - height).min(deck - stacked - 1.5 * height);
        (clear - self.params.safety_margin).max(0.0)
    }

    /// Generate one path per box
    pub fn generate(&self, config: &SavedPalletConfiguration) -> PlannerResult<Vec<BoxPath>> {
        self.params.validate()?;
        config.validate()?;

        let transfers = &config.box_coordinates;
        if transfers.is_empty() {
            info!("Job '{}' has no boxes, nothing to plan", config.config.name);
            return Ok(Vec::new());
        }

        let highest_pick = transfers
            .iter()
            .map(|t| t.pick_location.z)
            .fold(f64::INFINITY, f64::min);

        let mut groups: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        let mut tallest: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (i, t) in transfers.iter().enumerate() {
            groups.entry((t.stack_index, t.pallet_index)).or_default().push(i);
            let layer = tallest.entry((t.pallet_index, t.stack_index)).or_insert(0.0);
            *layer = layer.max(t.dimensions.height);
        }

        let mut paths = Vec::with_capacity(transfers.len());
        for (&(stack_index, pallet_index), group) in &groups {
            let pallet = &config.pallets()[pallet_index];
            let stacked: f64 = tallest
                .range((pallet_index, 0)..(pallet_index, stack_index))
                .map(|(_, h)| h)
                .sum();
            debug!(
                "Pallet {} stack {}: {} box(es) over {:.1} mm of stacked boxes",
                pallet_index,
                stack_index,
                group.len(),
                stacked
            );

            for slot in band_order(pallet, transfers, group) {
                let transfer = &transfers[slot.transfer_index];
                let transit = self.transit_height(
                    highest_pick,
                    pallet.deck_height(),
                    stacked,
                    transfer.dimensions.height,
                );
                paths.push(self.box_path(pallet, transfer, transit, slot.band_start)?);
            }
        }

        info!(
            "Planned job '{}' with the standard strategy: {} boxes, {} strokes",
            config.config.name,
            transfers.len(),
            paths.len()
        );
        Ok(paths)
    }

    fn box_path(
        &self,
        pallet: &PalletGeometry,
        transfer: &BoxTransfer,
        transit: f64,
        band_start: bool,
    ) -> PlannerResult<BoxPath> {
        let pick = transfer.pick_location;
        let drop = transfer.drop_location;
        let height = transfer.dimensions.height;
        let at = |p: &Coordinate, z: f64, theta: f64| Coordinate::new(p.x, p.y, z, theta);

        let mut waypoints = vec![
            Waypoint::new(at(&pick, transit, pick.theta), SpeedClass::Fast)
                .with_action(ActionTag::DetectBox)
                .with_box_detection(transfer.box_detection.clone()),
            Waypoint::new(pick, SpeedClass::Slow).with_action(ActionTag::Pick),
            Waypoint::new(
                at(&pick, transit.max(pick.z - height), pick.theta),
                SpeedClass::Slow,
            ),
            Waypoint::new(at(&pick, transit, drop.theta), SpeedClass::Slow),
            Waypoint::new(at(&drop, transit, drop.theta), SpeedClass::Fast),
        ];

        if !band_start {
            let approach = self.lateral_approach(pallet, &drop);
            waypoints.push(Waypoint::new(approach, SpeedClass::Fast).with_wait(false));
        }

        waypoints.push(Waypoint::new(drop, SpeedClass::Slow).with_action(ActionTag::Drop));
        waypoints.push(Waypoint::new(at(&drop, transit, drop.theta), SpeedClass::Fast));
        Ok(BoxPath::new(waypoints)?)
    }

    /// Point beside and above the drop, away from the pallet center
    fn lateral_approach(&self, pallet: &PalletGeometry, drop: &Coordinate) -> Coordinate {
        let outward = horizontal(&drop.cartesian()) - horizontal(&pallet.center());
        let band = horizontal(&pallet.x_edge());
        let direction = [outward, band]
            .into_iter()
            .find(|v| v.norm() > f64::EPSILON)
            .map(|v| v.normalize())
            .unwrap_or_else(Vector2::zeros);
        let shifted = horizontal(&drop.cartesian()) + direction * self.params.lateral_offset;
        Coordinate::new(
            shifted.x,
            shifted.y,
            drop.z - self.params.approach_raise,
            drop.theta,
        )
    }
}

impl PathStrategy for GridPathGenerator {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn generate(&self, config: &SavedPalletConfiguration) -> PlannerResult<Vec<BoxPath>> {
        GridPathGenerator::generate(self, config)
    }
}
