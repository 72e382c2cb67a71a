//! Finding the vehicles ahead of a vehicle, across lane and edge boundaries.

use crate::network::{LaneKind, Network};
use crate::{LaneId, VehicleId, VehicleSet};
use arrayvec::ArrayVec;
use smallvec::SmallVec;

/// How far a vehicle's effective lane number may be from a lane's number
/// for the vehicle to count as being in that lane.
const LANE_TOLERANCE: f64 = 0.95;

/// A vehicle ahead and the distance to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearbyVehicle {
    pub vehicle: VehicleId,
    /// The distance ahead in m, measured along the lanes.
    pub distance: f64,
}

/// The nearest vehicle ahead in one lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneSurvey {
    pub lane_number: usize,
    pub nearest: Option<NearbyVehicle>,
}

/// Looks for the nearest vehicle ahead in every lane the vehicle could
/// drive in: each lane of its edge, or just its own lane inside a junction.
pub(crate) fn survey_nearby_vehicles(
    network: &Network,
    vehicles: &VehicleSet,
    vehicle_id: VehicleId,
) -> SmallVec<[LaneSurvey; 4]> {
    let vehicle = &vehicles[vehicle_id];
    let location = vehicle.location();
    let look_ahead = vehicle.driver().params().look_ahead;
    let lane = network.lane(location.lane());

    let lanes: SmallVec<[LaneId; 4]> = match lane.edge() {
        Some(edge) => network.edge(edge).lanes().iter().copied().collect(),
        None => SmallVec::from_elem(lane.id(), 1),
    };

    lanes
        .into_iter()
        .map(|lane_id| LaneSurvey {
            lane_number: network.lane(lane_id).lane_number(),
            nearest: find_next_vehicle_in_lane(
                network,
                vehicles,
                vehicle_id,
                lane_id,
                location.u(),
                0.0,
                look_ahead,
            ),
        })
        .collect()
}

/// Finds the nearest vehicle ahead in the lanes either side of the
/// vehicle's effective lane number.
pub(crate) fn find_nearest_vehicle(
    network: &Network,
    vehicles: &VehicleSet,
    vehicle_id: VehicleId,
) -> Option<NearbyVehicle> {
    let vehicle = &vehicles[vehicle_id];
    let location = vehicle.location();
    let look_ahead = vehicle.driver().params().look_ahead;
    let lane = network.lane(location.lane());

    let effective = vehicle.effective_lane_number();
    let mut numbers = ArrayVec::<usize, 2>::new();
    numbers.push(effective.floor().max(0.0) as usize);
    let ceil = effective.ceil().max(0.0) as usize;
    if !numbers.contains(&ceil) {
        numbers.push(ceil);
    }

    numbers
        .into_iter()
        .filter_map(|n| match lane.edge() {
            Some(edge) => network.edge_lane(edge, n),
            None => Some(lane.id()),
        })
        .filter_map(|lane_id| {
            find_next_vehicle_in_lane(network, vehicles, vehicle_id, lane_id, location.u(), 0.0, look_ahead)
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Finds the nearest vehicle ahead of position `pos` on `lane`, following
/// default successors until `look_ahead` is exhausted.
///
/// # Parameters
/// * `searcher` - The vehicle doing the search, which is never returned.
/// * `dist_before` - The distance already covered before the start of `lane`.
pub(crate) fn find_next_vehicle_in_lane(
    network: &Network,
    vehicles: &VehicleSet,
    searcher: VehicleId,
    lane: LaneId,
    pos: f64,
    dist_before: f64,
    look_ahead: f64,
) -> Option<NearbyVehicle> {
    search_lane(network, vehicles, searcher, lane, pos, dist_before, look_ahead, 0)
}

#[allow(clippy::too_many_arguments)]
fn search_lane(
    network: &Network,
    vehicles: &VehicleSet,
    searcher: VehicleId,
    lane_id: LaneId,
    pos: f64,
    dist_before: f64,
    look_ahead: f64,
    hops: usize,
) -> Option<NearbyVehicle> {
    let lane = network.lane(lane_id);
    let lane_number = lane.lane_number() as f64;

    let nearest = candidate_lanes(network, lane_id)
        .iter()
        .flat_map(|id| network.lane(*id).vehicles())
        .filter(|id| **id != searcher)
        .filter_map(|id| vehicles.get(*id))
        .filter(|v| (v.effective_lane_number() - lane_number).abs() < LANE_TOLERANCE)
        .map(|v| NearbyVehicle {
            vehicle: v.id(),
            distance: v.location().u() - pos + dist_before,
        })
        .filter(|v| v.distance > 0.0 && v.distance <= look_ahead)
        .min_by(|a, b| a.distance.total_cmp(&b.distance));
    if nearest.is_some() {
        return nearest;
    }

    let dist_before = dist_before + (lane.length() - pos).max(0.0);
    if dist_before > look_ahead || hops >= network.lane_count() {
        return None;
    }
    let next = lane.default_successor()?;
    search_lane(network, vehicles, searcher, next, 0.0, dist_before, look_ahead, hops + 1)
}

/// The lanes whose vehicles share road space with `lane_id`: every lane of
/// the same edge, or every junction lane merging into the same lane.
fn candidate_lanes(network: &Network, lane_id: LaneId) -> SmallVec<[LaneId; 4]> {
    let lane = network.lane(lane_id);
    match lane.kind() {
        LaneKind::Road(road) => network.edge(road.edge()).lanes().iter().copied().collect(),
        LaneKind::Junction(junction) => network
            .node(junction.node())
            .junction_lanes()
            .iter()
            .copied()
            .filter(|id| *id == lane_id || network.lane(*id).default_successor() == lane.default_successor())
            .collect(),
    }
}
