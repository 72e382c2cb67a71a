//! A microscopic road-traffic simulator.
//!
//! A [`Network`] of directed edges and junction nodes is built once from a
//! [`NetworkDescription`], then a [`Simulation`] moves individual vehicles
//! along its lanes, each controlled by a [`Driver`] that follows the vehicle
//! ahead, respects speed limits, slows for tight turns and occasionally
//! changes lane.

pub use cgmath;
pub use config::{DriverParams, NetworkDefaults, SimConfig, VehicleParams};
pub use error::BuildError;
pub use location::Location;
pub use network::{
    ArcGeometry, Edge, EdgeDescription, JunctionLane, Lane, LaneCurve, LaneKind, Network,
    NetworkDescription, Node, NodeDescription, Port, PortDirection, Reduction, RoadLane, RouteRole,
    Strip,
};
pub use simulation::{SimEvent, Simulation};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use util::Interval;
pub use vehicle::{Driver, LaneChange, LaneSurvey, NearbyVehicle, Vehicle};

mod config;
mod debug;
mod error;
mod location;
pub mod math;
mod network;
mod simulation;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Node].
    pub struct NodeId;
    /// Unique ID of an [Edge].
    pub struct EdgeId;
    /// Unique ID of a [Lane].
    pub struct LaneId;
    /// Unique ID of a [Port].
    pub struct PortId;
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;

/// Builds a network from its description. See [`Network::build`].
pub fn build_network(
    description: &NetworkDescription,
    defaults: &NetworkDefaults,
) -> Result<Network, BuildError> {
    Network::build(description, defaults)
}
