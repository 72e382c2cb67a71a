//! The road network: nodes, edges, lanes and ports.
//!
//! All cross references are IDs into the arenas owned by [`Network`], so the
//! cyclic edge → node → port → lane → edge relationships never form
//! reference cycles.

use crate::{EdgeId, LaneId, NodeId, PortId, VehicleId};
use slotmap::SlotMap;
use std::collections::HashMap;

pub use description::{EdgeDescription, NetworkDescription, NodeDescription};
pub use edge::{Edge, Strip};
pub use lane::{ArcGeometry, JunctionLane, Lane, LaneCurve, LaneKind, RoadLane};
pub use node::{Node, Reduction};
pub use port::{Port, PortDirection};
pub use role::RouteRole;

mod build;
mod description;
mod edge;
mod lane;
mod node;
mod port;
mod role;

/// A fully connected, geometrically resolved road network.
#[derive(Clone, Debug, Default)]
pub struct Network {
    name: String,
    nodes: SlotMap<NodeId, Node>,
    edges: SlotMap<EdgeId, Edge>,
    lanes: SlotMap<LaneId, Lane>,
    ports: SlotMap<PortId, Port>,
    node_names: HashMap<String, NodeId>,
    edge_names: HashMap<String, EdgeId>,
}

impl Network {
    /// The title from the network description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a reference to the node with the given ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Gets a reference to the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Gets a reference to the lane with the given ID.
    pub fn lane(&self, id: LaneId) -> &Lane {
        &self.lanes[id]
    }

    /// Gets a reference to the port with the given ID.
    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id]
    }

    /// Finds a node by its name in the network description.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    /// Finds an edge by its name in the network description.
    pub fn edge_by_name(&self, name: &str) -> Option<EdgeId> {
        self.edge_names.get(name).copied()
    }

    /// Gets the lane of an edge with the given lane number.
    pub fn edge_lane(&self, edge: EdgeId, lane_number: usize) -> Option<LaneId> {
        self.edges.get(edge)?.lanes.get(lane_number).copied()
    }

    /// Returns true if the lane belongs to this network.
    pub fn contains_lane(&self, id: LaneId) -> bool {
        self.lanes.contains_key(id)
    }

    /// Returns an iterator over all the nodes in the network.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns an iterator over all the edges in the network.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Returns an iterator over all the lanes in the network.
    pub fn iter_lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.values()
    }

    /// Returns an iterator over all the ports in the network.
    pub fn iter_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// The total number of lanes, road and junction.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// The speed limit for a vehicle on `lane` whose effective lane number
    /// is `lane_number`. Between two road lanes the lower limit applies.
    pub fn speed_limit_at(&self, lane: LaneId, lane_number: f64) -> f64 {
        let lane = &self.lanes[lane];
        let Some(edge) = lane.edge() else {
            return lane.speed_limit;
        };
        let lanes = &self.edges[edge].lanes;
        let max = lanes.len().saturating_sub(1) as f64;
        let lane_number = lane_number.clamp(0.0, max);
        [lane_number.floor(), lane_number.ceil()]
            .into_iter()
            .filter_map(|n| lanes.get(n as usize))
            .map(|id| self.lanes[*id].speed_limit)
            .fold(lane.speed_limit, f64::min)
    }

    /// Registers a vehicle as being on a lane.
    pub(crate) fn insert_vehicle(&mut self, lane: LaneId, vehicle: VehicleId) {
        self.lanes[lane].vehicles.push(vehicle);
    }

    /// Removes a vehicle from a lane's register.
    pub(crate) fn remove_vehicle(&mut self, lane: LaneId, vehicle: VehicleId) {
        let vehicles = &mut self.lanes[lane].vehicles;
        if let Some(idx) = vehicles.iter().rposition(|v| *v == vehicle) {
            vehicles.swap_remove(idx);
        }
    }
}
