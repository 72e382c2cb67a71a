//! The one-time pass that turns a [`NetworkDescription`] into a [`Network`].

use super::{
    ArcGeometry, Edge, EdgeDescription, JunctionLane, Lane, LaneKind, Network, NetworkDescription,
    Node, Port, PortDirection, Reduction, RoadLane, RouteRole, Strip,
};
use crate::config::NetworkDefaults;
use crate::error::BuildError;
use crate::math::{cross, perpendicular, unit, ArcCurve2d, Point2d, Vector2d};
use crate::{LaneId, NodeId, PortId};
use cgmath::prelude::*;
use itertools::iproduct;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

/// Below this, `1 + cos θ` means the two edges double straight back.
const DEGENERATE_TURN: f64 = 1e-9;

/// Arcs with a smaller radius are treated as straight.
const MIN_ARC_RADIUS: f64 = 1e-6;

impl Network {
    /// Builds a fully connected network from its description.
    ///
    /// Malformed descriptions (duplicate IDs, edges referencing unknown
    /// nodes, non-positive lane counts, negative widths) are rejected.
    /// Degenerate geometry is repaired with a warning.
    pub fn build(desc: &NetworkDescription, defaults: &NetworkDefaults) -> Result<Self, BuildError> {
        validate(desc)?;

        let mut network = Network {
            name: desc.name.clone(),
            ..Default::default()
        };

        for node in &desc.nodes {
            let origin = Point2d::new(node.x, node.y);
            let id = network
                .nodes
                .insert_with_key(|id| Node::new(id, &node.id, origin));
            network.node_names.insert(node.id.clone(), id);
        }
        for edge in &desc.edges {
            network.add_edge(edge, defaults)?;
        }
        info!(
            "loaded {} edges and {} nodes for {:?}",
            network.edges.len(),
            network.nodes.len(),
            network.name
        );

        let node_ids = network.nodes.keys().collect::<Vec<_>>();
        for &node in &node_ids {
            network.find_node_width(node);
        }
        for &node in &node_ids {
            network.make_edge_reductions(node);
        }
        for &node in &node_ids {
            network.assign_edge_route_roles(node);
        }
        for &node in &node_ids {
            network.create_ports(node);
            network.locate_ports(node);
            network.create_junction_lanes(node, defaults);
        }
        for &node in &node_ids {
            network.assign_lane_route_roles(node);
        }

        for edge in network.edges.values() {
            if edge.in_reduction + edge.out_reduction > edge.length {
                warn!(
                    "edge {} is shorter than its junction trims ({:.2} + {:.2} > {:.2})",
                    edge.name, edge.in_reduction, edge.out_reduction, edge.length
                );
            }
        }

        Ok(network)
    }

    /// Creates an edge and its road lanes.
    fn add_edge(&mut self, desc: &EdgeDescription, defaults: &NetworkDefaults) -> Result<(), BuildError> {
        let from = self.node_names[&desc.from];
        let to = self.node_names[&desc.to];
        let (start, end) = (self.nodes[from].origin, self.nodes[to].origin);

        let delta = end - start;
        let unit_vec = unit(delta).unwrap_or_else(|| {
            warn!("edge {} has zero length; assuming it points along +x", desc.id);
            Vector2d::unit_x()
        });

        let lane_width = desc.lane_width.unwrap_or(defaults.lane_width);
        let shoulder = Strip {
            width: desc.shoulder_width.unwrap_or(defaults.shoulder_width),
            color: desc.shoulder_color.clone().unwrap_or_else(|| defaults.shoulder_color.clone()),
        };
        let median = if desc.one_way {
            Strip {
                width: desc.median_width.unwrap_or(defaults.shoulder_width),
                color: desc.median_color.clone().unwrap_or_else(|| shoulder.color.clone()),
            }
        } else {
            Strip {
                width: desc.median_width.unwrap_or(defaults.median_width),
                color: desc.median_color.clone().unwrap_or_else(|| defaults.median_color.clone()),
            }
        };
        for width in [median.width, shoulder.width] {
            if !(width >= 0.0) {
                return Err(BuildError::InvalidWidth { edge: desc.id.clone(), width });
            }
        }
        if !(lane_width > 0.0) {
            return Err(BuildError::InvalidWidth { edge: desc.id.clone(), width: lane_width });
        }

        let speed_limit = desc.speed_limit.unwrap_or(defaults.speed_limit);
        let lane_color = desc.lane_color.clone().unwrap_or_else(|| defaults.lane_color.clone());

        let edge_id = self.edges.insert_with_key(|id| Edge {
            id,
            name: desc.id.clone(),
            from,
            to,
            start,
            end,
            unit_in: unit_vec,
            unit_out: unit_vec,
            length: delta.magnitude(),
            lane_width,
            lanes: vec![],
            median,
            shoulder,
            one_way: desc.one_way,
            speed_limit,
            route_roles: HashMap::new(),
            default_successor: None,
            default_predecessor: None,
            in_reduction: 0.0,
            out_reduction: 0.0,
        });

        // Lane 0 is the leftmost, nearest the median
        let lane_count = usize::try_from(desc.lanes).unwrap_or_default();
        for lane_number in 0..lane_count {
            let offset = self.edges[edge_id].lane_offset(lane_number as f64);
            let shift = perpendicular(unit_vec) * offset;
            let lane_id = self.lanes.insert_with_key(|id| Lane {
                id,
                name: format!("{}:{}", desc.id, lane_number),
                lane_number,
                width: lane_width,
                speed_limit,
                color: lane_color.clone(),
                start: start + shift,
                end: end + shift,
                direction: unit_vec,
                length: delta.magnitude(),
                default_successor: None,
                default_predecessor: None,
                kind: LaneKind::Road(RoadLane {
                    edge: edge_id,
                    offset,
                    port_in: None,
                    port_out: None,
                    route_roles: HashMap::new(),
                    stop: desc.stop,
                }),
                vehicles: vec![],
            });
            self.edges[edge_id].lanes.push(lane_id);
        }

        self.edge_names.insert(desc.id.clone(), edge_id);
        self.nodes[to].in_edges.push(edge_id);
        self.nodes[from].out_edges.push(edge_id);
        Ok(())
    }

    /// A node is as wide as its widest edge.
    fn find_node_width(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let width = node
            .in_edges
            .iter()
            .chain(&node.out_edges)
            .map(|e| self.edges[*e].width())
            .fold(0.0, f64::max);
        self.nodes[node_id].width = width;
        debug!("node {} has width {:.1}", self.nodes[node_id].name, width);
    }

    /// Trims every edge at the node back far enough for its tightest turn.
    fn make_edge_reductions(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let pairs = iproduct!(node.in_edges.clone(), node.out_edges.clone()).collect::<Vec<_>>();

        for (e0, e1) in pairs {
            let amount = edge_reduction(&self.edges[e0], &self.edges[e1]);
            for (edge_id, trimmed) in [(e0, true), (e1, false)] {
                let edge = &mut self.edges[edge_id];
                let clamped = if amount > edge.length {
                    warn!(
                        "reduction {:.2} would remove all of edge {}; clamping to {:.2}",
                        amount, edge.name, edge.length
                    );
                    edge.length
                } else {
                    amount
                };
                if trimmed {
                    edge.out_reduction = edge.out_reduction.max(clamped);
                } else {
                    edge.in_reduction = edge.in_reduction.max(clamped);
                }
            }
            self.nodes[node_id].reductions.push(Reduction {
                in_edge: e0,
                out_edge: e1,
                amount,
            });
            debug!(
                "connection {} -> {} reduces lengths by {:.2}",
                self.edges[e0].name, self.edges[e1].name, amount
            );
        }
    }

    /// Records the turn from each incoming edge to each outgoing edge,
    /// and the default continuations.
    fn assign_edge_route_roles(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let (in_edges, out_edges) = (node.in_edges.clone(), node.out_edges.clone());

        for (&e0, &e1) in iproduct!(&in_edges, &out_edges) {
            let role = RouteRole::from_unit_vectors(self.edges[e0].unit_out, self.edges[e1].unit_in);
            if role == RouteRole::Straight {
                self.edges[e0].default_successor = Some(e1);
                self.edges[e1].default_predecessor = Some(e0);
            }
            self.edges[e0].route_roles.insert(e1, role);
        }

        // Only one way out, whatever the angle
        if let [only] = out_edges[..] {
            for &e0 in &in_edges {
                self.edges[e0].default_successor = Some(only);
                self.edges[only].default_predecessor = Some(e0);
            }
        }
    }

    /// Creates an in-port for every lane arriving at the node and an
    /// out-port for every lane leaving it.
    fn create_ports(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let arriving = node.in_edges.iter().map(|e| (*e, PortDirection::In));
        let leaving = node.out_edges.iter().map(|e| (*e, PortDirection::Out));
        let edges = arriving.chain(leaving).collect::<Vec<_>>();

        for (edge_id, direction) in edges {
            let edge = &self.edges[edge_id];
            let unit = match direction {
                PortDirection::In => edge.unit_out,
                PortDirection::Out => edge.unit_in,
            };
            for lane_id in edge.lanes.clone() {
                let port_id = self.ports.insert_with_key(|id| Port {
                    id,
                    node: node_id,
                    edge: edge_id,
                    road_lane: lane_id,
                    direction,
                    unit,
                    origin: Point2d::new(0.0, 0.0),
                    junction_lanes: vec![],
                });
                let node = &mut self.nodes[node_id];
                let Some(road) = self.lanes[lane_id].road_mut() else {
                    continue;
                };
                match direction {
                    PortDirection::In => {
                        node.in_ports.push(port_id);
                        road.port_out = Some(port_id);
                    }
                    PortDirection::Out => {
                        node.out_ports.push(port_id);
                        road.port_in = Some(port_id);
                    }
                }
            }
        }
    }

    /// Places each port at the trimmed end of its lane, and moves the
    /// lane's end point to match.
    fn locate_ports(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let origin = node.origin;
        let ports = node.in_ports.iter().chain(&node.out_ports).copied().collect::<Vec<_>>();

        for port_id in ports {
            let port = &self.ports[port_id];
            let edge = &self.edges[port.edge];
            let offset = match &self.lanes[port.road_lane].kind {
                LaneKind::Road(road) => road.offset,
                LaneKind::Junction(_) => 0.0,
            };
            let lateral = perpendicular(port.unit) * offset;
            let (direction, lane_id) = (port.direction, port.road_lane);

            let port_origin = match direction {
                PortDirection::In => origin - port.unit * edge.out_reduction + lateral,
                PortDirection::Out => origin + port.unit * edge.in_reduction + lateral,
            };
            self.ports[port_id].origin = port_origin;

            let lane = &mut self.lanes[lane_id];
            match direction {
                PortDirection::In => lane.set_end(port_origin),
                PortDirection::Out => lane.set_start(port_origin),
            }
            debug!(
                "{:?}-port of lane {} is at ({:.1}, {:.1})",
                direction, lane.name, port_origin.x, port_origin.y
            );
        }
    }

    /// Connects in-ports to out-ports with junction lanes.
    fn create_junction_lanes(&mut self, node_id: NodeId, defaults: &NetworkDefaults) {
        let node = &self.nodes[node_id];
        let single_exit = node.out_edges.len() == 1;
        let pairs = iproduct!(node.in_ports.clone(), node.out_ports.clone()).collect::<Vec<_>>();

        for (p0, p1) in pairs {
            let (port_in, port_out) = (&self.ports[p0], &self.ports[p1]);
            let (lane_in, lane_out) = (&self.lanes[port_in.road_lane], &self.lanes[port_out.road_lane]);
            if lane_in.lane_number != lane_out.lane_number {
                continue;
            }

            let role = RouteRole::from_unit_vectors(port_in.unit, port_out.unit);
            let rightmost = self.edges[port_in.edge].lanes.len() - 1;
            let allowed = single_exit
                || match role {
                    RouteRole::Straight => true,
                    RouteRole::Left | RouteRole::UTurn => lane_in.lane_number == 0,
                    RouteRole::Right => lane_in.lane_number == rightmost,
                };
            if !allowed {
                continue;
            }

            let arc = self.junction_arc(node_id, p0, p1, role, defaults);
            let (start, end, direction) = (port_in.origin, port_out.origin, port_in.unit);
            let length = arc.map_or_else(|| (end - start).magnitude(), |a| a.curve.length());
            let name = format!("{}>{}", lane_in.name, lane_out.name);
            let (from_lane, to_lane) = (lane_in.id, lane_out.id);
            let (lane_number, width, speed_limit) = (lane_in.lane_number, lane_in.width, lane_in.speed_limit);
            let color = lane_in.color.clone();

            let lane_id = self.lanes.insert_with_key(|id| Lane {
                id,
                name,
                lane_number,
                width,
                speed_limit,
                color,
                start,
                end,
                direction,
                length,
                default_successor: Some(to_lane),
                default_predecessor: Some(from_lane),
                kind: LaneKind::Junction(JunctionLane {
                    node: node_id,
                    port_in: p0,
                    port_out: p1,
                    role,
                    arc,
                }),
                vehicles: vec![],
            });

            self.ports[p0].junction_lanes.push(lane_id);
            self.ports[p1].junction_lanes.push(lane_id);
            self.nodes[node_id].junction_lanes.push(lane_id);
            debug!(
                "node {} connects lane {} via {:?} junction lane {}",
                self.nodes[node_id].name, self.lanes[from_lane].name, role, self.lanes[lane_id].name
            );
        }

        let node = &self.nodes[node_id];
        if !node.out_ports.is_empty() {
            for port_id in &node.in_ports {
                let port = &self.ports[*port_id];
                if port.junction_lanes.is_empty() {
                    info!(
                        "lane {} has no connection through node {}",
                        self.lanes[port.road_lane].name, node.name
                    );
                }
            }
        }
    }

    /// Computes the arc for a turning junction lane, or `None` if it runs straight.
    fn junction_arc(
        &self,
        node_id: NodeId,
        p0: PortId,
        p1: PortId,
        role: RouteRole,
        defaults: &NetworkDefaults,
    ) -> Option<ArcGeometry> {
        if role == RouteRole::Straight {
            return None;
        }
        let origin = self.nodes[node_id].origin;
        let (port_in, port_out) = (&self.ports[p0], &self.ports[p1]);

        let center = match role {
            RouteRole::Right => {
                // Where the normals of the two ports meet
                let (n0, n1) = (perpendicular(port_in.unit), perpendicular(port_out.unit));
                let denom = cross(n0, n1);
                let s = cross(port_out.origin - port_in.origin, n1) / denom;
                if denom.abs() > DEGENERATE_TURN && s > 0.0 {
                    port_in.origin + n0 * s
                } else {
                    warn!("right turn at node {} has no tangent arc", self.nodes[node_id].name);
                    origin
                }
            }
            _ => origin,
        };

        let curve = ArcCurve2d::new(center, port_in.origin, port_out.origin, role.is_clockwise());
        if curve.radius().magnitude() < MIN_ARC_RADIUS || curve.length() < MIN_ARC_RADIUS {
            warn!(
                "junction lane at node {} has a degenerate arc; treating it as straight",
                self.nodes[node_id].name
            );
            return None;
        }
        Some(ArcGeometry::new(curve, defaults.max_transverse_acceleration))
    }

    /// Records the role of each junction lane on the road lanes it joins,
    /// and picks default successors and predecessors.
    fn assign_lane_route_roles(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let ports = node.in_ports.iter().chain(&node.out_ports).copied().collect::<Vec<_>>();

        for port_id in ports {
            let port = &self.ports[port_id];
            let road_lane = port.road_lane;
            let candidates = port
                .junction_lanes
                .iter()
                .filter_map(|id| self.lanes[*id].route_role().map(|role| (*id, role)))
                .collect::<Vec<(LaneId, RouteRole)>>();
            let best = candidates
                .iter()
                .min_by_key(|(_, role)| role.preference())
                .map(|(id, _)| *id);

            let lane = &mut self.lanes[road_lane];
            match port.direction {
                PortDirection::In => {
                    lane.default_successor = best;
                    if let Some(road) = lane.road_mut() {
                        road.route_roles.extend(candidates);
                    }
                }
                PortDirection::Out => lane.default_predecessor = best,
            }
        }
    }
}

/// The distance edge `e0` must be trimmed back so that it clears `e1`
/// when turning from one to the other.
fn edge_reduction(e0: &Edge, e1: &Edge) -> f64 {
    let sin = cross(e0.unit_out, e1.unit_in);
    if sin >= 0.0 {
        return 0.0;
    }
    let cos = e0.unit_out.dot(e1.unit_in);
    if 1.0 + cos < DEGENERATE_TURN {
        warn!("edges {} and {} double back on each other", e0.name, e1.name);
        return 0.0;
    }
    let tan_half = ((1.0 - cos) / (1.0 + cos)).sqrt();
    e0.width() * tan_half
}

/// Rejects descriptions that cannot be built.
fn validate(desc: &NetworkDescription) -> Result<(), BuildError> {
    let mut nodes = HashSet::new();
    for node in &desc.nodes {
        if !nodes.insert(node.id.as_str()) {
            return Err(BuildError::DuplicateNode(node.id.clone()));
        }
    }

    let mut edges = HashSet::new();
    for edge in &desc.edges {
        if !edges.insert(edge.id.as_str()) {
            return Err(BuildError::DuplicateEdge(edge.id.clone()));
        }
        for node in [&edge.from, &edge.to] {
            if !nodes.contains(node.as_str()) {
                return Err(BuildError::UnknownNode {
                    edge: edge.id.clone(),
                    node: node.clone(),
                });
            }
        }
        if edge.lanes <= 0 {
            return Err(BuildError::InvalidLaneCount {
                edge: edge.id.clone(),
                lanes: edge.lanes,
            });
        }
    }
    Ok(())
}
