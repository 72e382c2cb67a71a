use super::RouteRole;
use crate::math::{Point2d, Vector2d};
use crate::{EdgeId, LaneId, NodeId};
use std::collections::HashMap;

/// A directed road between two nodes, made of parallel lanes.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) name: String,
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) start: Point2d,
    pub(crate) end: Point2d,
    pub(crate) unit_in: Vector2d,
    pub(crate) unit_out: Vector2d,
    pub(crate) length: f64,
    pub(crate) lane_width: f64,
    /// The lanes, ordered left to right.
    pub(crate) lanes: Vec<LaneId>,
    pub(crate) median: Strip,
    pub(crate) shoulder: Strip,
    pub(crate) one_way: bool,
    pub(crate) speed_limit: f64,
    pub(crate) route_roles: HashMap<EdgeId, RouteRole>,
    pub(crate) default_successor: Option<EdgeId>,
    pub(crate) default_predecessor: Option<EdgeId>,
    pub(crate) in_reduction: f64,
    pub(crate) out_reduction: f64,
}

/// A painted strip running alongside the lanes: the median or the shoulder.
#[derive(Clone, Debug, PartialEq)]
pub struct Strip {
    pub width: f64,
    pub color: String,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// The edge's name in the network description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the edge starts at.
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// The node the edge ends at.
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// The centre of the `from` node.
    pub fn start(&self) -> Point2d {
        self.start
    }

    /// The centre of the `to` node.
    pub fn end(&self) -> Point2d {
        self.end
    }

    /// The direction of travel where the edge leaves its `from` node.
    pub fn unit_vector_in(&self) -> Vector2d {
        self.unit_in
    }

    /// The direction of travel where the edge enters its `to` node.
    pub fn unit_vector_out(&self) -> Vector2d {
        self.unit_out
    }

    /// The distance between the centres of the two nodes, in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The length left once both junction trims are taken off.
    pub fn usable_length(&self) -> f64 {
        f64::max(self.length - self.in_reduction - self.out_reduction, 0.0)
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane_width(&self) -> f64 {
        self.lane_width
    }

    /// The lanes, ordered left (lane 0) to right.
    pub fn lanes(&self) -> &[LaneId] {
        &self.lanes
    }

    pub fn median(&self) -> &Strip {
        &self.median
    }

    pub fn shoulder(&self) -> &Strip {
        &self.shoulder
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    pub fn speed_limit(&self) -> f64 {
        self.speed_limit
    }

    /// The total width: median, lanes and shoulder.
    pub fn width(&self) -> f64 {
        self.median.width + self.lane_width * self.lanes.len() as f64 + self.shoulder.width
    }

    /// The lateral distance from the centre line to the middle of a lane.
    /// Fractional lane numbers give positions between lanes.
    pub fn lane_offset(&self, lane_number: f64) -> f64 {
        (lane_number + 0.5) * self.lane_width + self.median.width
    }

    /// The turn taken to reach each edge leaving the `to` node.
    pub fn route_roles(&self) -> &HashMap<EdgeId, RouteRole> {
        &self.route_roles
    }

    /// The straight-through continuation, if there is an unambiguous one.
    pub fn default_successor(&self) -> Option<EdgeId> {
        self.default_successor
    }

    pub fn default_predecessor(&self) -> Option<EdgeId> {
        self.default_predecessor
    }

    /// The distance trimmed from the start of the edge.
    pub fn in_reduction(&self) -> f64 {
        self.in_reduction
    }

    /// The distance trimmed from the end of the edge.
    pub fn out_reduction(&self) -> f64 {
        self.out_reduction
    }
}
