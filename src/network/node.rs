use crate::math::Point2d;
use crate::{EdgeId, LaneId, NodeId, PortId};

/// A junction where roads meet.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) origin: Point2d,
    pub(crate) in_edges: Vec<EdgeId>,
    pub(crate) out_edges: Vec<EdgeId>,
    pub(crate) in_ports: Vec<PortId>,
    pub(crate) out_ports: Vec<PortId>,
    pub(crate) junction_lanes: Vec<LaneId>,
    /// The width of the widest incident edge.
    pub(crate) width: f64,
    pub(crate) reductions: Vec<Reduction>,
}

/// How far a pair of edges must be trimmed back from the node's centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reduction {
    pub in_edge: EdgeId,
    pub out_edge: EdgeId,
    pub amount: f64,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: &str, origin: Point2d) -> Self {
        Self {
            id,
            name: name.to_owned(),
            origin,
            in_edges: vec![],
            out_edges: vec![],
            in_ports: vec![],
            out_ports: vec![],
            junction_lanes: vec![],
            width: 0.0,
            reductions: vec![],
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's name in the network description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The position of the node's centre.
    pub fn origin(&self) -> Point2d {
        self.origin
    }

    /// The edges ending at this node.
    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    /// The edges starting at this node.
    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    pub fn in_ports(&self) -> &[PortId] {
        &self.in_ports
    }

    pub fn out_ports(&self) -> &[PortId] {
        &self.out_ports
    }

    /// The lanes inside the junction, each joining an in-port to an out-port.
    pub fn junction_lanes(&self) -> &[LaneId] {
        &self.junction_lanes
    }

    /// The width of the widest incident edge, in m.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The trim distance required by each (incoming, outgoing) edge pair.
    pub fn reductions(&self) -> &[Reduction] {
        &self.reductions
    }
}
