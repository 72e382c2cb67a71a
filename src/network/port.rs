use crate::math::{Point2d, Vector2d};
use crate::{EdgeId, LaneId, NodeId, PortId};

/// Whether a port is where traffic enters or leaves a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortDirection {
    In,
    Out,
}

/// The point where one road lane attaches to a node.
#[derive(Clone, Debug)]
pub struct Port {
    pub(crate) id: PortId,
    pub(crate) node: NodeId,
    pub(crate) edge: EdgeId,
    pub(crate) road_lane: LaneId,
    pub(crate) direction: PortDirection,
    /// The direction of travel through the port.
    pub(crate) unit: Vector2d,
    pub(crate) origin: Point2d,
    pub(crate) junction_lanes: Vec<LaneId>,
}

impl Port {
    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    /// The lane on the road side of the port.
    pub fn road_lane(&self) -> LaneId {
        self.road_lane
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// A unit vector in the direction of travel through the port.
    pub fn unit_vector(&self) -> Vector2d {
        self.unit
    }

    /// The resolved position of the port.
    pub fn origin(&self) -> Point2d {
        self.origin
    }

    /// The junction lanes leaving (for in-ports) or entering (for out-ports) this port.
    pub fn junction_lanes(&self) -> &[LaneId] {
        &self.junction_lanes
    }
}
