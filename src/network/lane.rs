use super::RouteRole;
use crate::math::{
    angle, perpendicular, unit, ArcCurve2d, LineSegment2d, ParametricCurve2d, Point2d, Vector2d,
};
use crate::util::Interval;
use crate::{EdgeId, LaneId, NodeId, PortId, VehicleId};
use cgmath::prelude::*;
use std::collections::HashMap;

/// A single channel of traffic, either along a road or through a junction.
#[derive(Clone, Debug)]
pub struct Lane {
    pub(crate) id: LaneId,
    pub(crate) name: String,
    pub(crate) lane_number: usize,
    pub(crate) width: f64,
    /// Speed limit in m/s.
    pub(crate) speed_limit: f64,
    pub(crate) color: String,
    pub(crate) start: Point2d,
    pub(crate) end: Point2d,
    /// The direction of travel used when the lane has no length.
    pub(crate) direction: Vector2d,
    pub(crate) length: f64,
    pub(crate) default_successor: Option<LaneId>,
    pub(crate) default_predecessor: Option<LaneId>,
    pub(crate) kind: LaneKind,
    /// The vehicles currently on the lane.
    pub(crate) vehicles: Vec<VehicleId>,
}

/// The variant-specific part of a [`Lane`].
#[derive(Clone, Debug)]
pub enum LaneKind {
    Road(RoadLane),
    Junction(JunctionLane),
}

/// A straight lane belonging to an edge.
#[derive(Clone, Debug)]
pub struct RoadLane {
    pub(crate) edge: EdgeId,
    /// The lateral distance from the edge's centre line.
    pub(crate) offset: f64,
    pub(crate) port_in: Option<PortId>,
    pub(crate) port_out: Option<PortId>,
    /// The turn taken by each junction lane reachable from the end of this lane.
    pub(crate) route_roles: HashMap<LaneId, RouteRole>,
    pub(crate) stop: bool,
}

/// A lane inside a node, joining an in-port to an out-port.
#[derive(Clone, Debug)]
pub struct JunctionLane {
    pub(crate) node: NodeId,
    pub(crate) port_in: PortId,
    pub(crate) port_out: PortId,
    pub(crate) role: RouteRole,
    pub(crate) arc: Option<ArcGeometry>,
}

/// The geometry of a curved junction lane.
#[derive(Clone, Copy, Debug)]
pub struct ArcGeometry {
    pub(crate) curve: ArcCurve2d,
    /// The speed at which the lateral acceleration reaches the comfort limit.
    pub(crate) max_safe_speed: f64,
}

/// The centre line of a lane, parameterised by distance along it.
#[derive(Clone, Copy, Debug)]
pub enum LaneCurve {
    Line(LineSegment2d),
    Arc(ArcCurve2d),
}

impl ArcGeometry {
    pub(crate) fn new(curve: ArcCurve2d, max_transverse_acceleration: f64) -> Self {
        let radius = curve.radius().magnitude();
        Self {
            curve,
            max_safe_speed: (radius * max_transverse_acceleration).sqrt(),
        }
    }

    pub fn center(&self) -> Point2d {
        self.curve.center()
    }

    /// The vector from the centre to the start of the lane.
    pub fn radius(&self) -> Vector2d {
        self.curve.radius()
    }

    /// The signed angle turned through, positive when turning left.
    pub fn sweep(&self) -> f64 {
        self.curve.sweep()
    }

    pub fn max_safe_speed(&self) -> f64 {
        self.max_safe_speed
    }
}

impl Lane {
    pub fn id(&self) -> LaneId {
        self.id
    }

    /// A readable label, e.g. `3:1` for lane 1 of edge `3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lane number, counting from 0 at the left.
    /// Junction lanes take the number of the lane feeding them.
    pub fn lane_number(&self) -> usize {
        self.lane_number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// The speed limit in m/s.
    pub fn speed_limit(&self) -> f64 {
        self.speed_limit
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn start(&self) -> Point2d {
        self.start
    }

    pub fn end(&self) -> Point2d {
        self.end
    }

    /// The length in m. For curved junction lanes this is the arc length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The lane a vehicle follows on from this one, if any.
    pub fn default_successor(&self) -> Option<LaneId> {
        self.default_successor
    }

    pub fn default_predecessor(&self) -> Option<LaneId> {
        self.default_predecessor
    }

    pub fn kind(&self) -> &LaneKind {
        &self.kind
    }

    pub fn is_junction(&self) -> bool {
        matches!(self.kind, LaneKind::Junction(_))
    }

    /// The edge a road lane belongs to.
    pub fn edge(&self) -> Option<EdgeId> {
        match &self.kind {
            LaneKind::Road(road) => Some(road.edge),
            LaneKind::Junction(_) => None,
        }
    }

    /// The node a junction lane belongs to.
    pub fn node(&self) -> Option<NodeId> {
        match &self.kind {
            LaneKind::Road(_) => None,
            LaneKind::Junction(junction) => Some(junction.node),
        }
    }

    /// The turn geometry of a curved junction lane.
    pub fn arc(&self) -> Option<&ArcGeometry> {
        match &self.kind {
            LaneKind::Junction(junction) => junction.arc.as_ref(),
            LaneKind::Road(_) => None,
        }
    }

    /// The fastest comfortable speed along the lane; infinite unless it curves.
    pub fn max_safe_speed(&self) -> f64 {
        self.arc().map_or(f64::INFINITY, |arc| arc.max_safe_speed)
    }

    /// The turn classification of a junction lane.
    pub fn route_role(&self) -> Option<RouteRole> {
        match &self.kind {
            LaneKind::Junction(junction) => Some(junction.role),
            LaneKind::Road(_) => None,
        }
    }

    /// The turn taken by each junction lane reachable from a road lane.
    pub fn route_roles(&self) -> Option<&HashMap<LaneId, RouteRole>> {
        match &self.kind {
            LaneKind::Road(road) => Some(&road.route_roles),
            LaneKind::Junction(_) => None,
        }
    }

    /// Whether traffic must stop at the end of a road lane.
    pub fn stop(&self) -> bool {
        matches!(&self.kind, LaneKind::Road(road) if road.stop)
    }

    /// The vehicles currently on the lane.
    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    /// The centre line of the lane.
    pub fn curve(&self) -> LaneCurve {
        match self.arc() {
            Some(arc) => LaneCurve::Arc(arc.curve),
            None => LaneCurve::Line(LineSegment2d::from_ends(self.start, self.end, self.direction)),
        }
    }

    /// The point `u` metres along the lane, moved `lateral` metres to the right.
    pub fn point_at(&self, u: f64, lateral: f64) -> Point2d {
        let curve = self.curve();
        let tangent = unit(curve.sample_dt(u)).unwrap_or(self.direction);
        curve.sample(u) + perpendicular(tangent) * lateral
    }

    /// The direction of travel `u` metres along the lane, in radians.
    pub fn heading_at(&self, u: f64) -> f64 {
        angle(unit(self.curve().sample_dt(u)).unwrap_or(self.direction))
    }

    /// Moves the start of a straight lane.
    pub(crate) fn set_start(&mut self, start: Point2d) {
        self.start = start;
        self.length = (self.end - self.start).magnitude();
    }

    /// Moves the end of a straight lane.
    pub(crate) fn set_end(&mut self, end: Point2d) {
        self.end = end;
        self.length = (self.end - self.start).magnitude();
    }

    pub(crate) fn road_mut(&mut self) -> Option<&mut RoadLane> {
        match &mut self.kind {
            LaneKind::Road(road) => Some(road),
            LaneKind::Junction(_) => None,
        }
    }
}

impl RoadLane {
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The port at the node where the lane begins.
    pub fn port_in(&self) -> Option<PortId> {
        self.port_in
    }

    /// The port at the node where the lane ends.
    pub fn port_out(&self) -> Option<PortId> {
        self.port_out
    }
}

impl JunctionLane {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn port_in(&self) -> PortId {
        self.port_in
    }

    pub fn port_out(&self) -> PortId {
        self.port_out
    }

    pub fn role(&self) -> RouteRole {
        self.role
    }
}

impl ParametricCurve2d for LaneCurve {
    fn sample(&self, t: f64) -> Point2d {
        match self {
            LaneCurve::Line(line) => line.sample(t),
            LaneCurve::Arc(arc) => arc.sample(t),
        }
    }

    fn bounds(&self) -> Interval<f64> {
        match self {
            LaneCurve::Line(line) => line.bounds(),
            LaneCurve::Arc(arc) => arc.bounds(),
        }
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        match self {
            LaneCurve::Line(line) => line.sample_dt(t),
            LaneCurve::Arc(arc) => arc.sample_dt(t),
        }
    }
}
