use crate::LaneId;

/// A position in the network: a lane and a distance along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub(crate) lane: LaneId,
    /// Distance from the start of the lane, in m.
    pub(crate) u: f64,
}

impl Location {
    pub fn new(lane: LaneId, u: f64) -> Self {
        Self { lane, u }
    }

    pub fn lane(&self) -> LaneId {
        self.lane
    }

    /// The distance travelled along the lane, in m.
    pub fn u(&self) -> f64 {
        self.u
    }
}
