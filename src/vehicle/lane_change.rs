/// Tolerance for reaching the target lane.
const ARRIVAL_EPS: f64 = 1e-9;

/// A vehicle's lane-keeping state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LaneChange {
    /// Driving in the given lane number.
    Stable(usize),
    /// Moving across from lane `from` to lane `to`.
    Changing {
        from: usize,
        to: usize,
        /// The fractional lane number currently occupied.
        effective: f64,
    },
}

impl LaneChange {
    /// Starts a change from lane `from` to lane `to`.
    pub(crate) fn start(from: usize, to: usize) -> Self {
        LaneChange::Changing {
            from,
            to,
            effective: from as f64,
        }
    }

    /// The lane number the vehicle is in, fractional while changing.
    pub fn effective_lane_number(&self) -> f64 {
        match *self {
            LaneChange::Stable(lane) => lane as f64,
            LaneChange::Changing { effective, .. } => effective,
        }
    }

    pub fn is_changing(&self) -> bool {
        matches!(self, LaneChange::Changing { .. })
    }

    /// Moves the vehicle across by the fraction of a lane covered in `dt`.
    /// Returns the target lane number once the change completes.
    pub(crate) fn progress(&mut self, dt: f64, duration: f64) -> Option<usize> {
        let LaneChange::Changing { from, to, effective } = self else {
            return None;
        };
        let delta = *to as f64 - *from as f64;
        let step = if duration > 0.0 { delta * dt / duration } else { delta };
        *effective += step;

        let remaining = *to as f64 - *effective;
        let arrived = remaining.abs() < ARRIVAL_EPS || remaining * delta < 0.0 || *effective < 0.0;
        if arrived {
            let to = *to;
            *self = LaneChange::Stable(to);
            Some(to)
        } else {
            None
        }
    }
}
