use crate::config::DriverParams;
use rand::Rng;

/// The behaviour model controlling a vehicle.
#[derive(Clone, Debug)]
pub struct Driver {
    params: DriverParams,
}

/// What the driver can see when choosing an acceleration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Situation {
    /// Own speed in m/s.
    pub speed: f64,
    /// The speed limit where the vehicle is, in m/s.
    pub speed_limit: f64,
    pub lead: Option<Lead>,
    pub curve: Option<CurveAhead>,
}

/// The nearest vehicle ahead.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Lead {
    /// Distance from own position to the lead's position, in m.
    pub gap: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub length: f64,
}

/// A curved junction lane at the end of the current lane.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CurveAhead {
    /// Distance to the start of the curve, in m.
    pub distance: f64,
    pub max_safe_speed: f64,
}

/// The rule that produced an acceleration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Behaviour {
    Cruise,
    SpeedLimit,
    Tailgate,
    MatchSpeeds,
    CurveCaution,
}

impl Behaviour {
    pub fn name(self) -> &'static str {
        match self {
            Behaviour::Cruise => "cruise",
            Behaviour::SpeedLimit => "speed limit",
            Behaviour::Tailgate => "tailgate",
            Behaviour::MatchSpeeds => "match speeds",
            Behaviour::CurveCaution => "curve caution",
        }
    }
}

/// The outcome of one acceleration decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Decision {
    pub behaviour: Behaviour,
    pub acceleration: f64,
    pub braking: bool,
    /// Whether the lead vehicle is closer than its own length.
    pub collision: bool,
}

impl Decision {
    fn cruise(behaviour: Behaviour, acceleration: f64) -> Self {
        Self {
            behaviour,
            acceleration,
            braking: false,
            collision: false,
        }
    }

    fn brake(behaviour: Behaviour, acceleration: f64) -> Self {
        Self {
            behaviour,
            acceleration,
            braking: true,
            collision: false,
        }
    }
}

impl Driver {
    pub fn new(params: DriverParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    pub(crate) fn set_params(&mut self, params: DriverParams) {
        self.params = params;
    }

    /// Sets how far above the speed limit the driver likes to travel.
    pub(crate) fn set_over_speed_limit(&mut self, over: f64) {
        self.params.over_speed_limit = over;
    }

    /// Chooses an acceleration. Any applicable caution wins over the speed
    /// limit, and the most restrictive caution wins over the others.
    pub(crate) fn decide(&self, dt: f64, situation: &Situation) -> Decision {
        let speed = situation.speed;
        let cautions = [
            situation.lead.and_then(|lead| self.tailgate_acc(speed, &lead)),
            situation.lead.and_then(|lead| self.match_speeds_acc(speed, &lead)),
            situation.curve.and_then(|curve| self.curve_caution_acc(dt, speed, &curve)),
        ];

        let mut decision = cautions
            .into_iter()
            .flatten()
            .min_by(|a, b| a.acceleration.total_cmp(&b.acceleration))
            .or_else(|| {
                self.speed_limit_acc(dt, speed, situation.speed_limit)
                    .map(|acc| Decision::cruise(Behaviour::SpeedLimit, acc))
            })
            .unwrap_or(Decision::cruise(Behaviour::Cruise, 0.0));
        decision.collision = cautions.iter().flatten().any(|c| c.collision);
        decision
    }

    /// Accelerates towards a little over the speed limit, or coasts back
    /// down when well above it.
    pub(crate) fn speed_limit_acc(&self, dt: f64, speed: f64, speed_limit: f64) -> Option<f64> {
        let p = &self.params;
        let target = speed_limit + p.over_speed_limit;
        if speed < target {
            let to_target = if dt > 0.0 { (target - speed) / dt } else { p.normal_acc };
            Some(p.normal_acc.min(to_target))
        } else if speed > target + p.speed_zone_width {
            Some(p.coast_acc)
        } else {
            None
        }
    }

    /// Drops back when inside the following distance of the lead vehicle.
    pub(crate) fn tailgate_acc(&self, speed: f64, lead: &Lead) -> Option<Decision> {
        let p = &self.params;
        let dx = lead.gap;
        let dv = lead.speed - speed;
        let follow = lead.length + speed * p.tau;

        if dx < lead.length {
            return Some(Decision {
                behaviour: Behaviour::Tailgate,
                acceleration: lead.acceleration - p.normal_acc,
                braking: true,
                collision: true,
            });
        }
        if dx >= follow {
            return None;
        }
        let acc = lead.acceleration - p.normal_acc;
        if dv < 0.0 {
            let time_to_impact = -dx / dv;
            Some(Decision::brake(
                Behaviour::Tailgate,
                f64::min(dv / time_to_impact + lead.acceleration, acc),
            ))
        } else {
            Some(Decision::cruise(Behaviour::Tailgate, acc))
        }
    }

    /// Slows to match a slower vehicle ahead before reaching the
    /// following distance.
    pub(crate) fn match_speeds_acc(&self, speed: f64, lead: &Lead) -> Option<Decision> {
        let p = &self.params;
        let dx = lead.gap;
        let dv = lead.speed - speed;
        let follow = lead.length + speed * p.tau;

        if dx < p.look_ahead && dv < -1.0 && dx > follow {
            Some(Decision::brake(
                Behaviour::MatchSpeeds,
                -dv * dv / (2.0 * (dx - follow)),
            ))
        } else {
            None
        }
    }

    /// Slows for a bend ahead that is too tight for the current speed.
    pub(crate) fn curve_caution_acc(&self, dt: f64, speed: f64, curve: &CurveAhead) -> Option<Decision> {
        let safe = curve.max_safe_speed;
        if safe >= speed {
            return None;
        }
        let dist = curve.distance;
        if dist >= (speed - safe) * speed / self.params.normal_decel {
            return None;
        }
        let acc = if dist > 0.0 {
            (safe * safe - speed * speed) / (2.0 * dist)
        } else if dt > 0.0 {
            (safe - speed) / dt
        } else {
            -self.params.normal_decel
        };
        Some(Decision::brake(Behaviour::CurveCaution, acc))
    }

    /// Decides whether to start a lane change this tick, and to which lane.
    ///
    /// # Parameters
    /// * `lane_count` - The number of lanes on the edge.
    /// * `current` - The lane number currently occupied.
    /// * `remaining` - The distance left on the current lane, in m.
    pub(crate) fn choose_lane_change<R: Rng>(
        &self,
        rng: &mut R,
        dt: f64,
        speed: f64,
        lane_count: usize,
        current: usize,
        remaining: f64,
    ) -> Option<usize> {
        let p = &self.params;
        if lane_count < 2 {
            return None;
        }
        let chance = (p.lane_change_rate * dt).clamp(0.0, 1.0);
        if !(chance > 0.0) || !rng.gen_bool(chance) {
            return None;
        }
        if remaining < speed * p.lane_change_duration {
            return None;
        }
        let choice = rng.gen_range(0..lane_count - 1);
        Some(if choice >= current { choice + 1 } else { choice })
    }
}
