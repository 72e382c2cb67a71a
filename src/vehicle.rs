use crate::config::VehicleParams;
use crate::location::Location;
use crate::math::Point2d;
use crate::network::{LaneKind, Network};
use crate::{LaneId, VehicleId};
use log::{debug, warn};

pub use driver::Driver;
pub use lane_change::LaneChange;
pub use search::{LaneSurvey, NearbyVehicle};

pub(crate) mod driver;
mod lane_change;
pub(crate) mod search;

/// Positions within this distance of a lane's end count as past it.
const END_EPS: f64 = 1e-9;

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID
    pub(crate) id: VehicleId,
    /// The driver's behaviour model.
    driver: Driver,
    /// Where the vehicle is.
    location: Location,
    /// The speed in m/s, never negative.
    speed: f64,
    /// The acceleration in m/s<sup>2</sup>.
    acceleration: f64,
    /// The vehicle length in m.
    length: f64,
    /// The vehicle width in m.
    width: f64,
    body_color: String,
    /// Whether the brake lights are on.
    braking: bool,
    lane_change: LaneChange,
}

/// What happened to a vehicle's lane during integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Advance {
    /// Still on the same lane.
    Stayed,
    /// Now on a different lane.
    Moved { from: LaneId },
    /// Drove off the end of a lane with no successor.
    Exited { from: LaneId },
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(
        id: VehicleId,
        driver: Driver,
        params: &VehicleParams,
        location: Location,
        lane_number: usize,
        speed: f64,
        acceleration: f64,
    ) -> Self {
        Self {
            id,
            driver,
            location,
            speed,
            acceleration,
            length: params.length,
            width: params.width,
            body_color: params.body_color.clone(),
            braking: false,
            lane_change: LaneChange::Stable(lane_number),
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub(crate) fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// The vehicle's speed in m/s.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The vehicle's acceleration in m/s<sup>2</sup>.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// The vehicle's length in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The vehicle's width in m.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn body_color(&self) -> &str {
        &self.body_color
    }

    /// Whether the driver is braking.
    pub fn is_braking(&self) -> bool {
        self.braking
    }

    pub fn lane_change(&self) -> LaneChange {
        self.lane_change
    }

    /// The lane number the vehicle occupies, fractional mid lane change.
    pub fn effective_lane_number(&self) -> f64 {
        self.lane_change.effective_lane_number()
    }

    /// The coordinates in world space of the vehicle's reference point.
    pub fn position(&self, network: &Network) -> Point2d {
        let lane = network.lane(self.location.lane);
        let lateral = match lane.kind() {
            LaneKind::Road(road) => {
                let edge = network.edge(road.edge());
                edge.lane_offset(self.effective_lane_number()) - road.offset()
            }
            LaneKind::Junction(_) => 0.0,
        };
        lane.point_at(self.location.u, lateral)
    }

    /// The direction of travel in radians, anticlockwise from the +x axis.
    pub fn heading(&self, network: &Network) -> f64 {
        network.lane(self.location.lane).heading_at(self.location.u)
    }

    pub(crate) fn set_braking(&mut self, braking: bool) {
        self.braking = braking;
    }

    /// Sets the acceleration, limited so that the vehicle will not reverse
    /// within the next `dt` seconds.
    pub(crate) fn set_acceleration(&mut self, acceleration: f64, dt: f64) {
        self.acceleration = if self.speed + acceleration * dt < 0.0 {
            -self.speed / dt
        } else {
            acceleration
        };
    }

    pub(crate) fn start_lane_change(&mut self, to: usize) {
        if let LaneChange::Stable(from) = self.lane_change {
            debug!("vehicle {:?} changing from lane {} to {}", self.id, from, to);
            self.lane_change = LaneChange::start(from, to);
        }
    }

    /// Integrates the vehicle's speed and position, then moves it onto the
    /// next lane for as many lane ends as it passed.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub(crate) fn integrate(&mut self, dt: f64, network: &Network) -> Advance {
        let start_lane = self.location.lane;

        // Perform the integration
        let speed = self.speed + self.acceleration * dt;
        if speed >= 0.0 {
            self.location.u += self.speed * dt + 0.5 * self.acceleration * dt * dt;
            self.speed = speed;
        } else {
            // Stops part way through the step
            self.location.u += self.speed * self.speed / (-2.0 * self.acceleration);
            self.speed = 0.0;
        }

        let mut crossings = 0;
        loop {
            let lane = network.lane(self.location.lane);
            if self.location.u < lane.length() - END_EPS {
                break;
            }
            let Some(next) = lane.default_successor() else {
                return Advance::Exited { from: start_lane };
            };
            if crossings >= network.lane_count() {
                warn!("vehicle {:?} crossed too many lanes in one step", self.id);
                self.location.u = lane.length();
                break;
            }
            self.location = Location::new(next, f64::max(self.location.u - lane.length(), 0.0));
            crossings += 1;
        }

        if crossings > 0 {
            // Entering a new lane abandons any lane change
            let lane_number = network.lane(self.location.lane).lane_number();
            self.lane_change = LaneChange::Stable(lane_number);
        } else if let Some(to) = self
            .lane_change
            .progress(dt, self.driver.params().lane_change_duration)
        {
            let lane = network.lane(self.location.lane);
            if let Some(target) = lane.edge().and_then(|edge| network.edge_lane(edge, to)) {
                let length = network.lane(target).length();
                self.location = Location::new(target, self.location.u.min(length));
            }
        }

        if self.location.lane == start_lane {
            Advance::Stayed
        } else {
            Advance::Moved { from: start_lane }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::DriverParams;
    use crate::network::{EdgeDescription, NetworkDescription};
    use crate::NetworkDefaults;
    use assert_approx_eq::assert_approx_eq;

    fn vehicle(location: Location, speed: f64, acceleration: f64) -> Vehicle {
        Vehicle::new(
            VehicleId::default(),
            Driver::new(DriverParams::default()),
            &VehicleParams::default(),
            location,
            0,
            speed,
            acceleration,
        )
    }

    fn two_roads() -> Network {
        let mut desc = NetworkDescription::new("two roads");
        desc.add_node("a", 0.0, 0.0)
            .add_node("b", 100.0, 0.0)
            .add_node("c", 200.0, 0.0)
            .add_edge(EdgeDescription::new("ab", "a", "b", 1).one_way())
            .add_edge(EdgeDescription::new("bc", "b", "c", 1).one_way());
        Network::build(&desc, &NetworkDefaults::default()).unwrap()
    }

    #[test]
    fn never_reverses() {
        let mut veh = vehicle(Location::new(LaneId::default(), 0.0), 0.0, 0.0);
        veh.set_acceleration(-5.0, 1.0);
        assert_eq!(veh.acceleration(), 0.0);

        let mut veh = vehicle(Location::new(LaneId::default(), 0.0), 4.0, 0.0);
        veh.set_acceleration(-5.0, 1.0);
        assert_approx_eq!(veh.acceleration(), -4.0);
        veh.set_acceleration(-5.0, 0.5);
        assert_approx_eq!(veh.acceleration(), -5.0);
    }

    #[test]
    fn crossing_keeps_the_overshoot() {
        let network = two_roads();
        let ab = network.edge_lane(network.edge_by_name("ab").unwrap(), 0).unwrap();
        let bc = network.edge_lane(network.edge_by_name("bc").unwrap(), 0).unwrap();

        let mut veh = vehicle(Location::new(ab, 99.0), 3.0, 0.0);
        assert_eq!(veh.integrate(1.0, &network), Advance::Moved { from: ab });
        // Through the zero-length junction lane and on to the next road
        assert_eq!(veh.location().lane(), bc);
        assert_approx_eq!(veh.location().u(), 2.0);
        assert_approx_eq!(veh.speed(), 3.0);
    }

    #[test]
    fn exits_without_successor() {
        let network = two_roads();
        let bc = network.edge_lane(network.edge_by_name("bc").unwrap(), 0).unwrap();
        let mut veh = vehicle(Location::new(bc, 98.0), 5.0, 0.0);
        assert_eq!(veh.integrate(1.0, &network), Advance::Exited { from: bc });
    }

    #[test]
    fn stops_part_way_through_step() {
        let network = two_roads();
        let ab = network.edge_lane(network.edge_by_name("ab").unwrap(), 0).unwrap();
        let mut veh = vehicle(Location::new(ab, 10.0), 2.0, -4.0);
        assert_eq!(veh.integrate(1.0, &network), Advance::Stayed);
        assert_eq!(veh.speed(), 0.0);
        assert_approx_eq!(veh.location().u(), 10.5);
    }

    #[test]
    fn position_and_heading() {
        let network = two_roads();
        let ab = network.edge_lane(network.edge_by_name("ab").unwrap(), 0).unwrap();
        let veh = vehicle(Location::new(ab, 10.0), 0.0, 0.0);
        let pos = veh.position(&network);
        assert_approx_eq!(pos.x, 10.0);
        // One-way median of 2.5 m plus half a lane, to the right of travel
        assert_approx_eq!(pos.y, -4.3);
        assert_approx_eq!(veh.heading(&network), 0.0);
    }
}
