use crate::config::{DriverParams, SimConfig};
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::debug::{debug_behaviour, debug_collision};
use crate::location::Location;
use crate::network::Network;
use crate::vehicle::driver::{CurveAhead, Lead, Situation};
use crate::vehicle::search::{find_nearest_vehicle, survey_nearby_vehicles};
use crate::vehicle::{Advance, Driver, LaneChange, LaneSurvey, Vehicle};
use crate::{EdgeId, VehicleId, VehicleSet};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use smallvec::SmallVec;

/// Something that happened during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    /// A vehicle drove off the end of the network and was removed.
    VehicleRemoved { vehicle: VehicleId, time: f64 },
    /// A vehicle was found closer to the one ahead than that vehicle's length.
    Collision {
        follower: VehicleId,
        leader: VehicleId,
        gap: f64,
        time: f64,
    },
}

/// A traffic simulation.
pub struct Simulation {
    /// The road network.
    network: Network,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    config: SimConfig,
    /// Source of all randomness, seeded from the config.
    rng: StdRng,
    /// The simulated time in s.
    time: f64,
    /// The current frame of simulation.
    frame: usize,
    /// Events not yet collected by [Self::take_events].
    events: Vec<SimEvent>,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Simulation {
    /// Creates a new simulation of the given network.
    pub fn new(network: Network, config: SimConfig) -> Self {
        Self {
            network,
            vehicles: VehicleSet::default(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            time: 0.0,
            frame: 0,
            events: vec![],
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Adds a vehicle to the simulation.
    ///
    /// # Parameters
    /// * `location` - Where to place the vehicle; `u` is clamped to the lane.
    /// * `speed` - The initial speed in m/s.
    /// * `acceleration` - The initial acceleration in m/s<sup>2</sup>.
    ///
    /// Returns `None` if the lane is not part of the network.
    pub fn spawn_vehicle(&mut self, location: Location, speed: f64, acceleration: f64) -> Option<VehicleId> {
        if !self.network.contains_lane(location.lane()) {
            warn!("cannot spawn a vehicle on unknown lane {:?}", location.lane());
            return None;
        }
        let lane = self.network.lane(location.lane());
        let location = Location::new(location.lane(), location.u().clamp(0.0, lane.length()));
        let lane_number = lane.lane_number();
        let driver = self.new_driver();

        let params = &self.config.vehicle;
        let speed = speed.max(0.0);
        let vehicle_id = self.vehicles.insert_with_key(|id| {
            Vehicle::new(id, driver, params, location, lane_number, speed, acceleration)
        });
        self.network.insert_vehicle(location.lane(), vehicle_id);
        Some(vehicle_id)
    }

    /// Adds a stationary vehicle to a lane of an edge, with its front one
    /// vehicle length from the start of the lane.
    pub fn spawn_on_edge(&mut self, edge: EdgeId, lane_number: usize) -> Option<VehicleId> {
        let lane = self.network.edge_lane(edge, lane_number)?;
        let u = self.config.vehicle.length;
        self.spawn_vehicle(Location::new(lane, u), 0.0, 0.0)
    }

    /// Removes a vehicle from the simulation.
    pub fn remove_vehicle(&mut self, id: VehicleId) {
        if let Some(vehicle) = self.vehicles.remove(id) {
            self.network.remove_vehicle(vehicle.location().lane(), id);
        }
    }

    /// Replaces the driver parameters of a vehicle.
    pub fn set_driver_params(&mut self, id: VehicleId, params: DriverParams) {
        if let Some(vehicle) = self.vehicles.get_mut(id) {
            vehicle.driver_mut().set_params(params);
        }
    }

    /// Randomly assigns how far above the speed limit each driver likes to
    /// travel, sampled from a normal distribution centred on the configured
    /// value with standard deviation `stddev`, and never below zero.
    pub fn randomise_over_speed_limits(&mut self, stddev: f64) {
        let mean = self.config.driver.over_speed_limit;
        let Ok(distr) = Normal::new(mean, stddev) else {
            warn!("invalid standard deviation {}", stddev);
            return;
        };
        for vehicle in self.vehicles.values_mut() {
            let over = distr.sample(&mut self.rng).max(0.0);
            vehicle.driver_mut().set_over_speed_limit(over);
        }
    }

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if !(dt > 0.0) {
            warn!("ignoring tick with non-positive time step {}", dt);
            return;
        }
        self.integrate(dt);
        self.time += dt;
        self.apply_accelerations(dt);
        self.calculate_lane_changes(dt);
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }
    }

    /// Gets the simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    /// Drains the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// The nearest vehicle ahead in each lane a vehicle could drive in.
    pub fn survey_nearby_vehicles(&self, vehicle_id: VehicleId) -> SmallVec<[LaneSurvey; 4]> {
        if !self.vehicles.contains_key(vehicle_id) {
            return SmallVec::new();
        }
        survey_nearby_vehicles(&self.network, &self.vehicles, vehicle_id)
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Creates a driver from the configured parameters.
    fn new_driver(&mut self) -> Driver {
        let mut params = self.config.driver;
        if self.config.randomise_normal_acc && params.max_acceleration > 1.0 {
            let distr = Uniform::new_inclusive(1.0, params.max_acceleration);
            params.normal_acc = distr.sample(&mut self.rng);
        }
        Driver::new(params)
    }

    /// Integrates the speeds and positions of all vehicles, then moves
    /// them between lane registers or removes them from the simulation.
    fn integrate(&mut self, dt: f64) {
        let mut moved = vec![];
        let mut exited = vec![];

        for (vehicle_id, vehicle) in &mut self.vehicles {
            match vehicle.integrate(dt, &self.network) {
                Advance::Stayed => {}
                Advance::Moved { from } => moved.push((vehicle_id, from, vehicle.location().lane())),
                Advance::Exited { from } => exited.push((vehicle_id, from)),
            }
        }

        for (vehicle_id, from, to) in moved {
            self.network.remove_vehicle(from, vehicle_id);
            self.network.insert_vehicle(to, vehicle_id);
        }

        for (vehicle_id, from) in exited {
            self.network.remove_vehicle(from, vehicle_id);
            self.vehicles.remove(vehicle_id);
            info!("vehicle {:?} drove off the end of lane {}", vehicle_id, self.network.lane(from).name());
            self.events.push(SimEvent::VehicleRemoved {
                vehicle: vehicle_id,
                time: self.time + dt,
            });
        }
    }

    /// Works out every vehicle's new acceleration against the current state,
    /// then applies them all at once.
    fn apply_accelerations(&mut self, dt: f64) {
        let mut decisions = vec![];

        for (vehicle_id, vehicle) in &self.vehicles {
            let nearest = find_nearest_vehicle(&self.network, &self.vehicles, vehicle_id);
            let situation = Situation {
                speed: vehicle.speed(),
                speed_limit: self
                    .network
                    .speed_limit_at(vehicle.location().lane(), vehicle.effective_lane_number()),
                lead: nearest.map(|n| {
                    let lead = &self.vehicles[n.vehicle];
                    Lead {
                        gap: n.distance,
                        speed: lead.speed(),
                        acceleration: lead.acceleration(),
                        length: lead.length(),
                    }
                }),
                curve: self.curve_ahead(vehicle),
            };
            let decision = vehicle.driver().decide(dt, &situation);
            decisions.push((vehicle_id, decision, nearest));
        }

        for (vehicle_id, decision, nearest) in decisions {
            let vehicle = &mut self.vehicles[vehicle_id];
            vehicle.set_acceleration(decision.acceleration, dt);
            vehicle.set_braking(decision.braking);
            debug_behaviour(decision.behaviour.name(), vehicle_id, vehicle.acceleration());

            if let (true, Some(leader)) = (decision.collision, nearest) {
                warn!(
                    "vehicle {:?} collided with {:?} (gap {:.2} m)",
                    vehicle_id, leader.vehicle, leader.distance
                );
                debug_collision(vehicle_id, leader.vehicle, leader.distance);
                self.events.push(SimEvent::Collision {
                    follower: vehicle_id,
                    leader: leader.vehicle,
                    gap: leader.distance,
                    time: self.time,
                });
            }
        }
    }

    /// The curved junction lane following a vehicle's road lane, if any.
    fn curve_ahead(&self, vehicle: &Vehicle) -> Option<CurveAhead> {
        let location = vehicle.location();
        let lane = self.network.lane(location.lane());
        if lane.is_junction() {
            return None;
        }
        let next = self.network.lane(lane.default_successor()?);
        let arc = next.arc()?;
        Some(CurveAhead {
            distance: lane.length() - location.u(),
            max_safe_speed: arc.max_safe_speed(),
        })
    }

    /// Gives each stable driver on a multi-lane road a chance to start a lane change.
    fn calculate_lane_changes(&mut self, dt: f64) {
        for vehicle in self.vehicles.values_mut() {
            let LaneChange::Stable(current) = vehicle.lane_change() else {
                continue;
            };
            let location = vehicle.location();
            let lane = self.network.lane(location.lane());
            let Some(edge) = lane.edge() else {
                continue;
            };
            let lane_count = self.network.edge(edge).lane_count();
            let remaining = lane.length() - location.u();
            let target = vehicle.driver().choose_lane_change(
                &mut self.rng,
                dt,
                vehicle.speed(),
                lane_count,
                current,
                remaining,
            );
            if let Some(to) = target {
                vehicle.start_lane_change(to);
            }
        }
    }
}
