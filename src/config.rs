//! Tunable constants for networks, drivers and vehicles.
//!
//! The simulation never reads a configuration file itself; an embedding
//! application fills these structs in (or deserializes them with the
//! `serde` feature) and hands them to [`Network::build`](crate::Network::build)
//! and [`Simulation::new`](crate::Simulation::new).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defaults used when a network description omits a value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NetworkDefaults {
    /// Speed limit in m/s, just under 25 mph.
    pub speed_limit: f64,
    /// Width of a single lane in m.
    pub lane_width: f64,
    /// Width of the median of a two-way road in m. This is half the
    /// total median, since each direction is its own edge.
    pub median_width: f64,
    /// Width of the shoulder (parking area) in m.
    pub shoulder_width: f64,
    pub median_color: String,
    pub shoulder_color: String,
    pub lane_color: String,
    /// The largest lateral acceleration drivers accept in a turn, in m/s<sup>2</sup>.
    pub max_transverse_acceleration: f64,
}

impl Default for NetworkDefaults {
    fn default() -> Self {
        Self {
            speed_limit: 11.0,
            lane_width: 3.6,
            median_width: 1.0,
            shoulder_width: 2.5,
            median_color: "#c4c4c4".into(),
            shoulder_color: "#c4c4c4".into(),
            lane_color: "#cccccc".into(),
            max_transverse_acceleration: 3.0,
        }
    }
}

/// The behavioural parameters of a driver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DriverParams {
    /// The furthest distance ahead the driver looks for other vehicles, in m.
    pub look_ahead: f64,
    /// The desired following time gap in s.
    pub tau: f64,
    /// The upper bound of the comfortable acceleration, in m/s<sup>2</sup>.
    pub max_acceleration: f64,
    /// The comfortable acceleration in m/s<sup>2</sup>.
    pub normal_acc: f64,
    /// The comfortable deceleration, a positive number in m/s<sup>2</sup>.
    pub normal_decel: f64,
    /// The acceleration used to drift back down to the desired speed, a negative number.
    pub coast_acc: f64,
    /// How far above the speed limit the driver likes to travel, in m/s.
    pub over_speed_limit: f64,
    /// How many m/s above the desired speed is still acceptable.
    pub speed_zone_width: f64,
    /// The time taken to move over by a lane, in s.
    pub lane_change_duration: f64,
    /// The rate of spontaneous lane changes, per second, counted only while
    /// there is room left on the lane to finish the change.
    pub lane_change_rate: f64,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            look_ahead: 300.0,
            tau: 3.0,
            max_acceleration: 2.0,
            normal_acc: 1.5,
            normal_decel: 2.0,
            coast_acc: -0.5,
            over_speed_limit: 2.0,
            speed_zone_width: 1.0,
            lane_change_duration: 3.0,
            lane_change_rate: 0.02,
        }
    }
}

/// The physical attributes of a vehicle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VehicleParams {
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
    pub body_color: String,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            length: 4.6,
            width: 1.9,
            body_color: "#5588cc".into(),
        }
    }
}

/// The configuration of a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SimConfig {
    /// Parameters given to the driver of each new vehicle.
    pub driver: DriverParams,
    /// Attributes of each new vehicle.
    pub vehicle: VehicleParams,
    /// Whether each new driver samples its comfortable acceleration
    /// uniformly between 1 m/s<sup>2</sup> and `driver.max_acceleration`.
    pub randomise_normal_acc: bool,
    /// Seed for the simulation's random number generator.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            driver: DriverParams::default(),
            vehicle: VehicleParams::default(),
            randomise_normal_acc: true,
            seed: 0,
        }
    }
}
