use crate::VehicleId;
#[cfg(feature = "debug")]
use serde_json::json;
#[cfg(feature = "debug")]
use slotmap::Key;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

/// Records the behaviour that determined a vehicle's acceleration.
#[allow(unused)]
pub fn debug_behaviour(name: &str, vehicle: VehicleId, acceleration: f64) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "behaviour",
            "name": name,
            "vehicle": vehicle.data().as_ffi(),
            "acceleration": acceleration,
        }))
    })
}

#[allow(unused)]
pub fn debug_collision(follower: VehicleId, leader: VehicleId, gap: f64) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "collision",
            "follower": follower.data().as_ffi(),
            "leader": leader.data().as_ffi(),
            "gap": gap,
        }))
    })
}

#[cfg(feature = "debug")]
pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
