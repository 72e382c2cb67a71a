//! Tests that involve vehicles on a straight run of single-lane roads.

use assert_approx_eq::assert_approx_eq;
use traffic_micro::{
    build_network, EdgeDescription, Location, Network, NetworkDefaults, NetworkDescription,
    SimConfig, SimEvent, Simulation,
};

/// Two 100 m one-way roads end to end: a -> b -> c.
fn straight_road() -> Network {
    let mut desc = NetworkDescription::new("straight road");
    desc.add_node("a", 0.0, 0.0)
        .add_node("b", 100.0, 0.0)
        .add_node("c", 200.0, 0.0)
        .add_edge(EdgeDescription::new("ab", "a", "b", 1).one_way())
        .add_edge(EdgeDescription::new("bc", "b", "c", 1).one_way());
    build_network(&desc, &NetworkDefaults::default()).unwrap()
}

fn lane(sim: &Simulation, edge: &str) -> traffic_micro::LaneId {
    let network = sim.network();
    network.edge_lane(network.edge_by_name(edge).unwrap(), 0).unwrap()
}

/// Test that a vehicle's position increases monotonically.
#[test]
fn vehicle_drives_forward() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let ab = sim.network().edge_by_name("ab").unwrap();
    let veh = sim.spawn_on_edge(ab, 0).unwrap();
    assert_approx_eq!(sim.get_vehicle(veh).unwrap().location().u(), 4.6);

    // The first tick only picks an acceleration
    sim.tick(0.1);
    let mut pos = sim.get_vehicle(veh).unwrap().location().u();
    for _ in 0..50 {
        sim.tick(0.1);
        let next_pos = sim.get_vehicle(veh).unwrap().location().u();
        assert!(next_pos > pos);
        pos = next_pos;
    }
    assert_approx_eq!(sim.time(), 5.1);
    assert_eq!(sim.frame(), 51);
}

/// Test that a vehicle never exceeds the speed limit by more than the driver allows.
#[test]
fn vehicle_settles_near_speed_limit() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let ab = lane(&sim, "ab");
    let veh = sim.spawn_vehicle(Location::new(ab, 0.0), 0.0, 0.0).unwrap();
    for _ in 0..80 {
        sim.tick(0.1);
        let speed = sim.get_vehicle(veh).unwrap().speed();
        assert!(speed <= 11.0 + 2.0 + 1e-9);
    }
}

#[test]
fn crossing_a_junction_is_lossless() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let (ab, bc) = (lane(&sim, "ab"), lane(&sim, "bc"));
    let veh = sim.spawn_vehicle(Location::new(ab, 99.0), 3.0, 0.0).unwrap();
    sim.tick(1.0);

    let vehicle = sim.get_vehicle(veh).unwrap();
    assert_eq!(vehicle.location().lane(), bc);
    assert_approx_eq!(vehicle.location().u(), 2.0);
    assert!(sim.network().lane(ab).vehicles().is_empty());
    assert_eq!(sim.network().lane(bc).vehicles(), &[veh]);
}

#[test]
fn exit_removes_vehicle_once() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let bc = lane(&sim, "bc");
    let veh = sim.spawn_vehicle(Location::new(bc, 95.0), 10.0, 0.0).unwrap();
    sim.tick(1.0);

    assert!(sim.get_vehicle(veh).is_none());
    assert!(sim.network().lane(bc).vehicles().is_empty());
    assert_eq!(
        sim.take_events(),
        vec![SimEvent::VehicleRemoved { vehicle: veh, time: 1.0 }]
    );

    sim.tick(1.0);
    assert!(sim.take_events().is_empty());
    assert_eq!(sim.iter_vehicles().count(), 0);
}

#[test]
fn follower_brakes_behind_stopped_vehicle() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let ab = lane(&sim, "ab");
    let follower = sim.spawn_vehicle(Location::new(ab, 10.0), 10.0, 0.0).unwrap();
    let leader = sim.spawn_vehicle(Location::new(ab, 20.0), 0.0, 0.0).unwrap();
    sim.tick(0.1);

    let vehicle = sim.get_vehicle(follower).unwrap();
    assert!(vehicle.acceleration() < 0.0);
    assert!(vehicle.is_braking());
    assert!(!sim.get_vehicle(leader).unwrap().is_braking());
    assert!(sim.take_events().is_empty());
}

#[test]
fn overlapping_vehicles_collide() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let ab = lane(&sim, "ab");
    let follower = sim.spawn_vehicle(Location::new(ab, 10.0), 0.0, 0.0).unwrap();
    let leader = sim.spawn_vehicle(Location::new(ab, 13.0), 0.0, 0.0).unwrap();
    sim.tick(0.1);

    let events = sim.take_events();
    assert_eq!(events.len(), 1);
    match events[0] {
        SimEvent::Collision { follower: f, leader: l, gap, .. } => {
            assert_eq!((f, l), (follower, leader));
            assert_approx_eq!(gap, 3.0);
        }
        other => panic!("unexpected event {:?}", other),
    }
    // Stationary, so it cannot brake any harder
    assert_eq!(sim.get_vehicle(follower).unwrap().acceleration(), 0.0);
}

#[test]
fn invalid_time_step_is_ignored() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let ab = lane(&sim, "ab");
    let veh = sim.spawn_vehicle(Location::new(ab, 10.0), 5.0, 0.0).unwrap();
    sim.tick(0.0);
    sim.tick(-1.0);
    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.get_vehicle(veh).unwrap().location().u(), 10.0);
}

#[test]
fn removed_vehicle_leaves_lane() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let ab = lane(&sim, "ab");
    let veh = sim.spawn_vehicle(Location::new(ab, 10.0), 5.0, 0.0).unwrap();
    sim.remove_vehicle(veh);
    sim.remove_vehicle(veh);
    assert!(sim.network().lane(ab).vehicles().is_empty());
    assert!(sim.take_events().is_empty());
}

#[test]
fn spawning_on_unknown_lane_fails() {
    let mut sim = Simulation::new(straight_road(), SimConfig::default());
    let unknown = traffic_micro::LaneId::default();
    assert!(!sim.network().contains_lane(unknown));
    assert_eq!(sim.spawn_vehicle(Location::new(unknown, 0.0), 0.0, 0.0), None);
    assert_eq!(sim.iter_vehicles().count(), 0);
}
