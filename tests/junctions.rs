//! Tests of junction geometry and of vehicles driving through junctions.

use assert_approx_eq::assert_approx_eq;
use std::f64::consts::FRAC_PI_2;
use traffic_micro::{
    build_network, EdgeDescription, LaneChange, Location, Network, NetworkDefaults,
    NetworkDescription, RouteRole, SimConfig, Simulation,
};

/// a -> b heading +x, then b -> c turning right to head -y.
fn right_turn() -> Network {
    let mut desc = NetworkDescription::new("right turn");
    desc.add_node("a", 0.0, 0.0)
        .add_node("b", 100.0, 0.0)
        .add_node("c", 100.0, -100.0)
        .add_edge(EdgeDescription::new("ab", "a", "b", 2).one_way())
        .add_edge(EdgeDescription::new("bc", "b", "c", 2).one_way());
    build_network(&desc, &NetworkDefaults::default()).unwrap()
}

#[test]
fn one_in_one_out_connects_every_lane() {
    let mut desc = NetworkDescription::new("straight");
    desc.add_node("a", 0.0, 0.0)
        .add_node("b", 100.0, 0.0)
        .add_node("c", 200.0, 0.0)
        .add_edge(EdgeDescription::new("ab", "a", "b", 3))
        .add_edge(EdgeDescription::new("bc", "b", "c", 3));
    let network = build_network(&desc, &NetworkDefaults::default()).unwrap();

    let ab = network.edge(network.edge_by_name("ab").unwrap());
    let bc = network.edge(network.edge_by_name("bc").unwrap());
    let b = network.node(network.node_by_name("b").unwrap());
    assert_eq!(b.junction_lanes().len(), 3);
    assert_eq!(ab.route_roles()[&bc.id()], RouteRole::Straight);

    for (lane_in, lane_out) in ab.lanes().iter().zip(bc.lanes()) {
        let junction = network.lane(*lane_in).default_successor().unwrap();
        let junction = network.lane(junction);
        assert_eq!(junction.route_role(), Some(RouteRole::Straight));
        assert!(junction.arc().is_none());
        assert_eq!(junction.default_successor(), Some(*lane_out));
        assert_eq!(junction.default_predecessor(), Some(*lane_in));
        assert_eq!(network.lane(*lane_out).default_predecessor(), Some(junction.id()));
    }
}

#[test]
fn right_angle_right_turn() {
    let network = right_turn();
    let ab = network.edge(network.edge_by_name("ab").unwrap());
    let bc = network.edge(network.edge_by_name("bc").unwrap());
    assert_eq!(ab.route_roles()[&bc.id()], RouteRole::Right);
    assert_eq!(ab.default_successor(), Some(bc.id()));

    // A quarter turn trims by the full road width
    assert_approx_eq!(ab.width(), 12.2);
    assert_approx_eq!(ab.out_reduction(), 12.2);
    assert_approx_eq!(bc.in_reduction(), 12.2);
    assert_approx_eq!(network.lane(ab.lanes()[0]).length(), 87.8);

    let b = network.node(network.node_by_name("b").unwrap());
    assert_eq!(b.junction_lanes().len(), 2);
    for id in b.junction_lanes() {
        let lane = network.lane(*id);
        assert_eq!(lane.route_role(), Some(RouteRole::Right));
        let arc = lane.arc().unwrap();
        assert_approx_eq!(arc.sweep(), -FRAC_PI_2);
        assert!(arc.max_safe_speed().is_finite());

        let radius = arc.radius().x.hypot(arc.radius().y);
        assert_approx_eq!(lane.length(), radius * FRAC_PI_2);
        let chord = (lane.end() - lane.start()).x.hypot((lane.end() - lane.start()).y);
        assert!(lane.length() > chord);

        // Both ends of the arc sit on the road lanes they join
        let start = lane.point_at(0.0, 0.0);
        let end = lane.point_at(lane.length(), 0.0);
        assert_approx_eq!(start.x, lane.start().x);
        assert_approx_eq!(start.y, lane.start().y);
        assert_approx_eq!(end.x, lane.end().x);
        assert_approx_eq!(end.y, lane.end().y);
    }
}

#[test]
fn reductions_stay_within_edges() {
    let desc = NetworkDescription::grid(4, 3, 100.0);
    let network = build_network(&desc, &NetworkDefaults::default()).unwrap();
    assert_eq!(network.iter_edges().count(), 17);

    for node in network.iter_nodes() {
        for reduction in node.reductions() {
            assert!(reduction.amount >= 0.0);
        }
    }
    for edge in network.iter_edges() {
        assert!(edge.in_reduction() >= 0.0 && edge.in_reduction() <= edge.length());
        assert!(edge.out_reduction() >= 0.0 && edge.out_reduction() <= edge.length());
        for lane in edge.lanes() {
            assert!(network.lane(*lane).length() <= edge.length());
        }
    }
}

#[test]
fn grid_turns_follow_lane_rules() {
    let desc = NetworkDescription::grid(3, 3, 100.0);
    let network = build_network(&desc, &NetworkDefaults::default()).unwrap();
    // The centre node has two roads in and two out
    let centre = network.node(network.node_by_name("4").unwrap());
    for id in centre.junction_lanes() {
        let lane = network.lane(*id);
        match lane.route_role().unwrap() {
            RouteRole::Straight => {}
            RouteRole::Left => assert_eq!(lane.lane_number(), 0),
            RouteRole::Right => assert_eq!(lane.lane_number(), 1),
            RouteRole::UTurn => panic!("grid has no u-turns"),
        }
    }
    // Both lanes straight on from each road, one left and one right
    assert_eq!(centre.junction_lanes().len(), 6);
}

#[test]
fn slows_for_tight_turn() {
    let mut sim = Simulation::new(right_turn(), SimConfig::default());
    let network = sim.network();
    let lane = network.edge_lane(network.edge_by_name("ab").unwrap(), 1).unwrap();
    let veh = sim.spawn_vehicle(Location::new(lane, 70.0), 12.0, 0.0).unwrap();
    sim.tick(0.1);

    let vehicle = sim.get_vehicle(veh).unwrap();
    assert!(vehicle.acceleration() < 0.0);
    assert!(vehicle.is_braking());
}

#[test]
fn drives_round_the_corner() {
    let mut sim = Simulation::new(right_turn(), SimConfig::default());
    let network = sim.network();
    let bc = network.edge_by_name("bc").unwrap();
    let lane = network.edge_lane(network.edge_by_name("ab").unwrap(), 1).unwrap();
    let veh = sim.spawn_vehicle(Location::new(lane, 60.0), 5.0, 0.0).unwrap();

    let mut on_bc = false;
    for _ in 0..200 {
        sim.tick(0.1);
        let Some(vehicle) = sim.get_vehicle(veh) else {
            break;
        };
        assert!(vehicle.speed() >= 0.0);
        if sim.network().lane(vehicle.location().lane()).edge() == Some(bc) {
            on_bc = true;
            assert_approx_eq!(vehicle.heading(sim.network()), -FRAC_PI_2);
            break;
        }
    }
    assert!(on_bc);
}

#[test]
fn survey_is_idempotent() {
    let mut sim = Simulation::new(right_turn(), SimConfig::default());
    let network = sim.network();
    let ab = network.edge_by_name("ab").unwrap();
    let lanes = network.edge(ab).lanes().to_vec();
    let me = sim.spawn_vehicle(Location::new(lanes[0], 10.0), 0.0, 0.0).unwrap();
    let left = sim.spawn_vehicle(Location::new(lanes[0], 40.0), 0.0, 0.0).unwrap();
    let right = sim.spawn_vehicle(Location::new(lanes[1], 25.0), 0.0, 0.0).unwrap();

    let survey = sim.survey_nearby_vehicles(me);
    assert_eq!(survey, sim.survey_nearby_vehicles(me));
    assert_eq!(survey.len(), 2);
    assert_eq!(survey[0].lane_number, 0);
    assert_eq!(survey[0].nearest.unwrap().vehicle, left);
    assert_approx_eq!(survey[0].nearest.unwrap().distance, 30.0);
    assert_eq!(survey[1].nearest.unwrap().vehicle, right);
    assert_approx_eq!(survey[1].nearest.unwrap().distance, 15.0);
    assert!(matches!(sim.get_vehicle(me).unwrap().lane_change(), LaneChange::Stable(0)));
}

#[test]
fn lane_change_moves_between_lanes() {
    let mut desc = NetworkDescription::new("long road");
    desc.add_node("a", 0.0, 0.0)
        .add_node("b", 1000.0, 0.0)
        .add_edge(EdgeDescription::new("ab", "a", "b", 2).one_way());
    let network = build_network(&desc, &NetworkDefaults::default()).unwrap();
    let mut config = SimConfig::default();
    config.driver.lane_change_rate = 1000.0;
    let mut sim = Simulation::new(network, config);

    let ab = sim.network().edge_by_name("ab").unwrap();
    let veh = sim.spawn_on_edge(ab, 1).unwrap();
    sim.tick(0.1);
    assert_eq!(
        sim.get_vehicle(veh).unwrap().lane_change(),
        LaneChange::Changing { from: 1, to: 0, effective: 1.0 }
    );

    // Three seconds to move over
    for _ in 0..30 {
        sim.tick(0.1);
        let effective = sim.get_vehicle(veh).unwrap().effective_lane_number();
        assert!((0.0..=1.0).contains(&effective));
    }
    let vehicle = sim.get_vehicle(veh).unwrap();
    let lane = sim.network().lane(vehicle.location().lane());
    assert_eq!(lane.lane_number(), 0);
    assert_eq!(lane.vehicles(), &[veh]);
}
