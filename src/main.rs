use std::time::Instant;

use traffic_micro::{build_network, NetworkDefaults, NetworkDescription, SimConfig, Simulation};

fn main() {
    let desc = NetworkDescription::grid(6, 6, 120.0);
    let network = match build_network(&desc, &NetworkDefaults::default()) {
        Ok(network) => network,
        Err(err) => {
            eprintln!("failed to build {}: {}", desc.name, err);
            std::process::exit(1);
        }
    };

    let edges = network.iter_edges().map(|e| e.id()).collect::<Vec<_>>();
    let mut sim = Simulation::new(network, SimConfig::default());
    for edge in edges {
        for lane_number in 0..2 {
            sim.spawn_on_edge(edge, lane_number);
        }
    }
    sim.randomise_over_speed_limits(1.0);

    println!("Simulating {} vehicles...", sim.iter_vehicles().count());
    const NUM_FRAMES: u32 = 1000;
    const DT: f64 = 0.05;
    for _ in 0..5 {
        let start = Instant::now();
        for _ in 0..NUM_FRAMES {
            sim.tick(DT);
        }
        let frame = start.elapsed() / NUM_FRAMES;
        let events = sim.take_events().len();
        println!(
            "Avg. frame: {:?} --> {:.0}x speedup ({} vehs, {} events, t = {:.0} s)",
            frame,
            DT / frame.as_secs_f64(),
            sim.iter_vehicles().count(),
            events,
            sim.time(),
        );
    }
}
