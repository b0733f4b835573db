//! Profiling tool to compare the cost of the two generation passes

use std::time::{Duration, Instant};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cave_generator::{
    automata, drunk_agent,
    drunk_agent::WalkerState,
    AgentParams, AutomataParams, Tilemap,
};

fn main() {
    let width = 512;
    let height = 256;
    let seed = 1337u64;
    let iterations = 10;

    println!("=== Performance Profiling ===");
    println!("Map size: {}x{} ({} cells)", width, height, width * height);
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut map = match Tilemap::random_fill(width, height, 0.45, &mut rng) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Failed to build seed map: {}", e);
            return;
        }
    };

    let automata_params = AutomataParams::default();
    let agent_params = AgentParams {
        walk_count: 50,
        steps_per_walk: 200,
        room_max_width: 9,
        room_max_height: 7,
        ..Default::default()
    };
    println!("Automata radius: {}", automata_params.radius);
    println!("Agent: {} walks x {} steps", agent_params.walk_count, agent_params.steps_per_walk);
    println!();

    let mut walker = WalkerState::new(width as i32 / 2, height as i32 / 2);
    let mut automata_time = Duration::ZERO;
    let mut agent_time = Duration::ZERO;

    for i in 0..iterations {
        let start = Instant::now();
        let smoothed = match automata::apply_automata(&map, &automata_params) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Automata pass failed: {}", e);
                return;
            }
        };
        let pass_automata = start.elapsed();

        let start = Instant::now();
        let (next, next_walker) =
            match drunk_agent::apply_drunk_agent(&smoothed, &agent_params, walker, &mut rng) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Agent pass failed: {}", e);
                    return;
                }
            };
        let pass_agent = start.elapsed();

        map = next;
        walker = next_walker;
        automata_time += pass_automata;
        agent_time += pass_agent;
        println!(
            "Iteration {:>2}: automata {:?}, agent {:?}, floor {:.1}%",
            i + 1, pass_automata, pass_agent, 100.0 * map.floor_ratio()
        );
    }

    // Summary
    let total = automata_time + agent_time;
    println!("\n=== Summary ===");
    println!("Automata: {:>8.2}% ({:?})", 100.0 * automata_time.as_secs_f64() / total.as_secs_f64(), automata_time);
    println!("Agent:    {:>8.2}% ({:?})", 100.0 * agent_time.as_secs_f64() / total.as_secs_f64(), agent_time);
    println!("─────────────────────────────────");
    println!("TOTAL:    {:>8}  {:?}", "100%", total);
}
