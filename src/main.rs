use clap::Parser;

use cave_generator::ascii::{self, AsciiMode};
use cave_generator::export;
use cave_generator::generation::{GeneratedMap, Generation, GenerationStats};
use cave_generator::{GenerationParams, MapGenError};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate cave and dungeon maps with cellular automata and a drunk agent")]
struct Args {
    /// JSON file with generation parameters (flags override its values)
    #[arg(short, long)]
    config: Option<String>,

    /// Width of the map in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Number of automata + agent iterations
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Chance that a cell of the seed map starts as floor (0.0-1.0)
    #[arg(long)]
    fill: Option<f64>,

    /// Neighbor window radius for the automata pass
    #[arg(short = 'r', long)]
    radius: Option<i32>,

    /// Neighbor ratio a cell must exceed to become floor (0.0-1.0)
    #[arg(short = 'u', long)]
    threshold: Option<f64>,

    /// Number of walk phases per agent pass
    #[arg(long)]
    walks: Option<i32>,

    /// Steps per walk phase
    #[arg(long)]
    steps: Option<i32>,

    /// Maximum room width
    #[arg(long)]
    room_width: Option<i32>,

    /// Maximum room height
    #[arg(long)]
    room_height: Option<i32>,

    /// Starting chance of digging a room each step
    #[arg(long)]
    room_chance: Option<f64>,

    /// Room chance added after each step without a room
    #[arg(long)]
    room_chance_step: Option<f64>,

    /// Starting chance of changing direction each step
    #[arg(long)]
    turn_chance: Option<f64>,

    /// Turn chance added after each step without a turn
    #[arg(long)]
    turn_chance_step: Option<f64>,

    /// Walker start X (default: center of map)
    #[arg(long)]
    start_x: Option<i32>,

    /// Walker start Y (default: center of map)
    #[arg(long)]
    start_y: Option<i32>,

    /// Render with '.' and '#' instead of 0 and 1
    #[arg(long)]
    glyphs: bool,

    /// Only print the final map
    #[arg(short, long)]
    quiet: bool,

    /// Export the final map and statistics to a text file
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export the final map to PNG
    #[arg(long)]
    export_png: Option<String>,

    /// Pixels per cell for PNG export
    #[arg(long, default_value = "8")]
    png_scale: u32,
}

impl Args {
    /// Merge config file values, defaults and command line overrides.
    fn params(&self) -> Result<GenerationParams, MapGenError> {
        let mut params = match &self.config {
            Some(path) => GenerationParams::load(path)?,
            None => GenerationParams::default(),
        };

        if let Some(v) = self.width { params.width = v; }
        if let Some(v) = self.height { params.height = v; }
        if let Some(v) = self.iterations { params.iterations = v; }
        if let Some(v) = self.seed { params.seed = Some(v); }
        if let Some(v) = self.fill { params.initial_fill = v; }

        if let Some(v) = self.radius { params.automata.radius = v; }
        if let Some(v) = self.threshold { params.automata.threshold = v; }

        let agent = &mut params.agent;
        if let Some(v) = self.walks { agent.walk_count = v; }
        if let Some(v) = self.steps { agent.steps_per_walk = v; }
        if let Some(v) = self.room_width { agent.room_max_width = v; }
        if let Some(v) = self.room_height { agent.room_max_height = v; }
        if let Some(v) = self.room_chance { agent.room_probability = v; }
        if let Some(v) = self.room_chance_step { agent.room_probability_increment = v; }
        if let Some(v) = self.turn_chance { agent.turn_probability = v; }
        if let Some(v) = self.turn_chance_step { agent.turn_probability_increment = v; }

        if self.start_x.is_some() || self.start_y.is_some() {
            let (cx, cy) = params.start_position();
            params.agent_start = Some((self.start_x.unwrap_or(cx), self.start_y.unwrap_or(cy)));
        }

        Ok(params)
    }

    fn mode(&self) -> AsciiMode {
        if self.glyphs { AsciiMode::Glyphs } else { AsciiMode::Digits }
    }
}

fn run(args: &Args) -> Result<(), MapGenError> {
    let params = args.params()?;
    let mode = args.mode();

    let mut generation = Generation::from_params(&params)?;
    let seed = generation.seed().unwrap_or_default();

    println!("--- CELLULAR AUTOMATA AND DRUNK AGENT SIMULATION ---");
    println!("Generating map with seed: {}", seed);
    println!("Map size: {}x{}", params.width, params.height);
    println!(
        "Automata: radius {}, threshold {:.2} | Agent: {} walks x {} steps, start {:?}",
        params.automata.radius,
        params.automata.threshold,
        params.agent.walk_count,
        params.agent.steps_per_walk,
        generation.walker().position(),
    );

    let initial = generation.current_map().clone();
    if !args.quiet {
        println!("\nInitial map state:");
        ascii::print_grid(&initial, mode);
    }

    let mut stats = GenerationStats::default();
    for step in generation.by_ref() {
        stats.record(&step);

        if !args.quiet {
            println!("\n--- Iteration {} ---", step.iteration);
            println!(
                "Floor: {:.1}% | rooms dug: {} | turns: {} | walker at ({}, {})",
                100.0 * step.map.floor_ratio(),
                step.agent_stats.rooms,
                step.agent_stats.turns,
                step.walker.x,
                step.walker.y,
            );
            ascii::print_grid(&step.map, mode);
        }
    }

    let result = GeneratedMap::from_generation(&generation, &params, initial, stats);

    if args.quiet {
        ascii::print_grid(&result.map, mode);
    }

    println!("\n--- Simulation Finished ---");
    println!(
        "{} iterations, {} agent steps, {} rooms, final floor {:.1}%",
        stats.iterations,
        stats.steps,
        stats.rooms,
        100.0 * result.map.floor_ratio(),
    );

    if let Some(ref path) = args.export_ascii {
        match ascii::export_map_file(&result, path, mode) {
            Ok(()) => println!("Exported map file to: {}", path),
            Err(e) => eprintln!("Failed to export map file: {}", e),
        }
    }

    if let Some(ref path) = args.export_png {
        match export::export_grid_png(&result.map, path, args.png_scale, Some(result.walker)) {
            Ok(()) => println!("Exported map image to: {}", path),
            Err(e) => eprintln!("Failed to export map image: {}", e),
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
