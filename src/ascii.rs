//! ASCII rendering and export module for generated maps
//!
//! Provides functions to render maps as text and export a report file.

use std::fs::File;
use std::io::{self, Write};
use chrono::Local;

use crate::generation::GeneratedMap;
use crate::tilemap::{Cell, Tilemap};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AsciiMode {
    /// Raw occupancy values (`0` / `1`)
    #[default]
    Digits,
    /// Dungeon glyphs (`.` empty, `#` floor)
    Glyphs,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Digits => "Digits",
            AsciiMode::Glyphs => "Glyphs",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Digits, AsciiMode::Glyphs]
    }
}

/// Get ASCII character for a cell
pub fn cell_char(cell: Cell, mode: AsciiMode) -> char {
    match (mode, cell) {
        (AsciiMode::Digits, Cell::Empty) => '0',
        (AsciiMode::Digits, Cell::Floor) => '1',
        (AsciiMode::Glyphs, Cell::Empty) => '.',
        (AsciiMode::Glyphs, Cell::Floor) => '#',
    }
}

/// Render a map to a string: one line per row, cells separated by a space.
pub fn render_grid(map: &Tilemap<Cell>, mode: AsciiMode) -> String {
    let mut result = String::with_capacity(map.width() * 2 * map.height());

    for row in map.rows() {
        for (i, &cell) in row.iter().enumerate() {
            if i > 0 {
                result.push(' ');
            }
            result.push(cell_char(cell, mode));
        }
        result.push('\n');
    }

    result
}

/// Print a map to stdout between banner lines
pub fn print_grid(map: &Tilemap<Cell>, mode: AsciiMode) {
    println!("--- Current Map ---");
    print!("{}", render_grid(map, mode));
    println!("-------------------");
}

/// Generate legend for the given mode
pub fn map_legend(mode: AsciiMode) -> String {
    format!(
        "{} empty    {} floor\n",
        cell_char(Cell::Empty, mode),
        cell_char(Cell::Floor, mode)
    )
}

/// Export a generated map and its statistics to a text file
pub fn export_map_file(result: &GeneratedMap, path: &str, mode: AsciiMode) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_report(&mut file, result, mode)
}

fn write_report<W: Write>(out: &mut W, result: &GeneratedMap, mode: AsciiMode) -> io::Result<()> {
    let map = &result.map;
    let params = &result.params;
    let total = map.width() * map.height();

    // Header
    writeln!(out, "=== CAVE GENERATOR MAP FILE ===")?;
    writeln!(out, "Seed: {}", result.seed)?;
    writeln!(out, "Size: {}x{}", map.width(), map.height())?;
    writeln!(out, "Iterations: {}", result.stats.iterations)?;
    writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    // Parameters
    writeln!(out, "=== PARAMETERS ===")?;
    writeln!(out, "Automata: radius {}, threshold {:.2}", params.automata.radius, params.automata.threshold)?;
    let agent = &params.agent;
    writeln!(out, "Agent: {} walks x {} steps", agent.walk_count, agent.steps_per_walk)?;
    writeln!(out, "  Rooms up to {}x{}", agent.room_max_width, agent.room_max_height)?;
    writeln!(
        out,
        "  Room chance {:.2} (+{:.2}/step), turn chance {:.2} (+{:.2}/step)",
        agent.room_probability, agent.room_probability_increment,
        agent.turn_probability, agent.turn_probability_increment
    )?;
    writeln!(out)?;

    // Map
    writeln!(out, "=== MAP ({}) ===", mode.name())?;
    write!(out, "{}", render_grid(map, mode))?;
    writeln!(out)?;
    write!(out, "{}", map_legend(mode))?;
    writeln!(out)?;

    // Statistics
    let floor = map.floor_count();
    writeln!(out, "=== STATISTICS ===")?;
    writeln!(out, "Total cells: {}", total)?;
    writeln!(out, "Floor: {} ({:.1}%)", floor, 100.0 * floor as f64 / total as f64)?;
    writeln!(out, "Empty: {} ({:.1}%)", total - floor, 100.0 * (total - floor) as f64 / total as f64)?;
    writeln!(out, "Agent steps: {}", result.stats.steps)?;
    writeln!(out, "Rooms dug: {}", result.stats.rooms)?;
    writeln!(out, "Turns: {}", result.stats.turns)?;
    writeln!(out, "Walker ended at: ({}, {})", result.walker.x, result.walker.y)?;

    Ok(())
}
