//! Cave and dungeon map generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod automata;
pub mod drunk_agent;
pub mod error;
pub mod export;
pub mod generation;
pub mod params;
pub mod tilemap;

pub use error::MapGenError;
pub use generation::{generate, GeneratedMap, Generation, GenerationStep};
pub use params::{AgentParams, AutomataParams, GenerationParams};
pub use tilemap::{Cell, Tilemap};
