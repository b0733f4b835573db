//! Generation parameters and configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapGenError;

/// Cellular automata smoothing parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomataParams {
    /// Radius of the neighbor window (1 = 3x3, 2 = 5x5, ...)
    pub radius: i32,
    /// Neighbor ratio a cell must strictly exceed to become Floor (0.0-1.0)
    pub threshold: f64,
}

impl Default for AutomataParams {
    fn default() -> Self {
        Self {
            radius: 1,
            threshold: 0.5,
        }
    }
}

impl AutomataParams {
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.radius < 1 {
            return Err(MapGenError::InvalidRadius(self.radius));
        }
        // NaN fails the range check as well
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(MapGenError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Drunk agent random walk parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    // =========================================================================
    // Walk
    // =========================================================================

    /// Number of walk phases per pass
    pub walk_count: i32,
    /// Steps taken in each walk phase
    pub steps_per_walk: i32,

    // =========================================================================
    // Rooms
    // =========================================================================

    /// Maximum room width (rooms are at least 2 wide)
    pub room_max_width: i32,
    /// Maximum room height (rooms are at least 2 tall)
    pub room_max_height: i32,
    /// Chance of digging a room on the first step of a pass
    pub room_probability: f64,
    /// Added to the room chance after every step without a room
    pub room_probability_increment: f64,

    // =========================================================================
    // Turning
    // =========================================================================

    /// Chance of picking a new direction on the first step of a pass
    pub turn_probability: f64,
    /// Added to the turn chance after every step without a turn
    pub turn_probability_increment: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            walk_count: 5,
            steps_per_walk: 10,
            room_max_width: 5,
            room_max_height: 3,
            room_probability: 0.1,
            room_probability_increment: 0.05,
            turn_probability: 0.2,
            turn_probability_increment: 0.03,
        }
    }
}

impl AgentParams {
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.walk_count < 0 {
            return Err(MapGenError::InvalidWalkCount(self.walk_count));
        }
        if self.steps_per_walk < 0 {
            return Err(MapGenError::InvalidStepCount(self.steps_per_walk));
        }
        if self.room_max_width < 2 || self.room_max_height < 2 {
            return Err(MapGenError::InvalidRoomSize {
                max_width: self.room_max_width,
                max_height: self.room_max_height,
            });
        }
        for (name, value) in [
            ("room_probability", self.room_probability),
            ("room_probability_increment", self.room_probability_increment),
            ("turn_probability", self.turn_probability),
            ("turn_probability_increment", self.turn_probability_increment),
        ] {
            validate_probability(name, value)?;
        }
        Ok(())
    }
}

/// Full configuration for a generation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Map width in cells
    pub width: usize,
    /// Map height in cells
    pub height: usize,
    /// Number of automata + agent iterations
    pub iterations: usize,
    /// Random seed (random if not specified)
    pub seed: Option<u64>,
    /// Chance that a seed cell starts as Floor (0.0 = empty seed map)
    pub initial_fill: f64,
    /// Walker start position (map center if not specified)
    pub agent_start: Option<(i32, i32)>,
    pub automata: AutomataParams,
    pub agent: AgentParams,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 20,
            height: 10,
            iterations: 5,
            seed: None,
            initial_fill: 0.0,
            agent_start: None,
            automata: AutomataParams::default(),
            agent: AgentParams::default(),
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapGenError::InvalidDimension { width: self.width, height: self.height });
        }
        validate_probability("initial_fill", self.initial_fill)?;
        self.automata.validate()?;
        self.agent.validate()
    }

    /// Walker start position, defaulting to the map center.
    pub fn start_position(&self) -> (i32, i32) {
        self.agent_start
            .unwrap_or((self.width as i32 / 2, self.height as i32 / 2))
    }

    pub fn from_json(json: &str) -> Result<Self, MapGenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapGenError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, MapGenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn validate_probability(name: &'static str, value: f64) -> Result<(), MapGenError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MapGenError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = GenerationParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.start_position(), (10, 5));
    }

    #[test]
    fn test_default_start_is_inside_narrow_maps() {
        // x comes from the width and y from the height, never the other way round
        for (width, height) in [(20, 10), (10, 20), (3, 41), (41, 3), (1, 1)] {
            let params = GenerationParams { width, height, ..Default::default() };
            let (x, y) = params.start_position();
            assert_eq!((x, y), (width as i32 / 2, height as i32 / 2));
            assert!(x >= 0 && (x as usize) < width);
            assert!(y >= 0 && (y as usize) < height);
        }
    }

    #[test]
    fn test_automata_validation() {
        let mut params = AutomataParams::default();
        params.radius = 0;
        assert!(matches!(params.validate(), Err(MapGenError::InvalidRadius(0))));

        params.radius = 2;
        params.threshold = 1.01;
        assert!(matches!(params.validate(), Err(MapGenError::InvalidThreshold(_))));

        params.threshold = f64::NAN;
        assert!(params.validate().is_err());

        params.threshold = 1.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_agent_validation() {
        let mut params = AgentParams::default();
        params.walk_count = 0;
        params.steps_per_walk = 0;
        assert!(params.validate().is_ok());

        params.walk_count = -1;
        assert!(matches!(params.validate(), Err(MapGenError::InvalidWalkCount(-1))));

        params.walk_count = 1;
        params.steps_per_walk = -3;
        assert!(matches!(params.validate(), Err(MapGenError::InvalidStepCount(-3))));

        params.steps_per_walk = 1;
        params.room_max_height = 1;
        assert!(matches!(params.validate(), Err(MapGenError::InvalidRoomSize { .. })));

        params.room_max_height = 2;
        params.turn_probability_increment = -0.1;
        assert!(matches!(
            params.validate(),
            Err(MapGenError::InvalidProbability { name: "turn_probability_increment", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = GenerationParams::from_json(
            r#"{ "width": 40, "seed": 99, "automata": { "threshold": 0.4 } }"#,
        )
        .unwrap();
        assert_eq!(params.width, 40);
        assert_eq!(params.height, 10);
        assert_eq!(params.seed, Some(99));
        assert_eq!(params.automata.radius, 1);
        assert!((params.automata.threshold - 0.4).abs() < 1e-9);
        assert_eq!(params.agent, AgentParams::default());
    }

    #[test]
    fn test_json_round_trip_and_bad_input() {
        let params = GenerationParams {
            agent_start: Some((3, 4)),
            ..Default::default()
        };
        let json = params.to_json().unwrap();
        assert_eq!(GenerationParams::from_json(&json).unwrap(), params);

        assert!(matches!(
            GenerationParams::from_json("{ width: }"),
            Err(MapGenError::Config(_))
        ));
    }
}
