//! Error type shared by the grid, the generation passes and the driver.

/// Errors that can occur while configuring or running map generation.
///
/// Everything except `Io` and `Config` is a precondition violation: it is
/// detected before a pass writes its output, so no partially generated map
/// is ever returned.
#[derive(Debug)]
pub enum MapGenError {
    /// Grid width or height is zero
    InvalidDimension { width: usize, height: usize },
    /// Coordinate lies outside the grid
    OutOfBounds { x: i64, y: i64, width: usize, height: usize },
    /// Neighborhood radius below 1
    InvalidRadius(i32),
    /// Occupancy threshold outside [0, 1]
    InvalidThreshold(f64),
    /// Negative number of walk phases
    InvalidWalkCount(i32),
    /// Negative number of steps per walk phase
    InvalidStepCount(i32),
    /// A configured probability (or increment) outside [0, 1]
    InvalidProbability { name: &'static str, value: f64 },
    /// Maximum room width or height below the minimum room size of 2
    InvalidRoomSize { max_width: i32, max_height: i32 },
    /// IO error while reading a config or writing an export
    Io(std::io::Error),
    /// Config file could not be parsed
    Config(String),
}

impl std::fmt::Display for MapGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapGenError::InvalidDimension { width, height } => {
                write!(f, "Invalid map dimensions {}x{} (both must be positive)", width, height)
            }
            MapGenError::OutOfBounds { x, y, width, height } => {
                write!(f, "Cell ({}, {}) is outside the {}x{} map", x, y, width, height)
            }
            MapGenError::InvalidRadius(r) => {
                write!(f, "Invalid neighborhood radius {} (must be at least 1)", r)
            }
            MapGenError::InvalidThreshold(u) => {
                write!(f, "Invalid occupancy threshold {} (must be within 0.0-1.0)", u)
            }
            MapGenError::InvalidWalkCount(j) => {
                write!(f, "Invalid walk count {} (must not be negative)", j)
            }
            MapGenError::InvalidStepCount(i) => {
                write!(f, "Invalid step count {} (must not be negative)", i)
            }
            MapGenError::InvalidProbability { name, value } => {
                write!(f, "Invalid probability {} = {} (must be within 0.0-1.0)", name, value)
            }
            MapGenError::InvalidRoomSize { max_width, max_height } => {
                write!(
                    f,
                    "Invalid maximum room size {}x{} (both must be at least 2)",
                    max_width, max_height
                )
            }
            MapGenError::Io(e) => write!(f, "IO error: {}", e),
            MapGenError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for MapGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapGenError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MapGenError {
    fn from(e: std::io::Error) -> Self {
        MapGenError::Io(e)
    }
}

impl From<serde_json::Error> for MapGenError {
    fn from(e: serde_json::Error) -> Self {
        MapGenError::Config(e.to_string())
    }
}
