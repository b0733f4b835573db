//! Drunk agent random walk pass
//!
//! A single walker stumbles across the map marking every cell it visits as
//! Floor. Each step it may dig a rectangular room around itself and may pick
//! a new direction. Both chances grow every step they fail and drop back to
//! a fixed baseline once they fire; they are never capped, so after enough
//! failures a roll is certain to succeed.

use rand::Rng;

use crate::error::MapGenError;
use crate::params::AgentParams;
use crate::tilemap::{Cell, Tilemap};

/// Room chance after a room has been dug.
///
/// This is a fixed baseline, not the configured starting chance.
pub const ROOM_PROBABILITY_RESET: f64 = 0.1;

/// Turn chance after the walker has changed direction.
pub const TURN_PROBABILITY_RESET: f64 = 0.2;

/// Smallest room edge length the room roll can produce.
pub const MIN_ROOM_SIZE: i32 = 2;

/// Axis-aligned movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    East,
    West,
    South,
    North,
}

impl Direction {
    /// All directions, in the order the turn roll picks from.
    pub const ALL: [Direction; 4] = [Direction::East, Direction::West, Direction::South, Direction::North];

    /// Movement offset (dx, dy); y grows downwards.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Walker position, carried from one pass to the next.
///
/// The heading is not part of it: every pass starts heading East.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WalkerState {
    pub x: i32,
    pub y: i32,
}

impl WalkerState {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn is_inside(&self, map: &Tilemap<Cell>) -> bool {
        map.contains(self.x as i64, self.y as i64)
    }
}

/// Clipped rectangle of cells actually written by [`dig_room`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl RoomRect {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Dig a room of random size centered on `(cx, cy)`.
///
/// Width and height are rolled in `[2, max]`. The room spans `size / 2`
/// cells either side of the center, so odd and even rolls of the same half
/// produce the same footprint. Cells beyond the map edge are skipped.
/// Returns the written rectangle, or `None` when it lies entirely off the map.
pub fn dig_room<R: Rng>(
    map: &mut Tilemap<Cell>,
    cx: i32,
    cy: i32,
    max_width: i32,
    max_height: i32,
    rng: &mut R,
) -> Option<RoomRect> {
    let room_w = rng.gen_range(MIN_ROOM_SIZE..=max_width.max(MIN_ROOM_SIZE));
    let room_h = rng.gen_range(MIN_ROOM_SIZE..=max_height.max(MIN_ROOM_SIZE));

    let (cx, cy) = (cx as i64, cy as i64);
    let (half_w, half_h) = ((room_w / 2) as i64, (room_h / 2) as i64);

    let x0 = (cx - half_w).max(0);
    let y0 = (cy - half_h).max(0);
    let x1 = (cx + half_w).min(map.width() as i64 - 1);
    let y1 = (cy + half_h).min(map.height() as i64 - 1);

    if x0 > x1 || y0 > y1 {
        return None;
    }

    for y in y0..=y1 {
        for x in x0..=x1 {
            map.set_clipped(x, y, Cell::Floor);
        }
    }

    Some(RoomRect {
        x: x0 as usize,
        y: y0 as usize,
        width: (x1 - x0 + 1) as usize,
        height: (y1 - y0 + 1) as usize,
    })
}

/// What happened during a single walker step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Cell marked as Floor (the walker position before moving)
    pub marked: (usize, usize),
    /// Room dug this step, if any
    pub room: Option<RoomRect>,
    /// Whether the walker picked a new direction this step
    pub turned: bool,
}

/// Summary of an agent pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgentStats {
    pub steps: usize,
    pub rooms: usize,
    pub turns: usize,
    /// Phases that ended early because the walker was off the map
    pub phases_cut_short: usize,
}

/// Walker plus the heading and running room and turn chances of one pass.
pub struct DrunkAgent<'a> {
    params: &'a AgentParams,
    walker: WalkerState,
    direction: Direction,
    room_probability: f64,
    turn_probability: f64,
    stats: AgentStats,
}

impl<'a> DrunkAgent<'a> {
    /// Start a pass heading East; the running chances begin at their
    /// configured values.
    pub fn new(params: &'a AgentParams, walker: WalkerState) -> Self {
        Self {
            params,
            walker,
            direction: Direction::East,
            room_probability: params.room_probability,
            turn_probability: params.turn_probability,
            stats: AgentStats::default(),
        }
    }

    pub fn walker(&self) -> WalkerState {
        self.walker
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn room_probability(&self) -> f64 {
        self.room_probability
    }

    pub fn turn_probability(&self) -> f64 {
        self.turn_probability
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    /// Take one step. Returns `None` without touching the map when the
    /// walker is off the map.
    pub fn step<R: Rng>(&mut self, map: &mut Tilemap<Cell>, rng: &mut R) -> Option<StepOutcome> {
        if !self.walker.is_inside(map) {
            return None;
        }

        let (x, y) = (self.walker.x, self.walker.y);
        map.set_clipped(x as i64, y as i64, Cell::Floor);

        let room = if rng.gen::<f64>() < self.room_probability {
            self.room_probability = ROOM_PROBABILITY_RESET;
            self.stats.rooms += 1;
            dig_room(map, x, y, self.params.room_max_width, self.params.room_max_height, rng)
        } else {
            self.room_probability += self.params.room_probability_increment;
            None
        };

        let turned = rng.gen::<f64>() < self.turn_probability;
        if turned {
            self.direction = Direction::random(rng);
            self.turn_probability = TURN_PROBABILITY_RESET;
            self.stats.turns += 1;
        } else {
            self.turn_probability += self.params.turn_probability_increment;
        }

        let (dx, dy) = self.direction.offset();
        self.walker.x = (x + dx).clamp(0, map.width() as i32 - 1);
        self.walker.y = (y + dy).clamp(0, map.height() as i32 - 1);
        self.stats.steps += 1;

        Some(StepOutcome {
            marked: (x as usize, y as usize),
            room,
            turned,
        })
    }

    /// Run one walk phase of `steps_per_walk` steps, stopping early if the
    /// walker is off the map. Position and heading carry over to the next
    /// phase of the same pass.
    pub fn walk_phase<R: Rng>(&mut self, map: &mut Tilemap<Cell>, rng: &mut R) {
        for _ in 0..self.params.steps_per_walk {
            if self.step(map, rng).is_none() {
                self.stats.phases_cut_short += 1;
                break;
            }
        }
    }

    pub fn finish(self) -> (WalkerState, AgentStats) {
        (self.walker, self.stats)
    }
}

/// Run the drunk agent over a copy of `map`.
///
/// Returns the new map and the walker state to feed into the next pass.
pub fn apply_drunk_agent<R: Rng>(
    map: &Tilemap<Cell>,
    params: &AgentParams,
    walker: WalkerState,
    rng: &mut R,
) -> Result<(Tilemap<Cell>, WalkerState), MapGenError> {
    params.validate()?;
    let (result, walker, _) = run_agent(map, params, walker, rng);
    Ok((result, walker))
}

/// Agent pass for parameters that are already validated.
pub(crate) fn run_agent<R: Rng>(
    map: &Tilemap<Cell>,
    params: &AgentParams,
    walker: WalkerState,
    rng: &mut R,
) -> (Tilemap<Cell>, WalkerState, AgentStats) {
    let mut result = map.clone();
    let mut agent = DrunkAgent::new(params, walker);

    for _ in 0..params.walk_count {
        agent.walk_phase(&mut result, rng);
    }

    let (walker, stats) = agent.finish();
    (result, walker, stats)
}
