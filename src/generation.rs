//! Generation loop
//!
//! Alternates the automata pass and the drunk agent pass for a fixed number
//! of iterations. [`Generation`] is an iterator yielding the map after every
//! iteration; it owns the walker and the random generator, so it can only be
//! consumed once.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::automata::smooth;
use crate::drunk_agent::{run_agent, AgentStats, WalkerState};
use crate::error::MapGenError;
use crate::params::{AgentParams, AutomataParams, GenerationParams};
use crate::tilemap::{Cell, Tilemap};

/// Map state after one full iteration (automata then agent).
#[derive(Clone, Debug)]
pub struct GenerationStep {
    /// 1-based iteration number
    pub iteration: usize,
    pub map: Tilemap<Cell>,
    pub walker: WalkerState,
    pub agent_stats: AgentStats,
}

/// Iterator over the maps produced by alternating both passes.
pub struct Generation<R = ChaCha8Rng> {
    map: Tilemap<Cell>,
    walker: WalkerState,
    automata: AutomataParams,
    agent: AgentParams,
    rng: R,
    iteration: usize,
    iterations: usize,
    seed: Option<u64>,
}

impl<R: Rng> Generation<R> {
    /// Validate the parameters once and set up the loop.
    pub fn new(
        initial: Tilemap<Cell>,
        walker: WalkerState,
        automata: AutomataParams,
        agent: AgentParams,
        iterations: usize,
        rng: R,
    ) -> Result<Self, MapGenError> {
        automata.validate()?;
        agent.validate()?;
        Ok(Self {
            map: initial,
            walker,
            automata,
            agent,
            rng,
            iteration: 0,
            iterations,
            seed: None,
        })
    }

    /// Map after the most recent iteration (the seed map before the first).
    pub fn current_map(&self) -> &Tilemap<Cell> {
        &self.map
    }

    pub fn walker(&self) -> WalkerState {
        self.walker
    }

    /// Seed of the generator, when built from [`GenerationParams`].
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Generation<ChaCha8Rng> {
    /// Build the seed map, walker and generator described by `params`.
    ///
    /// Uses a random seed when `params.seed` is unset.
    pub fn from_params(params: &GenerationParams) -> Result<Self, MapGenError> {
        params.validate()?;
        let seed = params.seed.unwrap_or_else(|| rand::random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let initial = Tilemap::random_fill(params.width, params.height, params.initial_fill, &mut rng)?;
        let (x, y) = params.start_position();

        let mut generation = Self::new(
            initial,
            WalkerState::new(x, y),
            params.automata.clone(),
            params.agent.clone(),
            params.iterations,
            rng,
        )?;
        generation.seed = Some(seed);
        Ok(generation)
    }
}

impl<R: Rng> Iterator for Generation<R> {
    type Item = GenerationStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.iteration >= self.iterations {
            return None;
        }
        self.iteration += 1;

        let smoothed = smooth(&self.map, &self.automata);
        let (map, walker, agent_stats) = run_agent(&smoothed, &self.agent, self.walker, &mut self.rng);
        self.map = map;
        self.walker = walker;

        Some(GenerationStep {
            iteration: self.iteration,
            map: self.map.clone(),
            walker,
            agent_stats,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.iterations - self.iteration;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for Generation<R> {}

/// Totals over a whole run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub iterations: usize,
    pub steps: usize,
    pub rooms: usize,
    pub turns: usize,
}

impl GenerationStats {
    /// Add one iteration to the totals.
    pub fn record(&mut self, step: &GenerationStep) {
        self.iterations += 1;
        self.steps += step.agent_stats.steps;
        self.rooms += step.agent_stats.rooms;
        self.turns += step.agent_stats.turns;
    }
}

/// Result of a complete generation run
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub seed: u64,
    pub params: GenerationParams,
    pub initial: Tilemap<Cell>,
    pub map: Tilemap<Cell>,
    pub walker: WalkerState,
    pub stats: GenerationStats,
}

impl GeneratedMap {
    /// Collect the current state of `generation` into a result.
    ///
    /// `params` are the ones the generation was built from; the seed actually
    /// used is written back into them so the run can be replayed.
    pub fn from_generation<R: Rng>(
        generation: &Generation<R>,
        params: &GenerationParams,
        initial: Tilemap<Cell>,
        stats: GenerationStats,
    ) -> Self {
        let seed = generation.seed().or(params.seed).unwrap_or_default();
        Self {
            seed,
            params: GenerationParams { seed: Some(seed), ..params.clone() },
            initial,
            map: generation.current_map().clone(),
            walker: generation.walker(),
            stats,
        }
    }
}

/// Run every iteration described by `params` and return the final map.
pub fn generate(params: &GenerationParams) -> Result<GeneratedMap, MapGenError> {
    let mut generation = Generation::from_params(params)?;
    let initial = generation.current_map().clone();
    let mut stats = GenerationStats::default();

    for step in generation.by_ref() {
        stats.record(&step);
    }

    Ok(GeneratedMap::from_generation(&generation, params, initial, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::apply_automata;

    fn seeded(seed: u64) -> GenerationParams {
        GenerationParams { seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn test_yields_one_map_per_iteration() {
        let params = GenerationParams { iterations: 7, ..seeded(1) };
        let generation = Generation::from_params(&params).unwrap();
        assert_eq!(generation.len(), 7);

        let steps: Vec<GenerationStep> = generation.collect();
        assert_eq!(steps.len(), 7);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.iteration, i + 1);
            assert_eq!(step.map.width(), 20);
            assert_eq!(step.map.height(), 10);
            assert!(step.walker.is_inside(&step.map));
        }
    }

    #[test]
    fn test_zero_iterations_yields_nothing() {
        let params = GenerationParams { iterations: 0, ..seeded(2) };
        let mut generation = Generation::from_params(&params).unwrap();
        assert!(generation.next().is_none());

        let result = generate(&params).unwrap();
        assert_eq!(result.map, result.initial);
        assert_eq!(result.stats, GenerationStats::default());
    }

    #[test]
    fn test_same_seed_same_map() {
        let params = GenerationParams { width: 40, height: 25, initial_fill: 0.45, ..seeded(77) };
        let a = generate(&params).unwrap();
        let b = generate(&params).unwrap();
        assert_eq!(a.map, b.map);
        assert_eq!(a.walker, b.walker);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_random_seed_is_reported() {
        let params = GenerationParams::default();
        let result = generate(&params).unwrap();
        assert_eq!(result.params.seed, Some(result.seed));

        let replay = generate(&result.params).unwrap();
        assert_eq!(replay.map, result.map);
    }

    #[test]
    fn test_result_matches_stepped_generation() {
        let params = GenerationParams { iterations: 4, initial_fill: 0.3, ..seeded(21) };
        let mut generation = Generation::from_params(&params).unwrap();
        let initial = generation.current_map().clone();
        let mut stats = GenerationStats::default();
        for step in generation.by_ref() {
            stats.record(&step);
        }

        let stepped = GeneratedMap::from_generation(&generation, &params, initial, stats);
        let direct = generate(&params).unwrap();
        assert_eq!(stepped.seed, 21);
        assert_eq!(stepped.params.seed, Some(21));
        assert_eq!(stepped.initial, direct.initial);
        assert_eq!(stepped.map, direct.map);
        assert_eq!(stepped.walker, direct.walker);
        assert_eq!(stepped.stats, direct.stats);
        assert_eq!(stepped.stats.iterations, 4);
    }

    #[test]
    fn test_default_run_carves_from_the_center() {
        // The default walker starts inside the map, so an empty seed map
        // always gains floor
        let params = seeded(22);
        let mut generation = Generation::from_params(&params).unwrap();
        assert_eq!(generation.walker().position(), (10, 5));

        let first = generation.next().unwrap();
        assert!(first.agent_stats.steps > 0);
        assert_eq!(*first.map.get(10, 5).unwrap(), Cell::Floor);
    }

    #[test]
    fn test_walker_state_threads_between_passes() {
        // Quiet walker heading East: 3 steps per iteration
        let agent = AgentParams {
            walk_count: 1,
            steps_per_walk: 3,
            room_probability: 0.0,
            room_probability_increment: 0.0,
            turn_probability: 0.0,
            turn_probability_increment: 0.0,
            ..Default::default()
        };
        let initial = Tilemap::new_with(20, 10, Cell::Empty).unwrap();
        let generation = Generation::new(
            initial,
            WalkerState::new(2, 4),
            AutomataParams::default(),
            agent,
            3,
            ChaCha8Rng::seed_from_u64(3),
        )
        .unwrap();

        let positions: Vec<(i32, i32)> = generation.map(|s| s.walker.position()).collect();
        assert_eq!(positions, vec![(5, 4), (8, 4), (11, 4)]);
    }

    #[test]
    fn test_iteration_applies_automata_then_agent() {
        // With a silent agent that starts off the map, each iteration is
        // exactly one automata step
        let agent = AgentParams { walk_count: 1, steps_per_walk: 5, ..Default::default() };
        let automata = AutomataParams { radius: 1, threshold: 0.3 };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let initial = Tilemap::random_fill(16, 12, 0.5, &mut rng).unwrap();

        let off_map = WalkerState::new(-1, 0);
        let steps: Vec<GenerationStep> = Generation::new(
            initial.clone(),
            off_map,
            automata.clone(),
            agent,
            2,
            rng,
        )
        .unwrap()
        .collect();

        let once = apply_automata(&initial, &automata).unwrap();
        let twice = apply_automata(&once, &automata).unwrap();
        assert_eq!(steps[0].map, once);
        assert_eq!(steps[1].map, twice);
        assert_eq!(steps[1].walker, off_map);
    }

    #[test]
    fn test_end_to_end_single_step() {
        let agent = AgentParams {
            walk_count: 1,
            steps_per_walk: 1,
            room_probability: 0.0,
            room_probability_increment: 0.0,
            turn_probability: 0.0,
            turn_probability_increment: 0.0,
            ..Default::default()
        };
        let initial = Tilemap::new_with(20, 10, Cell::Empty).unwrap();
        let mut generation = Generation::new(
            initial,
            WalkerState::new(10, 5),
            AutomataParams { radius: 1, threshold: 0.5 },
            agent,
            1,
            ChaCha8Rng::seed_from_u64(5),
        )
        .unwrap();

        let step = generation.next().unwrap();
        assert_eq!(step.map.floor_count(), 1);
        assert_eq!(*step.map.get(10, 5).unwrap(), Cell::Floor);
        assert_eq!(step.walker.position(), (11, 5));
        assert!(generation.next().is_none());
    }

    #[test]
    fn test_invalid_params_fail_before_running() {
        let params = GenerationParams {
            automata: AutomataParams { radius: 0, threshold: 0.5 },
            ..seeded(6)
        };
        assert!(matches!(Generation::from_params(&params), Err(MapGenError::InvalidRadius(0))));

        let params = GenerationParams { width: 0, ..seeded(6) };
        assert!(matches!(generate(&params), Err(MapGenError::InvalidDimension { .. })));
    }
}
