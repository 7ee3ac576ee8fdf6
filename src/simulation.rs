use crate::error::Error;
use crate::grid::{Grid, Position};
use crate::settings::SimulationSettings;
use crate::walker::walk;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// How a single particle's walk ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleOutcome {
    /// Touched the aggregate and was committed to the grid
    Stuck {
        position: Position,
        steps: usize,
        /// The boundary radius grew to reach this particle
        grew: bool,
    },
    /// Walked off the field
    Escaped { position: Position, steps: usize },
    /// Used its whole step budget without touching anything
    Exhausted,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// The boundary reached the field's max radius
    #[default]
    BoundaryReached,
    /// `max_particle_attempts` particles were released first
    AttemptLimit,
}

/// Counters for one run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunStats {
    pub attempts: u64,
    pub particles_stuck: u64,
    pub escaped: u64,
    pub exhausted: u64,
    pub termination: Termination,
}

/// One entry of the commit log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub position: Position,
    /// Boundary radius right after this commit
    pub radius: f64,
}

/// Drives particles one at a time against a [`Grid`] until the boundary
/// reaches the edge of the field.
pub struct AggregationEngine<R: Rng> {
    grid: Grid,
    settings: SimulationSettings,
    stats: RunStats,
    attachments: Vec<Attachment>,
    rng: R,
}

impl<R: Rng> AggregationEngine<R> {
    /// Set up an engine for a `size` x `size` field.
    ///
    /// A field too small for the initial radius gets a seed-only grid and the
    /// engine is complete from the start.
    pub fn new(size: usize, settings: SimulationSettings, rng: R) -> Result<Self, Error> {
        settings.validate()?;

        let grid = match Grid::new(size, settings.initial_radius) {
            Ok(grid) => grid,
            Err(Error::BoundaryTooSmall {
                initial_radius,
                max_radius,
                ..
            }) => {
                debug!(
                    size,
                    initial_radius, max_radius, "Field too small to grow, returning seed only"
                );
                Grid::seed_only(size, initial_radius)?
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            grid,
            settings,
            stats: RunStats::default(),
            attachments: Vec::new(),
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Commit log, oldest first. The seed is not included.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Check if the boundary has reached the field's max radius
    pub fn is_complete(&self) -> bool {
        self.grid.is_saturated()
    }

    /// Entry point on the current boundary circle at a uniformly random angle
    fn spawn_point(&mut self) -> Position {
        let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let radius = self.grid.radius();
        let center = self.grid.center();
        center.offset(
            (radius * angle.cos()).round() as i32,
            (radius * angle.sin()).round() as i32,
        )
    }

    /// Release one particle and walk it until it sticks, escapes or runs out
    /// of steps.
    pub fn release_particle(&mut self) -> ParticleOutcome {
        let entry = self.spawn_point();
        let outcome = self.walk_particle(entry);

        self.stats.attempts += 1;
        match outcome {
            ParticleOutcome::Stuck { .. } => self.stats.particles_stuck += 1,
            ParticleOutcome::Escaped { .. } => self.stats.escaped += 1,
            ParticleOutcome::Exhausted => self.stats.exhausted += 1,
        }
        outcome
    }

    fn walk_particle(&mut self, entry: Position) -> ParticleOutcome {
        let grid = &mut self.grid;
        for (i, position) in walk(entry, self.settings.max_walk_steps, &mut self.rng).enumerate() {
            let steps = i + 1;
            if !grid.contains(position) {
                return ParticleOutcome::Escaped { position, steps };
            }
            if grid.has_occupied_neighbor(position) {
                let newly_occupied = grid.occupy(position);
                let grew = grid.grow_boundary_if_needed(position);
                if grew {
                    debug!(
                        x = position.x,
                        y = position.y,
                        radius = grid.radius(),
                        "Boundary grew"
                    );
                }
                if newly_occupied {
                    self.attachments.push(Attachment {
                        position,
                        radius: grid.radius(),
                    });
                }
                return ParticleOutcome::Stuck {
                    position,
                    steps,
                    grew,
                };
            }
        }
        ParticleOutcome::Exhausted
    }

    /// Release particles until the boundary reaches the max radius or the
    /// attempt limit is hit. On completion the radius is at least
    /// `max_radius()` and less than `max_radius() + sqrt(2)`.
    pub fn run(&mut self) -> RunStats {
        while !self.is_complete() {
            if let Some(limit) = self.settings.max_particle_attempts {
                if self.stats.attempts >= limit {
                    self.stats.termination = Termination::AttemptLimit;
                    warn!(
                        attempts = self.stats.attempts,
                        radius = self.grid.radius(),
                        max_radius = self.grid.max_radius(),
                        "Particle attempt limit reached before boundary filled the field"
                    );
                    return self.stats;
                }
            }
            self.release_particle();
        }

        self.stats.termination = Termination::BoundaryReached;
        info!(
            size = self.grid.size(),
            attempts = self.stats.attempts,
            stuck = self.stats.particles_stuck,
            escaped = self.stats.escaped,
            exhausted = self.stats.exhausted,
            radius = self.grid.radius(),
            "Aggregation complete"
        );
        self.stats
    }

    /// Consume the engine, keeping the grid and the commit log
    pub fn into_parts(self) -> (Grid, RunStats, Vec<Attachment>) {
        (self.grid, self.stats, self.attachments)
    }
}

/// Grow a full aggregate on a `size` x `size` field with default settings.
/// The same `seed` always yields the same grid.
pub fn generate_aggregate_grid(size: usize, seed: u64) -> Result<Grid, Error> {
    let rng = StdRng::seed_from_u64(seed);
    let (grid, _, _) = generate_with(size, &SimulationSettings::default(), rng)?;
    Ok(grid)
}

/// Grow an aggregate with explicit settings and random source
pub fn generate_with<R: Rng>(
    size: usize,
    settings: &SimulationSettings,
    rng: R,
) -> Result<(Grid, RunStats, Vec<Attachment>), Error> {
    let mut engine = AggregationEngine::new(size, settings.clone(), rng)?;
    engine.run();
    Ok(engine.into_parts())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIAL_LIMIT: u64 = 2_000_000;

    fn bounded_settings() -> SimulationSettings {
        SimulationSettings {
            max_particle_attempts: Some(TRIAL_LIMIT),
            ..Default::default()
        }
    }

    fn seeded_engine(size: usize, seed: u64) -> AggregationEngine<StdRng> {
        AggregationEngine::new(size, bounded_settings(), StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_size_50_grows_and_terminates() {
        let mut engine = seeded_engine(50, 42);
        let stats = engine.run();

        assert_eq!(stats.termination, Termination::BoundaryReached);
        assert!(stats.attempts <= TRIAL_LIMIT);
        let grid = engine.grid();
        assert!(grid.occupied_count() > 1);
        assert!(grid.radius() >= grid.max_radius());
        assert!(grid.is_occupied(grid.center()));
        assert_eq!(
            stats.attempts,
            stats.particles_stuck + stats.escaped + stats.exhausted
        );
    }

    #[test]
    fn test_final_radius_stays_on_the_field() {
        for (size, seed) in [(30, 1), (41, 2), (64, 3)] {
            let mut engine = seeded_engine(size, seed);
            let stats = engine.run();
            assert_eq!(stats.termination, Termination::BoundaryReached);
            let grid = engine.grid();
            assert!(grid.is_occupied(grid.center()));
            // the last growth step can overshoot the max radius by at most one
            // diagonal move, which still lands inside the field
            assert!(grid.radius() >= grid.max_radius());
            assert!(grid.radius() < grid.max_radius() + 2f64.sqrt());
            assert!(grid.radius() < size as f64 / 2.0);
            for pos in grid.occupied_positions() {
                assert!(grid.contains(pos));
            }
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = generate_aggregate_grid(40, 7).unwrap();
        let b = generate_aggregate_grid(40, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn test_commit_log_replays_into_final_grid() {
        let mut engine = seeded_engine(48, 9);
        engine.run();

        let grid = engine.grid();
        let mut replay = Grid::new(48, 10.0).unwrap();
        let mut prev_count = replay.occupied_count();
        let mut prev_radius = replay.radius();

        for attachment in engine.attachments() {
            // every committed cell touched the aggregate at commit time
            assert!(replay.has_occupied_neighbor(attachment.position));
            assert!(!replay.is_occupied(attachment.position));

            assert!(replay.occupy(attachment.position));
            replay.grow_boundary_if_needed(attachment.position);

            assert_eq!(replay.occupied_count(), prev_count + 1);
            assert!(replay.radius() >= prev_radius);
            assert_eq!(replay.radius(), attachment.radius);
            prev_count = replay.occupied_count();
            prev_radius = replay.radius();
        }

        assert_eq!(&replay, grid);
        assert_eq!(engine.attachments().len() + 1, grid.occupied_count());
    }

    #[test]
    fn test_occupancy_is_monotonic_per_particle() {
        let mut engine = seeded_engine(36, 21);
        let mut previous: Vec<Position> = engine.grid().occupied_positions().collect();
        let mut radius = engine.grid().radius();

        while !engine.is_complete() {
            let outcome = engine.release_particle();
            let grid = engine.grid();
            assert!(previous.iter().all(|pos| grid.is_occupied(*pos)));
            match outcome {
                ParticleOutcome::Stuck { position, grew, .. } => {
                    assert!(grid.is_occupied(position));
                    assert_eq!(grew, grid.radius() > radius);
                    previous = grid.occupied_positions().collect();
                }
                ParticleOutcome::Escaped { position, .. } => {
                    assert!(!grid.contains(position));
                    assert_eq!(grid.occupied_count(), previous.len());
                }
                ParticleOutcome::Exhausted => assert_eq!(grid.occupied_count(), previous.len()),
            }
            assert!(grid.radius() >= radius);
            radius = grid.radius();
            assert!(engine.stats().attempts < TRIAL_LIMIT);
        }
    }

    #[test]
    fn test_undersized_field_returns_seed_only() {
        for size in [1, 2, 5, 24] {
            let grid = generate_aggregate_grid(size, 3).unwrap();
            assert_eq!(grid.occupied_count(), 1);
            assert!(grid.is_occupied(grid.center()));
        }

        let mut engine = seeded_engine(1, 0);
        assert!(engine.is_complete());
        let stats = engine.run();
        assert_eq!(stats.attempts, 0);
        assert_eq!(stats.termination, Termination::BoundaryReached);
    }

    #[test]
    fn test_zero_size_is_an_error() {
        assert!(matches!(
            generate_aggregate_grid(0, 1),
            Err(Error::InvalidSize { size: 0 })
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = SimulationSettings {
            max_walk_steps: 0,
            ..Default::default()
        };
        let result = AggregationEngine::new(50, settings, StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn test_attempt_limit_stops_run() {
        let settings = SimulationSettings {
            max_particle_attempts: Some(5),
            ..Default::default()
        };
        let (grid, stats, attachments) =
            generate_with(200, &settings, StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(stats.attempts, 5);
        assert_eq!(stats.termination, Termination::AttemptLimit);
        assert!(grid.radius() < grid.max_radius());
        assert_eq!(attachments.len() + 1, grid.occupied_count());
    }

    #[test]
    fn test_short_walks_exhaust() {
        // a particle spawned 10 cells out cannot touch the seed in 3 moves
        let settings = SimulationSettings {
            max_walk_steps: 3,
            max_particle_attempts: Some(50),
            ..Default::default()
        };
        let mut engine =
            AggregationEngine::new(100, settings, StdRng::seed_from_u64(8)).unwrap();
        for _ in 0..50 {
            assert_eq!(engine.release_particle(), ParticleOutcome::Exhausted);
        }
        assert_eq!(engine.stats().exhausted, 50);
        assert_eq!(engine.grid().occupied_count(), 1);
    }

    #[test]
    fn test_spawn_points_lie_on_entry_circle() {
        let mut engine = seeded_engine(80, 13);
        for _ in 0..200 {
            let entry = engine.spawn_point();
            let distance = engine.grid().distance_from_center(entry);
            assert!((distance - engine.grid().radius()).abs() <= 1.0);
            assert!(engine.grid().contains(entry));
        }
    }
}
