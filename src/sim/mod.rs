//! Run orchestration: configuration, the tick loop, outcome reporting.
//!
//! A [`Simulation`] is one navigation run. Construction validates the
//! configuration, seeds the RNG, and generates a solvable environment;
//! after that the host calls [`Simulation::tick`] until the run reports a
//! terminal outcome. The core imposes no timing: a tick completes
//! synchronously and the host decides when to request the next one.
//!
//! Each tick advances sensing, belief integration, cost-field rebuild,
//! planning, and motion atomically and in that fixed order. Nothing in the
//! crate mutates shared state outside this sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentConfig, NavMode, NavigationAgent};
use crate::core::Cell;
use crate::error::{MargaError, Result};
use crate::exploration::{FrontierConfig, FrontierFinder};
use crate::mapping::{BeliefConfig, BeliefMap, BeliefSnapshot};
use crate::planning::{CostConfig, CostField, Planner};
use crate::sensing::{NoiseGenerator, RangeSensor, SensorConfig};
use crate::world::TrueEnvironment;

/// Full configuration of a navigation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Side length of the square workspace in cells.
    pub grid_size: usize,

    /// Fraction of non-start/non-goal cells to block.
    pub obstacle_density: f32,

    pub start: Cell,
    pub goal: Cell,

    /// Seed for obstacle layout and measurement noise.
    ///
    /// 0 draws from OS entropy; any other value reproduces the run exactly.
    pub seed: u64,

    pub sensor: SensorConfig,
    pub belief: BeliefConfig,
    pub cost: CostConfig,
    pub frontier: FrontierConfig,
    pub agent: AgentConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            obstacle_density: 0.25,
            start: Cell::new(0, 0),
            goal: Cell::new(19, 19),
            seed: 0,
            sensor: SensorConfig::default(),
            belief: BeliefConfig::default(),
            cost: CostConfig::default(),
            frontier: FrontierConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    InProgress,
    GoalReached,
    Stuck,
}

/// Everything an observer needs about one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickResult {
    /// 1-based tick counter; terminal echoes repeat the last value.
    pub tick: u64,
    pub cell: Cell,
    pub mode: NavMode,
    /// The plan consulted this tick; empty when none applied.
    pub plan: Vec<Cell>,
    pub belief: BeliefSnapshot,
}

/// One navigation run.
pub struct Simulation {
    config: RunConfig,
    env: TrueEnvironment,
    sensor: RangeSensor,
    belief: BeliefMap,
    planner: Planner,
    frontiers: FrontierFinder,
    agent: NavigationAgent,
    /// Cells occupied over the run, in order, for renderers.
    trail: Vec<Cell>,
    ticks: u64,
}

impl Simulation {
    /// Create a run: validate, seed, generate a solvable environment.
    pub fn new(config: RunConfig) -> Result<Self> {
        Self::validate(&config)?;

        let mut rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        let env = TrueEnvironment::generate(
            config.grid_size,
            config.obstacle_density,
            config.start,
            config.goal,
            &mut rng,
        )?;

        Ok(Self::assemble(config, env, rng))
    }

    /// Create a run on a hand-authored environment.
    ///
    /// Harnesses use this to reproduce specific scenes (enclosures, dead
    /// ends, unreachable goals). The environment must agree with the
    /// configuration; no solvability check is applied.
    pub fn with_environment(config: RunConfig, env: TrueEnvironment) -> Result<Self> {
        Self::validate(&config)?;
        if env.grid().size() != config.grid_size {
            return Err(MargaError::EnvironmentMismatch("grid size differs"));
        }
        if env.start() != config.start || env.goal() != config.goal {
            return Err(MargaError::EnvironmentMismatch("start or goal differs"));
        }

        let rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        Ok(Self::assemble(config, env, rng))
    }

    fn assemble(config: RunConfig, env: TrueEnvironment, mut rng: SmallRng) -> Self {
        // Derive the noise stream from the same run seed.
        let noise = NoiseGenerator::from_rng(SmallRng::seed_from_u64(rng.gen()));
        let sensor = RangeSensor::new(config.sensor.clone(), noise);
        let belief = BeliefMap::new(env.grid(), config.belief.clone());
        let frontiers = FrontierFinder::new(config.frontier.clone());
        let agent = NavigationAgent::new(config.agent.clone(), config.start, config.goal);

        log::info!(
            "run created: {0}x{0} grid, {1} obstacles, start {2}, goal {3}",
            config.grid_size,
            env.obstacle_count(),
            config.start,
            config.goal
        );

        let trail = vec![config.start];
        Self {
            config,
            env,
            sensor,
            belief,
            planner: Planner::new(),
            frontiers,
            agent,
            trail,
            ticks: 0,
        }
    }

    fn validate(config: &RunConfig) -> Result<()> {
        if config.grid_size < 2 {
            return Err(MargaError::InvalidGridSize(config.grid_size));
        }
        let grid = crate::core::Grid::new(config.grid_size);
        if !grid.in_bounds(config.start) {
            return Err(MargaError::OutOfBounds(config.start, config.grid_size));
        }
        if !grid.in_bounds(config.goal) {
            return Err(MargaError::OutOfBounds(config.goal, config.grid_size));
        }
        if config.start == config.goal {
            return Err(MargaError::StartEqualsGoal);
        }
        for (name, value) in [
            ("obstacle_density", config.obstacle_density),
            ("p_false_positive", config.sensor.p_false_positive),
            ("p_false_negative", config.sensor.p_false_negative),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(MargaError::ParameterOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Advance the run by exactly one step.
    ///
    /// Once the run is terminal this becomes a no-op that echoes the final
    /// state.
    pub fn tick(&mut self) -> TickResult {
        if self.agent.mode().is_terminal() {
            return TickResult {
                tick: self.ticks,
                cell: self.agent.cell(),
                mode: self.agent.mode(),
                plan: Vec::new(),
                belief: self.belief.snapshot(),
            };
        }

        self.ticks += 1;

        let observations = self.sensor.scan(&self.env, self.agent.cell());
        self.belief.integrate(&observations);
        let field = CostField::build(
            &self.belief,
            &self.config.cost,
            self.config.start,
            self.config.goal,
        );
        let plan = self
            .agent
            .advance(&field, &self.planner, &self.frontiers, &self.belief);

        if self.trail.last().copied() != Some(self.agent.cell()) {
            self.trail.push(self.agent.cell());
        }
        if self.agent.mode().is_terminal() {
            log::info!(
                "run finished after {} ticks: {}",
                self.ticks,
                self.agent.mode().as_str()
            );
        }

        TickResult {
            tick: self.ticks,
            cell: self.agent.cell(),
            mode: self.agent.mode(),
            plan,
            belief: self.belief.snapshot(),
        }
    }

    /// Whether the run has ended.
    pub fn is_terminal(&self) -> bool {
        self.agent.mode().is_terminal()
    }

    /// Overall run result so far.
    pub fn outcome(&self) -> RunOutcome {
        match self.agent.mode() {
            NavMode::GoalReached => RunOutcome::GoalReached,
            NavMode::Stuck => RunOutcome::Stuck,
            _ => RunOutcome::InProgress,
        }
    }

    /// Ticks advanced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Cells occupied over the run, in order.
    pub fn trail(&self) -> &[Cell] {
        &self.trail
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn belief(&self) -> &BeliefMap {
        &self.belief
    }

    pub fn environment(&self) -> &TrueEnvironment {
        &self.env
    }

    pub fn agent(&self) -> &NavigationAgent {
        &self.agent
    }
}
