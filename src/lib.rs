//! marga-nav — partially-observable grid navigation.
//!
//! An agent crosses a discretized 2-D workspace it cannot see in full: a
//! noisy range sensor reveals nearby obstacles, a log-odds occupancy belief
//! fuses the measurements, a risk-inflated A* plans over the belief, and a
//! frontier-driven explorer takes over whenever the goal is unreachable
//! under current knowledge. When the agent is physically cornered it
//! retreats along its own motion history.
//!
//! # Architecture
//!
//! The crate is organized in layers, leaves first:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      sim/                           │  ← Run orchestration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     agent/                          │  ← State machine
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │      mapping/      planning/      exploration/      │  ← Belief + search
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              world/         sensing/                │  ← Ground truth + sensing
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! The crate is a library, not a process. A host loop (renderer, batch
//! driver) creates a [`sim::Simulation`] and calls [`sim::Simulation::tick`]
//! until [`sim::Simulation::is_terminal`] turns true:
//!
//! ```
//! use marga_nav::core::Cell;
//! use marga_nav::sensing::SensorConfig;
//! use marga_nav::sim::{RunConfig, RunOutcome, Simulation};
//!
//! let config = RunConfig {
//!     grid_size: 10,
//!     obstacle_density: 0.15,
//!     start: Cell::new(0, 0),
//!     goal: Cell::new(9, 9),
//!     seed: 42,
//!     sensor: SensorConfig {
//!         p_false_positive: 0.0,
//!         p_false_negative: 0.0,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config).unwrap();
//! while !sim.is_terminal() && sim.ticks() < 500 {
//!     let step = sim.tick();
//!     let _ = (step.cell, step.mode, step.belief);
//! }
//! assert_eq!(sim.outcome(), RunOutcome::GoalReached);
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Ground truth and sensing (depends on core)
// ============================================================================
pub mod sensing;
pub mod world;

// ============================================================================
// Layer 3: Belief, planning, exploration (depends on core, sensing)
// ============================================================================
pub mod exploration;
pub mod mapping;
pub mod planning;

// ============================================================================
// Layer 4: Agent state machine (depends on all algorithm layers)
// ============================================================================
pub mod agent;

// ============================================================================
// Layer 5: Run orchestration (depends on everything)
// ============================================================================
pub mod sim;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use crate::core::{manhattan, Cell, Grid};
pub use agent::{AgentConfig, NavMode, NavigationAgent};
pub use error::{MargaError, Result};
pub use exploration::{FrontierConfig, FrontierFinder};
pub use mapping::{BeliefConfig, BeliefMap, BeliefSnapshot, CellState};
pub use planning::{CostConfig, CostField, Planner};
pub use sensing::{NoiseGenerator, Observation, RangeSensor, SensorConfig};
pub use sim::{RunConfig, RunOutcome, Simulation, TickResult};
pub use world::TrueEnvironment;
