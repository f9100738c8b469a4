//! Planning: belief-derived cost fields and cost-aware A* search.

mod astar;
mod cost_field;

pub use astar::Planner;
pub use cost_field::{CostConfig, CostField};
