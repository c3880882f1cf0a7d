pub mod error;
pub mod flow_problem;
pub mod min_cost_flow;
pub mod min_cost_flow_solver;
pub mod options;
mod residual_network;
pub mod sensitivity;

pub use error::SolverError;
pub use min_cost_flow_solver::{MinCostFlowSolver, SolveOutcome};
pub use options::SolverOptions;
