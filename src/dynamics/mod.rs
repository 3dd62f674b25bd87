//! Simulation dynamics modules: integration, contact solving, and sleeping.

pub mod integrator;
pub mod sleeping;
pub mod solver;

pub use integrator::Integrator;
pub use sleeping::update_sleeping;
pub use solver::{ContactSolver, SolverContact};
