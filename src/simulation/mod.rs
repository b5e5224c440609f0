pub mod runner;
pub mod tick;

pub use runner::Simulation;
pub use tick::run_simulation_tick;
