pub mod config;
pub mod simulation;
pub mod render;

pub use simulation::*;
pub use config::*;
