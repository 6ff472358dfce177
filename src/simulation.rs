pub mod constants;
pub mod processes;
pub mod simulator;

pub use constants::HydrologyConfig;
pub use simulator::RiverSimulator;
