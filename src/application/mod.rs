pub mod ports;
pub mod registry;
pub mod scheduler;
pub mod usecases;

pub use ports::*;
pub use registry::Registry;
pub use scheduler::Scheduler;
