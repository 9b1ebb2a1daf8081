pub mod report;
pub mod rng;
pub mod simulator;

pub use report::{ReportInputs, synthesize_report};
pub use simulator::{SimulatorTiming, WorkflowSimulator};
