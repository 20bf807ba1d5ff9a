pub mod config;
pub mod ledger;
pub mod runner;

pub use config::{DetectionInput, WorkflowConfig};
pub use ledger::{find_recordings, ScenarioLedger};
pub use runner::Runner;
