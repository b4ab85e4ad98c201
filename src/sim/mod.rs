pub mod runner;
pub mod scenario;
pub mod script;

pub use runner::{run_scenario, run_session, Sample, Session, SessionConfig};
pub use scenario::{presets, Scenario};
pub use script::{InputScript, TimedScript};
