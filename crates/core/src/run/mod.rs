mod run_model;

pub use run_model::{Run, RunStatus, RunTrigger};
