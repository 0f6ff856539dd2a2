//! 核心引导逻辑

pub mod orchestrator;
pub mod venv;

pub use orchestrator::{Orchestrator, RunReport};
pub use venv::{ActiveEnv, EnvState, ExecContext, IsolatedEnv};
