//! 命令处理器
//!
//! 每个命令一个模块，实现 CommandHandler trait

use crate::config::LauncherConfig;
use crate::error::Result;
use std::path::PathBuf;

pub mod doctor;
pub mod run;

pub use doctor::DoctorCommand;
pub use run::RunCommand;

/// 命令上下文
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub verbose: bool,
    /// 项目目录，相对路径的基准
    pub project_dir: PathBuf,
    pub config: LauncherConfig,
}

/// 命令处理器 trait
pub trait CommandHandler {
    /// 执行命令，返回进程退出码
    fn execute(&self, ctx: &CommandContext) -> Result<i32>;
}
