//! vkboot - VK Cloud 网络接口管理器启动器
//!
//! 在隔离的 Python 虚拟环境中准备依赖，通过 API 连接检查后启动外部管理器程序

// 命令行与应用容器
pub mod app;
pub mod cli;

// 命令处理器
pub mod commands;

// 启动配置与 .env 解析
pub mod config;

// 引导编排
pub mod core;

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// 重新导出常用类型
pub use crate::core::{Orchestrator, RunReport};
pub use error::{BootstrapError, Result};
pub use types::{Phase, Target};
