//! CLI 参数定义

use crate::types::{OutputFormat, Target};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vkboot - VK Cloud 网络接口管理器启动器
#[derive(Parser, Debug)]
#[command(
    name = "vkboot",
    version,
    about = "VK Cloud 网络接口管理器启动器",
    long_about = "检查解释器和配置，准备虚拟环境并安装依赖，通过 API 连接检查后启动网络接口管理器"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 项目目录 (默认为当前目录)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// 启动配置文件 (默认为 <项目目录>/bootstrap.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 覆盖解释器名称或路径
    #[arg(short, long, global = true)]
    pub interpreter: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// 准备环境并启动网络接口管理器 (默认)
    Run,

    /// 准备环境并运行端口清理脚本
    Cleanup,

    /// 诊断启动环境，不做任何修改
    Doctor {
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },
}

impl Cli {
    /// 未指定子命令时等同于 run
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

impl Commands {
    pub fn target(&self) -> Option<Target> {
        match self {
            Commands::Run => Some(Target::Manager),
            Commands::Cleanup => Some(Target::Cleanup),
            Commands::Doctor { .. } => None,
        }
    }
}

/// 解析输出格式
pub fn parse_format(format: &str) -> OutputFormat {
    OutputFormat::from(format)
}
