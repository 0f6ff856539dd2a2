//! 错误处理模块 (修复原则：明确抛出异常)
//!
//! 每一道关卡失败都映射为一个变体，变体决定进程退出码

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("解释器未安装: {0}")]
    InterpreterMissing(String),

    #[error("配置文件已从模板创建，请先编辑: {0}")]
    ConfigSeeded(PathBuf),

    #[error("配置路径不是文件: {0}")]
    ConfigNotAFile(PathBuf),

    #[error("配置模板不存在: {0}")]
    TemplateMissing(PathBuf),

    #[error("虚拟环境创建失败 (退出码 {0})")]
    EnvCreateFailed(i32),

    #[error("虚拟环境已损坏，找不到解释器: {0}")]
    EnvBroken(PathBuf),

    #[error("依赖安装失败 (退出码 {0})")]
    DependencyInstallFailed(i32),

    #[error("API 连接检查失败 (退出码 {0})")]
    ConnectivityFailed(i32),

    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("启动配置文件不存在: {0}")]
    SettingsNotFound(PathBuf),

    #[error("启动配置解析失败: {path}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl BootstrapError {
    /// 进程退出码
    ///
    /// 委托给子进程的失败透传子进程的退出码，其余统一为 1
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::EnvCreateFailed(code)
            | BootstrapError::DependencyInstallFailed(code)
            | BootstrapError::ConnectivityFailed(code)
                if *code != 0 =>
            {
                *code
            }
            _ => 1,
        }
    }

    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("❌ 错误: {}", self);

            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            match self {
                BootstrapError::InterpreterMissing(name) => {
                    eprintln!("❌ {} 未安装", name)
                }
                BootstrapError::ConfigSeeded(path) => {
                    eprintln!("⚠️  已创建 {}，请填写配置后重新运行", path.display())
                }
                BootstrapError::ConfigNotAFile(path) => {
                    eprintln!("❌ {} 已存在但不是普通文件，请检查后重新运行", path.display())
                }
                BootstrapError::TemplateMissing(path) => {
                    eprintln!("❌ 配置模板不存在: {}", path.display())
                }
                BootstrapError::ConnectivityFailed(_) => {
                    eprintln!("❌ API 连接检查未通过，管理器不会启动")
                }
                BootstrapError::SettingsParse { path, source } => {
                    eprintln!("❌ 启动配置 {} 无效: {}", path.display(), source)
                }
                _ => eprintln!("❌ 错误: {}", self),
            }
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, BootstrapError>;
