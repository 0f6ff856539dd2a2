//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)

use std::fmt;

/// 引导流程的阶段
///
/// 严格线性推进，任何关卡失败都直接进入 `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    InterpreterChecked,
    ConfigChecked,
    EnvironmentEnsured,
    EnvironmentActive,
    DependenciesInstalled,
    ConnectivityVerified,
    PrimaryRun,
    EnvironmentReleased,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::InterpreterChecked => "interpreter-checked",
            Phase::ConfigChecked => "config-checked",
            Phase::EnvironmentEnsured => "environment-ensured",
            Phase::EnvironmentActive => "environment-active",
            Phase::DependenciesInstalled => "dependencies-installed",
            Phase::ConnectivityVerified => "connectivity-verified",
            Phase::PrimaryRun => "primary-run",
            Phase::EnvironmentReleased => "environment-released",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// 最后一步交给哪个外部程序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 网络接口管理器
    Manager,
    /// 端口清理脚本
    Cleanup,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Manager => write!(f, "manager"),
            Target::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// .env 文件中的一条记录
#[derive(Debug, Clone, PartialEq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    /// 所在行号 (从 1 开始)
    pub line: usize,
}

impl EnvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            line,
        }
    }
}

/// 输出格式类型
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    ENV,
    JSON,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::JSON,
            _ => OutputFormat::ENV,
        }
    }
}
