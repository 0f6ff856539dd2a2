//! 跨平台命令执行器
//!
//! 所有子进程都继承父进程的 stdin/stdout/stderr，
//! 环境变量只通过 `Invocation` 显式注入，不修改当前进程环境

use crate::error::{BootstrapError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 一次子进程调用的完整描述
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// 工作目录
    pub cwd: PathBuf,
    /// 注入的环境变量（覆盖继承的变量）
    pub env: Vec<(OsString, OsString)>,
    /// 需要移除的环境变量
    pub env_remove: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// 便于日志输出的命令行
    pub fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 子进程执行接口
pub trait ProcessRunner {
    /// 运行到结束并返回退出码
    fn run(&self, invocation: &Invocation) -> Result<i32>;
}

/// 基于 `std::process::Command` 的执行器
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandExecutor;

impl ProcessRunner for CommandExecutor {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&invocation.cwd);

        for key in &invocation.env_remove {
            cmd.env_remove(key);
        }
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::debug!(command = %invocation.display(), cwd = %invocation.cwd.display(), "启动子进程");

        let status = cmd.status().map_err(|e| {
            BootstrapError::CommandNotFound(format!(
                "{}: {} (请确保命令在 PATH 中或使用完整路径)",
                invocation.program.display(),
                e
            ))
        })?;

        // 被信号终止时没有退出码，按失败处理
        let code = status.code().unwrap_or(1);
        tracing::debug!(command = %invocation.display(), code, "子进程结束");
        Ok(code)
    }
}
