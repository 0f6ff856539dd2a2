//! 隔离的依赖环境 (Python venv)
//!
//! 激活不修改当前进程的环境变量，而是生成一个显式的 `ExecContext`，
//! 由 `ActiveEnv` 守卫持有，离开作用域即释放

use crate::error::{BootstrapError, Result};
use crate::utils::executor::{Invocation, ProcessRunner};
use crate::utils::paths;
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// 环境目录的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvState {
    Absent,
    Ready,
    /// 目录存在但找不到解释器
    Broken,
}

/// 一个目录范围内的虚拟环境
#[derive(Debug, Clone)]
pub struct IsolatedEnv {
    root: PathBuf,
}

impl IsolatedEnv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 可执行脚本目录
    pub fn scripts_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// 环境内的解释器
    pub fn interpreter(&self) -> PathBuf {
        if cfg!(windows) {
            self.scripts_dir().join("python.exe")
        } else {
            self.scripts_dir().join("python")
        }
    }

    pub fn state(&self) -> EnvState {
        if !self.root.is_dir() {
            EnvState::Absent
        } else if paths::file_exists(&self.interpreter()) {
            EnvState::Ready
        } else {
            EnvState::Broken
        }
    }

    /// 确保环境存在 (幂等操作)
    ///
    /// 已存在的目录原样保留，绝不重建；返回是否新建
    pub fn ensure(
        &self,
        system_interpreter: &Path,
        cwd: &Path,
        runner: &dyn ProcessRunner,
    ) -> Result<bool> {
        if self.root.exists() {
            tracing::debug!(root = %self.root.display(), "虚拟环境已存在，跳过创建");
            return Ok(false);
        }

        let invocation = Invocation::new(system_interpreter, cwd)
            .arg("-m")
            .arg("venv")
            .arg(self.root.as_os_str());

        let code = runner.run(&invocation)?;
        if code != 0 {
            return Err(BootstrapError::EnvCreateFailed(code));
        }

        tracing::info!(root = %self.root.display(), "虚拟环境已创建");
        Ok(true)
    }

    /// 激活环境
    ///
    /// `base_path` 是父进程的 PATH，环境的脚本目录会被放在最前面
    pub fn activate(&self, base_path: Option<&OsStr>) -> Result<ActiveEnv> {
        let python = self.interpreter();
        if !paths::file_exists(&python) {
            return Err(BootstrapError::EnvBroken(python));
        }

        let mut search: Vec<PathBuf> = vec![self.scripts_dir()];
        if let Some(base) = base_path {
            search.extend(std::env::split_paths(base));
        }
        let path = std::env::join_paths(search)
            .map_err(|e| BootstrapError::Parse(format!("PATH 无法拼接: {}", e)))?;

        let context = ExecContext {
            root: self.root.clone(),
            python,
            env: vec![
                (OsString::from("VIRTUAL_ENV"), self.root.clone().into_os_string()),
                (OsString::from("PATH"), path),
            ],
            env_remove: vec![OsString::from("PYTHONHOME")],
        };

        tracing::info!(root = %self.root.display(), "虚拟环境已激活");
        Ok(ActiveEnv {
            context,
            released: false,
        })
    }
}

/// 激活后的执行上下文
#[derive(Debug, Clone, PartialEq)]
pub struct ExecContext {
    pub root: PathBuf,
    /// 环境内解释器的完整路径
    pub python: PathBuf,
    pub env: Vec<(OsString, OsString)>,
    pub env_remove: Vec<OsString>,
}

impl ExecContext {
    /// 在该环境中运行解释器的调用
    pub fn python(&self, cwd: &Path) -> Invocation {
        Invocation {
            program: self.python.clone(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: self.env.clone(),
            env_remove: self.env_remove.clone(),
        }
    }
}

/// 已激活环境的守卫
///
/// 正常路径通过 `release` 释放；提前返回时由 `Drop` 释放
#[derive(Debug)]
pub struct ActiveEnv {
    context: ExecContext,
    released: bool,
}

impl ActiveEnv {
    pub fn context(&self) -> &ExecContext {
        &self.context
    }

    /// 释放环境，恢复到激活前的执行上下文
    pub fn release(mut self) {
        self.released = true;
        tracing::info!(root = %self.context.root.display(), "虚拟环境已释放");
    }
}

impl Drop for ActiveEnv {
    fn drop(&mut self) {
        if !self.released {
            tracing::debug!(root = %self.context.root.display(), "流程中断，释放虚拟环境");
        }
    }
}
