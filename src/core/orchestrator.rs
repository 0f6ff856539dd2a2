//! 引导编排器
//!
//! 按固定顺序执行各道关卡，任何一道失败立即终止：
//! 解释器 → 配置文件 → 虚拟环境 → 激活 → 安装依赖 → 连接检查 → 目标程序 → 释放

use crate::config::format::DotenvParser;
use crate::config::{self, LauncherConfig};
use crate::core::venv::{ExecContext, IsolatedEnv};
use crate::error::{BootstrapError, Result};
use crate::types::{Phase, Target};
use crate::utils::executor::ProcessRunner;
use crate::utils::paths;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 一次完整运行的结果
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// 目标程序的退出码，即整个进程的退出码
    pub exit_code: i32,
    /// 本次是否新建了虚拟环境
    pub env_created: bool,
    /// .env 中缺失或为空的必需键
    pub missing_keys: Vec<String>,
    pub trail: Vec<Phase>,
}

/// 引导编排器
pub struct Orchestrator<'a> {
    project_dir: PathBuf,
    config: LauncherConfig,
    runner: &'a dyn ProcessRunner,
    /// 查找系统解释器用的 PATH
    search_path: Option<OsString>,
    trail: Vec<Phase>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        config: LauncherConfig,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            config,
            runner,
            search_path: std::env::var_os("PATH"),
            trail: Vec::new(),
        }
    }

    /// 替换查找解释器用的 PATH
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    /// 已经过的阶段
    pub fn trail(&self) -> &[Phase] {
        &self.trail
    }

    pub fn phase(&self) -> Phase {
        self.trail.last().copied().unwrap_or(Phase::Start)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        config::resolve(&self.project_dir, path)
    }

    fn advance(&mut self, phase: Phase) {
        tracing::debug!(from = %self.phase(), to = %phase, "阶段切换");
        self.trail.push(phase);
    }

    /// 执行完整的引导流程
    pub fn run(&mut self, target: Target) -> Result<RunReport> {
        self.trail = vec![Phase::Start];

        match self.run_gates(target) {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::warn!(phase = %self.phase(), error = %e, "引导失败");
                self.advance(Phase::Failed);
                Err(e)
            }
        }
    }

    fn run_gates(&mut self, target: Target) -> Result<RunReport> {
        let interpreter = self.check_interpreter()?;
        self.advance(Phase::InterpreterChecked);

        let missing_keys = self.check_config()?;
        self.advance(Phase::ConfigChecked);

        let env = IsolatedEnv::new(self.resolve(&self.config.venv_dir));
        let env_created = self.ensure_env(&env, &interpreter)?;
        self.advance(Phase::EnvironmentEnsured);

        // 守卫在后续任何一步提前返回时都会被释放
        let active = env.activate(self.search_path.as_deref())?;
        self.advance(Phase::EnvironmentActive);
        println!("✓ 虚拟环境已激活: {}", env.root().display());

        self.install_dependencies(active.context())?;
        self.advance(Phase::DependenciesInstalled);
        println!("✓ 依赖已安装");

        self.verify_connectivity(active.context())?;
        self.advance(Phase::ConnectivityVerified);
        println!("✓ API 连接正常");

        let exit_code = self.run_target(active.context(), target)?;
        self.advance(Phase::PrimaryRun);

        active.release();
        self.advance(Phase::EnvironmentReleased);
        println!("👋 虚拟环境已释放");

        self.advance(Phase::Done);
        Ok(RunReport {
            exit_code,
            env_created,
            missing_keys,
            trail: self.trail.clone(),
        })
    }

    /// 关卡 1：解释器必须可用
    ///
    /// 启动配置里的相对路径以项目目录为基准，与子进程的工作目录一致
    pub fn check_interpreter(&self) -> Result<PathBuf> {
        let name = &self.config.interpreter;
        let lookup = if paths::is_explicit_path(name) {
            self.resolve(Path::new(name)).to_string_lossy().into_owned()
        } else {
            name.clone()
        };

        match paths::find_executable(&lookup, self.search_path.as_deref()) {
            Some(path) => {
                tracing::debug!(interpreter = %path.display(), "找到解释器");
                println!("✓ {} 已安装: {}", name, path.display());
                Ok(path)
            }
            None => Err(BootstrapError::InterpreterMissing(name.clone())),
        }
    }

    /// 关卡 2：配置文件必须存在
    ///
    /// 缺失时从模板创建并终止，本次运行不会使用未编辑的配置
    pub fn check_config(&self) -> Result<Vec<String>> {
        let env_file = self.resolve(&self.config.env_file);

        if !paths::file_exists(&env_file) {
            let template = self.resolve(&self.config.env_template);
            if !paths::seed_from_template(&template, &env_file)? {
                // 路径被目录或悬空链接占用，没有复制任何内容
                return Err(BootstrapError::ConfigNotAFile(env_file));
            }
            println!("⚠️  未找到 {}", self.config.env_file.display());
            println!(
                "📝 已从 {} 创建 {}",
                self.config.env_template.display(),
                self.config.env_file.display()
            );
            println!("   请编辑 {} 填写你的参数后重新运行", env_file.display());
            return Err(BootstrapError::ConfigSeeded(env_file));
        }

        println!("✓ 配置文件存在: {}", env_file.display());
        Ok(self.missing_keys(&env_file))
    }

    /// 只做提示，不作为关卡
    fn missing_keys(&self, env_file: &Path) -> Vec<String> {
        let entries = match paths::read_file(env_file).and_then(|c| DotenvParser::parse(&c)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(file = %env_file.display(), error = %e, "配置文件无法解析");
                println!("⚠️  配置文件无法解析: {}", e);
                return Vec::new();
            }
        };

        let missing = DotenvParser::missing_keys(&entries, &self.config.required_keys);
        for key in &missing {
            println!("⚠️  {} 未设置", key);
        }
        missing
    }

    /// 关卡 3：确保虚拟环境存在
    fn ensure_env(&self, env: &IsolatedEnv, interpreter: &Path) -> Result<bool> {
        if env.root().exists() {
            println!("✓ 虚拟环境已存在: {}", env.root().display());
            return Ok(false);
        }

        println!("📦 创建虚拟环境: {}", env.root().display());
        env.ensure(interpreter, &self.project_dir, self.runner)
    }

    /// 关卡 5：安装依赖
    fn install_dependencies(&self, ctx: &ExecContext) -> Result<()> {
        println!("📥 安装依赖...");
        let invocation = ctx
            .python(&self.project_dir)
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg("-q")
            .arg("-r")
            .arg(self.resolve(&self.config.manifest));

        match self.runner.run(&invocation)? {
            0 => Ok(()),
            code => Err(BootstrapError::DependencyInstallFailed(code)),
        }
    }

    /// 关卡 6：连接检查不通过时管理器不会启动
    fn verify_connectivity(&self, ctx: &ExecContext) -> Result<()> {
        println!("🔍 检查 API 连接...");
        let invocation = ctx
            .python(&self.project_dir)
            .arg(self.resolve(&self.config.connectivity_check));

        match self.runner.run(&invocation)? {
            0 => Ok(()),
            code => Err(BootstrapError::ConnectivityFailed(code)),
        }
    }

    /// 最后一步：退出码不作为关卡，原样返回
    fn run_target(&self, ctx: &ExecContext, target: Target) -> Result<i32> {
        let program = self.resolve(self.config.target_program(target));
        println!("🚀 启动 {}: {}", target, program.display());

        let code = self.runner.run(&ctx.python(&self.project_dir).arg(program))?;
        if code != 0 {
            tracing::warn!(%target, code, "目标程序以非零状态退出");
        }
        Ok(code)
    }
}
