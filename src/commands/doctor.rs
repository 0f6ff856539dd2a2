//! doctor 命令处理器
//!
//! 只读检查，不创建也不修改任何文件

use super::{CommandContext, CommandHandler};
use crate::config::format::DotenvParser;
use crate::config::{LauncherConfig, resolve};
use crate::core::venv::{EnvState, IsolatedEnv};
use crate::error::Result;
use crate::types::OutputFormat;
use crate::utils::paths;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// 单个文件的检查结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub present: bool,
}

impl FileCheck {
    fn of(project_dir: &Path, rel: &Path) -> Self {
        let path = resolve(project_dir, rel);
        let present = paths::file_exists(&path);
        Self { path, present }
    }
}

/// 诊断报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorReport {
    pub interpreter: String,
    pub interpreter_path: Option<PathBuf>,
    pub env_file: FileCheck,
    pub env_template: FileCheck,
    pub missing_keys: Vec<String>,
    /// .env 无法解析时的错误
    pub env_parse_error: Option<String>,
    pub venv_dir: PathBuf,
    pub venv_state: EnvState,
    pub manifest: FileCheck,
    pub connectivity_check: FileCheck,
    pub primary: FileCheck,
    pub cleanup: FileCheck,
}

impl DoctorReport {
    /// 收集项目状态
    pub fn inspect(project_dir: &Path, config: &LauncherConfig, search_path: Option<&OsStr>) -> Self {
        let env_file = FileCheck::of(project_dir, &config.env_file);

        let (missing_keys, env_parse_error) = if env_file.present {
            match paths::read_file(&env_file.path).and_then(|c| DotenvParser::parse(&c)) {
                Ok(entries) => (DotenvParser::missing_keys(&entries, &config.required_keys), None),
                Err(e) => (Vec::new(), Some(e.to_string())),
            }
        } else {
            (config.required_keys.clone(), None)
        };

        let venv = IsolatedEnv::new(resolve(project_dir, &config.venv_dir));

        Self {
            interpreter: config.interpreter.clone(),
            interpreter_path: paths::find_executable(&config.interpreter, search_path),
            env_file,
            env_template: FileCheck::of(project_dir, &config.env_template),
            missing_keys,
            env_parse_error,
            venv_dir: venv.root().to_path_buf(),
            venv_state: venv.state(),
            manifest: FileCheck::of(project_dir, &config.manifest),
            connectivity_check: FileCheck::of(project_dir, &config.connectivity_check),
            primary: FileCheck::of(project_dir, &config.primary),
            cleanup: FileCheck::of(project_dir, &config.cleanup),
        }
    }

    /// 会导致 run 失败的问题数
    pub fn issues(&self) -> usize {
        let mut issues = 0;
        if self.interpreter_path.is_none() {
            issues += 1;
        }
        if !self.env_file.present {
            issues += 1;
        }
        if self.venv_state == EnvState::Broken {
            issues += 1;
        }
        for check in [&self.manifest, &self.connectivity_check, &self.primary] {
            if !check.present {
                issues += 1;
            }
        }
        issues
    }

    /// 不影响启动的提示数
    pub fn warnings(&self) -> usize {
        let mut warnings = self.missing_keys.len();
        if self.env_parse_error.is_some() {
            warnings += 1;
        }
        if !self.env_file.present && !self.env_template.present {
            warnings += 1;
        }
        if !self.cleanup.present {
            warnings += 1;
        }
        warnings
    }

    fn print(&self) {
        println!("🔍 VK Cloud 启动环境诊断\n");
        println!("平台: {}", std::env::consts::OS);
        println!("──────────────────────────────────────────────\n");

        println!("🐍 1. 解释器");
        match &self.interpreter_path {
            Some(path) => println!("   ✓ {}: {}", self.interpreter, path.display()),
            None => println!("   ❌ {} 未安装", self.interpreter),
        }
        println!();

        println!("📄 2. 配置文件");
        if self.env_file.present {
            println!("   ✓ {}", self.env_file.path.display());
        } else {
            println!("   ❌ 不存在: {}", self.env_file.path.display());
            if self.env_template.present {
                println!("      运行时会从 {} 创建", self.env_template.path.display());
            } else {
                println!("   ⚠️  模板也不存在: {}", self.env_template.path.display());
            }
        }
        if let Some(e) = &self.env_parse_error {
            println!("   ⚠️  无法解析: {}", e);
        }
        for key in &self.missing_keys {
            println!("   ⚠️  {} 未设置", key);
        }
        println!();

        println!("📦 3. 虚拟环境");
        match self.venv_state {
            EnvState::Ready => println!("   ✓ {}", self.venv_dir.display()),
            EnvState::Absent => println!("   ○ {}: 不存在，运行时会创建", self.venv_dir.display()),
            EnvState::Broken => println!("   ❌ {}: 找不到解释器", self.venv_dir.display()),
        }
        println!();

        println!("📜 4. 依赖与程序");
        for (label, check) in [
            ("依赖清单", &self.manifest),
            ("连接检查", &self.connectivity_check),
            ("管理器", &self.primary),
            ("端口清理", &self.cleanup),
        ] {
            if check.present {
                println!("   ✓ {}: {}", label, check.path.display());
            } else {
                println!("   ○ {}: 不存在 {}", label, check.path.display());
            }
        }
        println!();

        println!("──────────────────────────────────────────────");
        let (issues, warnings) = (self.issues(), self.warnings());
        if issues == 0 && warnings == 0 {
            println!("✅ 所有检查通过");
        } else {
            if issues > 0 {
                println!("❌ 发现 {} 个问题需要修复", issues);
            }
            if warnings > 0 {
                println!("⚠️  发现 {} 个警告", warnings);
            }
        }
    }
}

/// doctor 命令
pub struct DoctorCommand {
    format: OutputFormat,
}

impl DoctorCommand {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl CommandHandler for DoctorCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let search_path = std::env::var_os("PATH");
        let report = DoctorReport::inspect(&ctx.project_dir, &ctx.config, search_path.as_deref());

        match self.format {
            OutputFormat::JSON => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::ENV => report.print(),
        }

        Ok(0)
    }
}
