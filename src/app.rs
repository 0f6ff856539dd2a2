//! 应用程序容器
//!
//! 负责加载启动配置、组装命令上下文并分发命令

use crate::cli::{self, Cli, Commands};
use crate::commands::{CommandContext, CommandHandler, DoctorCommand, RunCommand};
use crate::config::LauncherConfig;
use crate::error::Result;
use crate::utils::paths;
use std::path::{Path, PathBuf};

/// 应用程序容器
pub struct Application {
    pub context: CommandContext,
}

impl Application {
    /// 根据命令行参数创建应用程序实例
    pub fn new(cli: &Cli) -> Result<Self> {
        // 子进程的工作目录和参数都以项目目录为基准，必须先转为绝对路径
        let project_dir = match &cli.project_dir {
            Some(dir) => paths::absolutize(dir)?,
            None => std::env::current_dir()?,
        };

        let mut config = LauncherConfig::load(&project_dir, cli.config.as_deref())?;
        if let Some(interpreter) = &cli.interpreter {
            // 命令行给出的相对路径以启动器的工作目录为基准
            config.interpreter = if paths::is_explicit_path(interpreter) {
                paths::absolutize(Path::new(interpreter))?
                    .to_string_lossy()
                    .into_owned()
            } else {
                interpreter.clone()
            };
        }

        Ok(Self {
            context: CommandContext {
                verbose: cli.verbose,
                project_dir,
                config,
            },
        })
    }

    pub fn project_dir(&self) -> &PathBuf {
        &self.context.project_dir
    }

    /// 执行命令，返回进程退出码
    pub fn run(&self, command: Commands) -> Result<i32> {
        tracing::debug!(?command, project = %self.project_dir().display(), "执行命令");

        match command {
            Commands::Doctor { format } => {
                DoctorCommand::new(cli::parse_format(&format)).execute(&self.context)
            }
            other => match other.target() {
                Some(target) => RunCommand::new(target).execute(&self.context),
                None => Ok(0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TempProject;
    use clap::Parser;

    #[test]
    fn interpreter_flag_overrides_settings() {
        let project = TempProject::fresh();
        project.write("bootstrap.toml", "interpreter = \"python3.9\"\n");
        let dir = project.path().to_string_lossy().into_owned();

        let cli = Cli::parse_from(["vkboot", "-C", &dir, "--interpreter", "pypy3"]);
        let app = Application::new(&cli).unwrap();
        assert_eq!(app.context.config.interpreter, "pypy3");

        let cli = Cli::parse_from(["vkboot", "-C", &dir]);
        let app = Application::new(&cli).unwrap();
        assert_eq!(app.context.config.interpreter, "python3.9");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let cli = Cli::parse_from(["vkboot", "-C", "proj", "--interpreter", "bin/python3"]);
        let app = Application::new(&cli).unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert!(app.project_dir().is_absolute());
        assert_eq!(app.project_dir(), &cwd.join("proj"));
        assert_eq!(
            PathBuf::from(&app.context.config.interpreter),
            cwd.join("bin/python3")
        );
    }

    #[test]
    fn invalid_settings_fail_early() {
        let project = TempProject::fresh();
        project.write("bootstrap.toml", "interpreter = 3\n");
        let dir = project.path().to_string_lossy().into_owned();

        let cli = Cli::parse_from(["vkboot", "-C", &dir]);
        assert!(Application::new(&cli).is_err());
    }
}
