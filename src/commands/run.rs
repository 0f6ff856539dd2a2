//! run / cleanup 命令处理器

use super::{CommandContext, CommandHandler};
use crate::core::Orchestrator;
use crate::error::Result;
use crate::types::Target;
use crate::utils::executor::{CommandExecutor, ProcessRunner};

/// 引导环境后运行目标程序
pub struct RunCommand<R = CommandExecutor> {
    target: Target,
    runner: R,
}

impl RunCommand {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            runner: CommandExecutor,
        }
    }
}

impl<R: ProcessRunner> RunCommand<R> {
    pub fn with_runner(target: Target, runner: R) -> Self {
        Self { target, runner }
    }
}

impl<R: ProcessRunner> CommandHandler for RunCommand<R> {
    fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let mut orchestrator =
            Orchestrator::new(&ctx.project_dir, ctx.config.clone(), &self.runner);
        let report = orchestrator.run(self.target)?;

        if ctx.verbose {
            let trail: Vec<String> = report.trail.iter().map(|p| p.to_string()).collect();
            println!("阶段: {}", trail.join(" → "));
        }
        if report.exit_code != 0 {
            println!("⚠️  {} 以退出码 {} 结束", self.target, report.exit_code);
        }

        Ok(report.exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LauncherConfig;
    use crate::test_utils::{ScriptedRunner, TempProject};

    fn context(project: &TempProject) -> CommandContext {
        CommandContext {
            verbose: true,
            project_dir: project.path().to_path_buf(),
            config: LauncherConfig {
                interpreter: project.system_interpreter().to_string_lossy().into_owned(),
                ..LauncherConfig::default()
            },
        }
    }

    #[test]
    fn exit_code_comes_from_target_program() {
        let project = TempProject::configured();
        let runner = ScriptedRunner::new().with_exit("cleanup_ports.py", 3);
        let command = RunCommand::with_runner(Target::Cleanup, runner);

        assert_eq!(command.execute(&context(&project)).unwrap(), 3);
    }

    #[test]
    fn gate_failure_is_an_error() {
        let project = TempProject::fresh();
        let command = RunCommand::with_runner(Target::Manager, ScriptedRunner::new());

        assert!(command.execute(&context(&project)).is_err());
    }
}
