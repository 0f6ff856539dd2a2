//! vkboot 主程序入口
//!
//! 设计原则：
//! - 入口代码简洁，逻辑委托给各模块
//! - 快速失败：任何一道关卡失败都以非零状态退出
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use clap::Parser;
use vkboot::app::Application;
use vkboot::cli::Cli;
use vkboot::logging;

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let app = match Application::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            e.report(cli.verbose);
            std::process::exit(e.exit_code());
        }
    };

    match app.run(cli.command()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            e.report(cli.verbose);
            std::process::exit(e.exit_code());
        }
    }
}
