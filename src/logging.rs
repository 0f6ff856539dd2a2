//! 日志初始化
//!
//! 状态行直接打印到 stdout，tracing 日志只输出到 stderr，默认只显示警告

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 默认过滤规则，RUST_LOG 优先
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "vkboot=debug" } else { "vkboot=warn" }
}

pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // 重复初始化（例如测试中）时忽略
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_switches_to_debug() {
        assert_eq!(default_filter(true), "vkboot=debug");
        assert_eq!(default_filter(false), "vkboot=warn");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_cli_logger(false);
        init_cli_logger(true);
    }
}
