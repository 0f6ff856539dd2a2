//! 启动配置 (bootstrap.toml)
//!
//! 文件可选，缺省时全部使用默认值；相对路径以项目目录为基准

pub mod format;

use crate::error::{BootstrapError, Result};
use crate::types::Target;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 项目目录下默认的启动配置文件名
pub const SETTINGS_FILE: &str = "bootstrap.toml";

/// 启动配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// 系统解释器名称或路径
    pub interpreter: String,
    pub env_file: PathBuf,
    pub env_template: PathBuf,
    pub venv_dir: PathBuf,
    /// 依赖清单
    pub manifest: PathBuf,
    pub connectivity_check: PathBuf,
    pub primary: PathBuf,
    pub cleanup: PathBuf,
    /// .env 中外部程序需要的键
    pub required_keys: Vec<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            env_file: PathBuf::from(".env"),
            env_template: PathBuf::from(".env.example"),
            venv_dir: PathBuf::from("venv"),
            manifest: PathBuf::from("requirements.txt"),
            connectivity_check: PathBuf::from("test_connection.py"),
            primary: PathBuf::from("vk_cloud_interface_manager.py"),
            cleanup: PathBuf::from("cleanup_ports.py"),
            required_keys: [
                "VK_CLOUD_AUTH_TOKEN",
                "VK_CLOUD_PROJECT_ID",
                "VM_ID",
                "EXTERNAL_NETWORK_ID",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

impl LauncherConfig {
    /// 从 TOML 文本解析
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| BootstrapError::SettingsParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// 加载启动配置
    ///
    /// - 显式指定的文件必须存在
    /// - 未指定时读取 `<project_dir>/bootstrap.toml`，不存在则使用默认值
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                let path = resolve(project_dir, path);
                if !path.is_file() {
                    return Err(BootstrapError::SettingsNotFound(path));
                }
                path
            }
            None => {
                let path = project_dir.join(SETTINGS_FILE);
                if !path.is_file() {
                    tracing::debug!(path = %path.display(), "未找到启动配置，使用默认值");
                    return Ok(Self::default());
                }
                path
            }
        };

        tracing::debug!(path = %path.display(), "加载启动配置");
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content, &path)
    }

    /// 最后一步要运行的程序
    pub fn target_program(&self, target: Target) -> &Path {
        match target {
            Target::Manager => &self.primary,
            Target::Cleanup => &self.cleanup,
        }
    }
}

/// 相对路径以项目目录为基准
pub fn resolve(project_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_manager_layout() {
        let config = LauncherConfig::default();
        assert_eq!(config.interpreter, "python3");
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert_eq!(config.venv_dir, PathBuf::from("venv"));
        assert_eq!(config.required_keys.len(), 4);
        assert_eq!(
            config.target_program(Target::Cleanup),
            Path::new("cleanup_ports.py")
        );
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = LauncherConfig::from_toml(
            "interpreter = \"python3.12\"\nvenv_dir = \".venv\"\n",
            Path::new(SETTINGS_FILE),
        )
        .unwrap();

        assert_eq!(config.interpreter, "python3.12");
        assert_eq!(config.venv_dir, PathBuf::from(".venv"));
        assert_eq!(config.manifest, PathBuf::from("requirements.txt"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = LauncherConfig::from_toml("retries = 3\n", Path::new(SETTINGS_FILE))
            .unwrap_err();
        assert!(matches!(err, BootstrapError::SettingsParse { .. }));
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = LauncherConfig::load(dir.path(), None).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn load_reads_project_settings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "primary = \"main.py\"\n").unwrap();

        let config = LauncherConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.primary, PathBuf::from("main.py"));
    }

    #[test]
    fn explicit_settings_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = LauncherConfig::load(dir.path(), Some(Path::new("missing.toml"))).unwrap_err();
        assert!(matches!(err, BootstrapError::SettingsNotFound(_)));
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let base = Path::new("/project");
        assert_eq!(resolve(base, Path::new(".env")), PathBuf::from("/project/.env"));
        let absolute = std::env::temp_dir().join("x.env");
        assert_eq!(resolve(base, &absolute), absolute);
    }
}
