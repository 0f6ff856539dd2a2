//! 测试工具模块
//!
//! 提供脚本化的子进程执行器和临时项目目录，测试不会启动真实的 Python

use crate::core::venv::IsolatedEnv;
use crate::error::Result;
use crate::utils::executor::{Invocation, ProcessRunner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 写入文件并设置可执行权限
pub fn make_executable(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// 伪造一个带解释器的虚拟环境目录
pub fn fake_venv(root: &Path) {
    let env = IsolatedEnv::new(root);
    make_executable(&env.interpreter(), "");
}

/// 记录调用并按参数返回预设退出码的执行器
///
/// `python -m venv <dir>` 成功时会像真实解释器一样创建环境目录
#[derive(Default)]
pub struct ScriptedRunner {
    exits: HashMap<String, i32>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 参数（或参数的文件名）等于 `key` 的调用返回 `code`
    pub fn with_exit(mut self, key: &str, code: i32) -> Self {
        self.exits.insert(key.to_string(), code);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// 调用过的脚本或模块名，按顺序
    pub fn steps(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|inv| match inv.args.first().and_then(|a| a.to_str()) {
                Some("-m") => inv.args[1].to_string_lossy().into_owned(),
                _ => inv
                    .args
                    .first()
                    .and_then(|a| Path::new(a).file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn exit_for(&self, invocation: &Invocation) -> i32 {
        invocation
            .args
            .iter()
            .find_map(|arg| {
                let name = Path::new(arg)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.exits
                    .get(&*arg.to_string_lossy())
                    .or_else(|| name.and_then(|n| self.exits.get(&n)))
                    .copied()
            })
            .unwrap_or(0)
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        self.calls.borrow_mut().push(invocation.clone());
        let code = self.exit_for(invocation);

        let is_venv = invocation.args.len() == 3
            && invocation.args[0] == "-m"
            && invocation.args[1] == "venv";
        if is_venv && code == 0 {
            fake_venv(Path::new(&invocation.args[2]));
        }

        Ok(code)
    }
}

/// 临时项目目录
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    /// 只有模板的全新检出
    pub fn fresh() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        project.write(
            ".env.example",
            "VK_CLOUD_AUTH_TOKEN=\nVK_CLOUD_PROJECT_ID=\nVM_ID=\nEXTERNAL_NETWORK_ID=ext-net\n",
        );
        project.write("requirements.txt", "requests>=2.31.0\npython-dotenv>=1.0.0\n");
        project
    }

    /// 已填写 .env 的项目
    pub fn configured() -> Self {
        let project = Self::fresh();
        project.write(
            ".env",
            "VK_CLOUD_AUTH_TOKEN=token\nVK_CLOUD_PROJECT_ID=project\nVM_ID=vm-1\nEXTERNAL_NETWORK_ID=ext-net\n",
        );
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// 一个可以通过解释器检查的“系统解释器”
    pub fn system_interpreter(&self) -> PathBuf {
        let path = self.join("system-bin/python3");
        if !path.exists() {
            make_executable(&path, "");
        }
        path
    }
}
