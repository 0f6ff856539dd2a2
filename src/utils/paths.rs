//! 跨平台路径处理工具 (传统原则：常识性接口设计)

use crate::error::{BootstrapError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// 检查文件是否存在
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// 是否为可执行文件
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// 是否为可执行文件
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    file_exists(path)
}

/// 名称中带目录（或是绝对路径）时视为显式路径，不在 PATH 中查找
pub fn is_explicit_path(name: &str) -> bool {
    let path = Path::new(name);
    path.is_absolute() || path.components().count() > 1
}

/// 相对路径以当前工作目录为基准转为绝对路径
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// 在搜索路径中查找可执行程序
///
/// `name` 含路径分隔符时视为显式路径，只检查该文件本身
pub fn find_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let candidate = Path::new(name);
    if is_explicit_path(name) {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| executable_names(name).into_iter().map(move |n| dir.join(n)))
        .find(|path| is_executable(path))
}

/// Windows 上按 PATHEXT 补全扩展名
fn executable_names(name: &str) -> Vec<String> {
    if !cfg!(windows) || Path::new(name).extension().is_some() {
        return vec![name.to_string()];
    }

    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT".to_string());
    std::iter::once(name.to_string())
        .chain(
            exts.split(';')
                .filter(|e| !e.is_empty())
                .map(|e| format!("{}{}", name, e.to_lowercase())),
        )
        .collect()
}

/// 从模板创建文件
///
/// 目标已存在时不覆盖，返回 `false`；悬空的符号链接也算已存在
pub fn seed_from_template(template: &Path, target: &Path) -> Result<bool> {
    if target.symlink_metadata().is_ok() {
        return Ok(false);
    }
    if !file_exists(template) {
        return Err(BootstrapError::TemplateMissing(template.to_path_buf()));
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::copy(template, target)?;
    Ok(true)
}

/// 读取文件内容，返回错误时提供详细信息
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(BootstrapError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("文件不存在: {}", path.display()),
        )));
    }
    std::fs::read_to_string(path).map_err(|e| {
        BootstrapError::Io(std::io::Error::new(
            e.kind(),
            format!("读取文件 {} 失败: {}", path.display(), e),
        ))
    })
}
