//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations, such as
//! listing directory entries, installing bundled support files, writing
//! owner-only files and expanding user-supplied paths.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如列出目录条目、安装内置支持文件以及展开用户提供的路径。

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the names of regular files in `dir` that satisfy `keep`, in the order
/// the file system enumerates them.
///
/// # Arguments
/// * `dir` - Directory to list
/// * `keep` - Predicate applied to each file name
///
/// # Returns
/// File names (not paths) of matching entries
///
/// 按文件系统枚举顺序列出 `dir` 中满足 `keep` 的普通文件名。
pub fn list_file_names<F>(dir: &Path, keep: F) -> io::Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // Non UTF-8 names cannot be rendered into templates, skip them.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if keep(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Writes `contents` to `path` only if nothing exists there yet.
///
/// # Returns
/// `true` if the file was created, `false` if an existing file was kept
///
/// 仅当 `path` 处尚无文件时写入 `contents`。
/// 若创建了文件返回 `true`，若保留了现有文件返回 `false`。
pub fn install_if_absent(path: &Path, contents: &str) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, contents)?;
    Ok(true)
}

/// Writes `contents` to `path`, readable and writable by the owner only.
///
/// On unix the file is created with mode `0o600`, and an existing file is
/// narrowed to that mode before it is truncated. Elsewhere this is a plain
/// write.
///
/// 将 `contents` 写入 `path`，仅所有者可读写。
/// 在 unix 上以 `0o600` 模式创建文件，已存在的文件在截断前先收紧为该模式。
#[cfg(unix)]
pub fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    if path.exists() {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
pub fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}

/// Expands `~` and environment variables in a path.
/// 展开路径中的 `~` 和环境变量。
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
