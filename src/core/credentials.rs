//! # Credentials Writer Module / 凭据写入模块
//!
//! Renders the Kiwi TCMS credentials template and writes it to the per-user
//! configuration file read by the upload tooling (`~/.tcms.conf` by default).
//! The file is stored unencrypted, replaced on every call and, on unix, kept
//! readable by its owner only (`0o600`).
//!
//! 渲染 Kiwi TCMS 凭据模板，并将其写入上传工具读取的用户级配置文件
//! （默认为 `~/.tcms.conf`）。该文件以未加密形式存储，每次调用都会被替换，
//! 在 unix 上仅所有者可读写（`0o600`）。

use std::path::{Path, PathBuf};

use crate::core::error::{Result, TesterError};
use crate::core::models::ConnectionConfig;
use crate::core::templates::Template;
use crate::infra::fs::write_private;

/// Writes Kiwi TCMS connection settings to a fixed path.
/// 将 Kiwi TCMS 连接设置写入固定路径。
#[derive(Debug, Clone)]
pub struct CredentialsWriter {
    template: Template,
    target: PathBuf,
}

impl CredentialsWriter {
    pub fn new(template: Template, target: impl Into<PathBuf>) -> Self {
        Self {
            template,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renders the credentials file text without touching the disk.
    /// 渲染凭据文件文本而不写入磁盘。
    pub fn render(&self, config: &ConnectionConfig) -> Result<String> {
        Ok(self.template.render(&config.template_values())?)
    }

    /// Normalizes the service URL, renders the template and overwrites the
    /// target file with owner-only permissions. No backup of the previous file
    /// is kept.
    ///
    /// # Errors
    /// [`TesterError::Template`] if the template needs a value that is not
    /// provided, [`TesterError::FileWrite`] if the target is not writable.
    ///
    /// 规范化服务 URL、渲染模板并覆盖目标文件。不保留旧文件的备份。
    pub fn write(&self, config: &ConnectionConfig) -> Result<PathBuf> {
        let text = self.render(config)?;
        write_private(&self.target, &text).map_err(|source| TesterError::FileWrite {
            path: self.target.clone(),
            source,
        })?;
        Ok(self.target.clone())
    }
}
