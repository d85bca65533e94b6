//! # Error Taxonomy Module / 错误分类模块
//!
//! Typed errors raised by the orchestration core. The command layer wraps
//! these in `anyhow` with user-facing context.
//!
//! 编排核心抛出的类型化错误。命令层使用 `anyhow` 为其添加面向用户的上下文。

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the tester core.
/// 测试器核心产生的错误。
#[derive(Debug, Error)]
pub enum TesterError {
    /// The test unit raised an error while its top level was executed.
    /// 测试单元在执行其顶层代码时抛出了错误。
    #[error("failed to load test module '{module}' from {}: {message}", .path.display())]
    ModuleLoad {
        module: String,
        path: PathBuf,
        message: String,
    },

    /// The run could not start because its test unit failed to load.
    /// 由于测试单元加载失败，运行无法开始。
    #[error("test run for '{filename}' aborted: {source}")]
    TestLoadFailure {
        filename: String,
        #[source]
        source: Box<TesterError>,
    },

    /// The external test engine could not be launched.
    /// 无法启动外部测试引擎。
    #[error("failed to launch test engine '{program}': {source}")]
    EngineLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A file (credentials, support hook or artifact directory) could not be written.
    /// 无法写入文件（凭据、支持钩子或产物目录）。
    #[error("cannot write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be listed.
    /// 无法列出目录。
    #[error("cannot read directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template rendering failed.
    /// 模板渲染失败。
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The rendered upload command could not be turned into a process.
    /// 渲染后的上传命令无法转换为进程。
    #[error("invalid upload command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },

    /// The upload command could not be spawned at all.
    /// 上传命令根本无法启动。
    #[error("failed to execute upload command '{program}': {source}")]
    UploadLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while parsing or rendering a template.
/// 解析或渲染模板时引发的错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' references '${{{placeholder}}}' but no value was supplied")]
    MissingValue {
        template: String,
        placeholder: String,
    },
    #[error("template '{template}' has an invalid placeholder at byte {offset}")]
    InvalidPlaceholder { template: String, offset: usize },
    #[error("template '{template}' has unbalanced quotes")]
    UnbalancedQuotes { template: String },
    #[error("cannot read template {path}: {message}")]
    Read { path: String, message: String },
}

pub type Result<T, E = TesterError> = std::result::Result<T, E>;
