//! # TCMS Tester Library / TCMS Tester 库
//!
//! This library runs pytest suites one file at a time, keys every JUnit XML
//! result by the test plan the file declares, and uploads the results to
//! Kiwi TCMS through an external upload command.
//!
//! 此库逐个文件运行 pytest 测试套件，以文件声明的测试计划为键保存每个 JUnit XML 结果，
//! 并通过外部上传命令将结果上传到 Kiwi TCMS。
//!
//! ## Modules / 模块
//!
//! - `core` - Templates, module loading, test runs, recovery and uploads
//! - `infra` - Process execution and file system helpers
//! - `reporting` - Console and HTML batch reports
//! - `cli` / `commands` - Command-line interface and its subcommands
//!
//! - `core` - 模板、模块加载、测试运行、恢复和上传
//! - `infra` - 进程执行和文件系统辅助工具
//! - `reporting` - 控制台和 HTML 批次报告
//! - `cli` / `commands` - 命令行接口及其子命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::models;
pub use crate::core::Tester;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(&resolve_locale(&locale));
}

/// Maps a requested locale onto one that has a message catalog.
/// 将请求的语言环境映射到具有消息目录的语言环境。
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.iter().any(|l| *l == requested) {
        return requested.to_string();
    }
    requested
        .split('-')
        .next()
        .and_then(|lang_code| available_locales.iter().find(|l| **l == lang_code))
        .map(|l| l.to_string())
        .unwrap_or_else(|| "en".to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
