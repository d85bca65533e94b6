//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the tester:
//! data models, configuration, templates, module loading, test runs,
//! result recovery and uploads.
//!
//! 此模块包含测试器的核心功能：
//! 数据模型、配置、模板、模块加载、测试运行、结果恢复和上传。

pub mod config;
pub mod coordinator;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod loader;
pub mod models;
pub mod recovery;
pub mod templates;
pub mod tester;
pub mod uploader;

// Re-exports
pub use error::{TemplateError, TesterError};
pub use models::RunRecord;
pub use tester::Tester;
