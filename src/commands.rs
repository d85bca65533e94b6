//! # Commands Module / 命令模块
//!
//! Implementations of the CLI subcommands. Each one loads the configuration,
//! settles the output language and drives the `Tester`.
//!
//! CLI 子命令的实现。每个子命令加载配置、确定输出语言并驱动 `Tester`。

pub mod configure;
pub mod init;
pub mod run;
pub mod upload;

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::config::{load_config, TesterConfig};
use crate::infra::t;

/// Loads the configuration and activates the language it asks for, unless
/// `--lang` was given explicitly.
///
/// 加载配置并启用其要求的语言，除非显式指定了 `--lang`。
pub(crate) fn prepare(config_path: &Path, lang_override: Option<String>) -> Result<(TesterConfig, String)> {
    let config = load_config(config_path).with_context(|| {
        t!("config_load_failed", path = config_path.display()).to_string()
    })?;
    let locale = crate::resolve_locale(lang_override.as_deref().unwrap_or(&config.language));
    rust_i18n::set_locale(&locale);
    Ok((config, locale))
}
