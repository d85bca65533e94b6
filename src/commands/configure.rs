//! # Configure Command Module / 配置命令模块
//!
//! Implements the `configure` command, which writes the Kiwi TCMS credentials
//! file from the connection settings given on the command line.
//!
//! 实现 `configure` 命令，根据命令行给出的连接设置写入 Kiwi TCMS 凭据文件。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::{
    commands::prepare,
    core::{config::TesterConfig, models::ConnectionConfig, Tester},
    infra::t,
};

/// Executes the configure command.
///
/// A missing configuration file is not an error here: the defaults apply and
/// the credentials go to `~/.tcms.conf`.
///
/// 执行 configure 命令。此处缺少配置文件不是错误：将使用默认值，凭据写入 `~/.tcms.conf`。
pub fn execute(
    config: PathBuf,
    url: String,
    username: String,
    password: String,
    lang_override: Option<String>,
) -> Result<()> {
    let (config, locale) = if config.exists() {
        prepare(&config, lang_override)?
    } else {
        let defaults = TesterConfig::default().resolve_paths(Path::new("."))?;
        let locale = crate::resolve_locale(lang_override.as_deref().unwrap_or(&defaults.language));
        rust_i18n::set_locale(&locale);
        (defaults, locale)
    };

    let tester =
        Tester::from_config(&config).context(t!("tester_setup_failed", locale = locale).to_string())?;
    let connection = ConnectionConfig::new(url, username, password);
    let written = tester
        .configure_credentials(&connection)
        .with_context(|| {
            t!("credentials_write_failed", locale = locale, path = tester.credentials_path().display())
                .to_string()
        })?;

    println!(
        "{} {}",
        "✔".green(),
        t!("credentials_written", locale = locale, path = written.display()).bold()
    );
    Ok(())
}
