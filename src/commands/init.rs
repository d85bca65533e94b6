//! # Initialization Module / 初始化模块
//!
//! This module provides an interactive command-line wizard that creates a
//! `Tester.toml` file: where the test units live, where results go, and which
//! product, version and build the results are uploaded against.
//!
//! 此模块提供一个交互式命令行向导来创建 `Tester.toml` 文件：
//! 测试单元所在位置、结果输出位置，以及结果上传所针对的产品、版本和构建。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Step-by-step guidance for configuration setup
//! - **Loader Selection**: Choose between executing units or reading declarations
//! - **Overwrite Protection**: Confirmation prompts before overwriting existing configurations
//!
//! - **交互式向导**: 配置设置的逐步指导
//! - **加载器选择**: 在执行测试单元和读取声明之间选择
//! - **覆盖保护**: 覆盖现有配置前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{LoaderKind, TesterConfig, DEFAULT_CONFIG_FILE};
use crate::infra::t;

/// Runs the interactive wizard to generate a `Tester.toml` file.
///
/// With `non_interactive` set, the defaults are written without asking and an
/// existing file is replaced.
///
/// 运行交互式向导以生成 `Tester.toml` 文件。
/// 设置 `non_interactive` 时，将直接写入默认值且替换已有文件。
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_FILE);
    let theme = ColorfulTheme::default();

    let mut config = TesterConfig {
        language: language.to_string(),
        ..TesterConfig::default()
    };

    if non_interactive {
        return write_config(config_path, &config, language);
    }

    println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
    println!("{}", t!("init_wizard_description", locale = language));

    if config_path.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init_overwrite_prompt", locale = language, path = config_path.display()))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let tests_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init_tests_dir_prompt", locale = language))
        .default(config.tests_dir.display().to_string())
        .interact_text()?;
    config.tests_dir = PathBuf::from(tests_dir);

    let output_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init_output_dir_prompt", locale = language))
        .default(config.output_dir.display().to_string())
        .interact_text()?;
    config.output_dir = PathBuf::from(output_dir);

    config.environment.product = Input::with_theme(&theme)
        .with_prompt(t!("init_product_prompt", locale = language))
        .default(config.environment.product.clone())
        .interact_text()?;
    config.environment.version = Input::with_theme(&theme)
        .with_prompt(t!("init_version_prompt", locale = language))
        .default(config.environment.version.clone())
        .interact_text()?;
    config.environment.build = Input::with_theme(&theme)
        .with_prompt(t!("init_build_prompt", locale = language))
        .default(config.environment.build.clone())
        .interact_text()?;

    let loaders = [
        (LoaderKind::Python, t!("init_loader_python", locale = language)),
        (LoaderKind::Declaration, t!("init_loader_declaration", locale = language)),
    ];
    let selection = Select::with_theme(&theme)
        .with_prompt(t!("init_loader_prompt", locale = language))
        .items(&loaders.iter().map(|l| l.1.to_string()).collect::<Vec<_>>())
        .default(0)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
    config.loader.kind = loaders[selection].0;

    write_config(config_path, &config, language)
}

fn write_config(path: &Path, config: &TesterConfig, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(config)
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string).with_context(|| {
        t!("init_write_failed", locale = language, path = path.display()).to_string()
    })?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init_usage_hint", locale = language));

    Ok(())
}
