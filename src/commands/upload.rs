//! # Upload Command Module / 上传命令模块
//!
//! Implements the `upload` command. Nothing runs in this process, so every
//! artifact is recovered from the output directory and uploaded in turn.
//!
//! 实现 `upload` 命令。此进程中没有执行任何运行，因此所有产物都从输出目录中恢复并依次上传。

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use crate::{
    commands::prepare,
    core::Tester,
    infra::t,
    reporting::{generate_html_report, print_upload_summary},
};

/// Executes the upload command.
///
/// # Arguments
/// * `config` - Path of the configuration file
/// * `html` - Where to write an HTML report, if anywhere
/// * `lang_override` - Language given with `--lang`, if any
pub async fn execute(config: PathBuf, html: Option<PathBuf>, lang_override: Option<String>) -> Result<()> {
    let (config, locale) = prepare(&config, lang_override)?;

    println!(
        "{}",
        t!("output_dir_detected", locale = locale, path = config.output_dir.display())
    );

    let mut tester =
        Tester::from_config(&config).context(t!("tester_setup_failed", locale = locale).to_string())?;
    let reports = tester
        .upload_all()
        .await
        .context(t!("upload_failed", locale = locale).to_string())?;

    if reports.is_empty() {
        println!("{}", t!("no_artifacts_found", locale = locale).yellow());
    } else {
        print_upload_summary(&reports, &locale);
    }

    if let Some(report_path) = &html {
        println!(
            "\n{}",
            t!("html_report_generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&[], &[], &reports, report_path, &locale) {
            eprintln!("{} {}", t!("html_report_failed", locale = locale).red(), e);
        }
    }

    Ok(())
}
