//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which executes every test unit
//! (or a single one) in the configured test directory, optionally uploads the
//! results right away and writes an HTML report.
//!
//! 此模块实现了 `run` 命令，它执行配置的测试目录中的所有测试单元（或单个单元），
//! 可选择立即上传结果并生成 HTML 报告。

use anyhow::{bail, Context, Result};
use colored::*;
use std::path::PathBuf;

use crate::{
    commands::prepare,
    core::{coordinator::RunFailure, models::UploadReport, Tester},
    infra::{fs::is_directory, t},
    reporting::{generate_html_report, print_run_summary, print_upload_summary},
};

/// Options of the `run` subcommand / `run` 子命令的选项
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PathBuf,
    /// Run only this file from the test directory / 仅运行测试目录中的此文件
    pub file: Option<String>,
    /// Case-name filter for a single file / 单个文件的用例名过滤器
    pub filter: Option<String>,
    /// Upload the results after the runs / 运行后上传结果
    pub upload: bool,
    pub html: Option<PathBuf>,
}

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `options` - Parsed `run` arguments
/// * `lang_override` - Language given with `--lang`, if any
///
/// # Returns
/// An error if the configuration is unusable, a single requested file could
/// not be run, or every discovered unit failed to run.
pub async fn execute(options: RunOptions, lang_override: Option<String>) -> Result<()> {
    let (config, locale) = prepare(&options.config, lang_override)?;

    if !is_directory(&config.tests_dir) {
        bail!(t!("tests_dir_not_found", locale = locale, path = config.tests_dir.display()).to_string());
    }
    println!(
        "{}",
        t!("tests_dir_detected", locale = locale, path = config.tests_dir.display())
    );
    println!(
        "{}",
        t!("output_dir_detected", locale = locale, path = config.output_dir.display())
    );

    let mut tester = Tester::from_config(&config).context(t!("tester_setup_failed", locale = locale).to_string())?;

    let failures: Vec<RunFailure> = match &options.file {
        Some(file) => {
            let filter = options.filter.as_deref().unwrap_or_default();
            tester
                .run_one(file, filter)
                .await
                .with_context(|| t!("single_run_failed", locale = locale, name = file).to_string())?;
            Vec::new()
        }
        None => tester
            .run_all()
            .await
            .context(t!("discovery_failed", locale = locale).to_string())?,
    };

    print_run_summary(tester.records(), &failures, &locale);

    if tester.records().is_empty() && !failures.is_empty() {
        bail!(t!("all_runs_failed", locale = locale, count = failures.len()).to_string());
    }
    if tester.records().is_empty() {
        println!("{}", t!("no_units_found", locale = locale).yellow());
    }

    let uploads = if options.upload && !tester.records().is_empty() {
        let reports = tester
            .upload_all()
            .await
            .context(t!("upload_failed", locale = locale).to_string())?;
        print_upload_summary(&reports, &locale);
        reports
    } else {
        let skipped: Vec<UploadReport> = tester
            .records()
            .iter()
            .cloned()
            .map(UploadReport::NotUploaded)
            .collect();
        if !skipped.is_empty() {
            print_upload_summary(&skipped, &locale);
        }
        skipped
    };

    if let Some(report_path) = &options.html {
        println!(
            "\n{}",
            t!("html_report_generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(tester.records(), &failures, &uploads, report_path, &locale) {
            eprintln!("{} {}", t!("html_report_failed", locale = locale).red(), e);
        }
    }

    Ok(())
}
