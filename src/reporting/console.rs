//! # Console Reporting Module / 控制台报告模块
//!
//! Prints colorful end-of-batch summaries of test runs and uploads with
//! internationalization support.
//!
//! 打印测试运行和上传的彩色批次结束摘要，支持国际化。

use colored::*;

use crate::core::coordinator::RunFailure;
use crate::core::models::{RunRecord, UploadReport};
use crate::infra::t;

/// Prints the runs of a batch: one line per recorded artifact followed by
/// the units that could not be run.
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary ---
///   - 42         | results/42-test_a.xml
///   - (no plan)  | results/-test_b.xml
///   - FAILED     | test_c.py: failed to load test module ...
/// ```
///
/// 打印批次中的运行：每个记录的产物一行，随后是无法运行的单元。
pub fn print_run_summary(records: &[RunRecord], failures: &[RunFailure], locale: &str) {
    println!("\n{}", t!("summary.run_banner", locale = locale).bold());

    for record in records {
        println!(
            "  - {:<12} | {}",
            plan_label(&record.plan_id, locale).green(),
            record.artifact_path.display()
        );
    }
    for failure in failures {
        println!(
            "  - {:<12} | {}: {}",
            t!("summary.status_failed", locale = locale).red(),
            failure.filename,
            failure.error
        );
    }
}

/// Prints the outcome of every upload in a batch.
///
/// 打印批次中每次上传的结果。
pub fn print_upload_summary(reports: &[UploadReport], locale: &str) {
    println!("\n{}", t!("summary.upload_banner", locale = locale).bold());

    for report in reports {
        let record = report.record();
        let status = match report {
            UploadReport::Uploaded(outcome) if outcome.is_failure() => {
                t!("summary.status_failed", locale = locale).red()
            }
            UploadReport::Uploaded(_) => t!("summary.status_uploaded", locale = locale).green(),
            UploadReport::Failed { .. } => t!("summary.status_failed", locale = locale).red(),
            UploadReport::NotUploaded(_) => {
                t!("summary.status_not_uploaded", locale = locale).dimmed()
            }
        };
        println!(
            "  - {:<12} | {:<12} | {}",
            status,
            plan_label(&record.plan_id, locale),
            record.artifact_path.display()
        );
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        println!(
            "\n{}",
            t!("summary.upload_failures", locale = locale, count = failed).red().bold()
        );
    } else if reports.iter().any(|r| matches!(r, UploadReport::Uploaded(_))) {
        println!("\n{}", t!("summary.upload_all_ok", locale = locale).green().bold());
    } else if !reports.is_empty() {
        println!("\n{}", t!("summary.upload_skipped", locale = locale).yellow());
    }
}

/// Display label for a plan id; the empty id gets a readable placeholder.
/// 计划 ID 的显示标签；空 ID 使用可读的占位文本。
pub fn plan_label(plan_id: &str, locale: &str) -> String {
    if plan_id.is_empty() {
        t!("summary.no_plan", locale = locale).to_string()
    } else {
        plan_id.to_string()
    }
}
