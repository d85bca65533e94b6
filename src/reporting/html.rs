//! # HTML Reporting Module / HTML 报告模块
//!
//! Writes a self-contained HTML page describing a batch: the artifacts each
//! test run produced and what every upload command printed.
//!
//! 生成一个自包含的 HTML 页面来描述一个批次：每次测试运行产生的产物以及每个上传命令的输出。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::coordinator::RunFailure;
use crate::core::models::{RunRecord, UploadReport};
use crate::infra::t;
use crate::reporting::console::plan_label;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Generates an HTML report for a batch.
///
/// # Arguments / 参数
/// * `records` - Records of the runs performed in this process
///               本进程中执行的运行记录
/// * `failures` - Units that could not be run
///                无法运行的单元
/// * `uploads` - Upload outcomes; records left alone without `--upload` appear as `NotUploaded`
///               上传结果；未传入 `--upload` 时记录显示为 `NotUploaded`
/// * `output_path` - The file path where the HTML report will be saved
///                   保存 HTML 报告的文件路径
/// * `locale` - The locale to use for internationalization
///              用于国际化使用的语言环境
///
/// # Errors / 错误
/// Returns an error if the report cannot be written to `output_path`.
/// 如果无法将报告写入 `output_path`，则返回错误。
pub fn generate_html_report(
    records: &[RunRecord],
    failures: &[RunFailure],
    uploads: &[UploadReport],
    output_path: &Path,
    locale: &str,
) -> Result<()> {
    let page = render_report(records, failures, uploads, locale);
    fs::write(output_path, page.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    Ok(())
}

/// Builds the report markup without writing it.
pub fn render_report(
    records: &[RunRecord],
    failures: &[RunFailure],
    uploads: &[UploadReport],
    locale: &str,
) -> Markup {
    let failed_uploads = uploads.iter().filter(|u| u.is_failure()).count();
    let uploaded = uploads
        .iter()
        .filter(|u| matches!(u, UploadReport::Uploaded(outcome) if !outcome.is_failure()))
        .count();
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p class="generated" { (t!("html_report.generated_at", locale = locale, time = &generated)) }

                div class="summary-container" {
                    (summary_item(records.len(), &t!("html_report.summary.runs", locale = locale), ""))
                    (summary_item(failures.len(), &t!("html_report.summary.load_failures", locale = locale), "failed-text"))
                    (summary_item(uploaded, &t!("html_report.summary.uploaded", locale = locale), "passed-text"))
                    (summary_item(failed_uploads, &t!("html_report.summary.upload_failures", locale = locale), "failed-text"))
                }

                h2 { (t!("html_report.runs_header", locale = locale)) }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.plan", locale = locale)) }
                            th { (t!("html_report.table.artifact", locale = locale)) }
                        }
                    }
                    tbody {
                        @for record in records {
                            tr {
                                td { (plan_label(&record.plan_id, locale)) }
                                td { code { (record.artifact_path.display().to_string()) } }
                            }
                        }
                        @for failure in failures {
                            tr class="status-Failed" {
                                td { (failure.filename) }
                                td { pre class="output-content" { (failure.error.to_string()) } }
                            }
                        }
                    }
                }

                @if !uploads.is_empty() {
                    h2 { (t!("html_report.uploads_header", locale = locale)) }
                    table {
                        thead {
                            tr {
                                th { (t!("html_report.table.plan", locale = locale)) }
                                th class="status-col" { (t!("html_report.table.status", locale = locale)) }
                                th { (t!("html_report.table.details", locale = locale)) }
                            }
                        }
                        tbody {
                            @for upload in uploads {
                                (upload_row(upload, locale))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn summary_item(count: usize, label: &str, class: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn upload_row(upload: &UploadReport, locale: &str) -> Markup {
    let record = upload.record();
    let (status_class, status) = if upload.is_failure() {
        ("status-Failed", t!("summary.status_failed", locale = locale))
    } else if matches!(upload, UploadReport::NotUploaded(_)) {
        ("status-Skipped", t!("summary.status_not_uploaded", locale = locale))
    } else {
        ("status-Passed", t!("summary.status_uploaded", locale = locale))
    };

    html! {
        tr {
            td { (plan_label(&record.plan_id, locale)) }
            td class="status-col" { div class={ "status-cell " (status_class) } { (status) } }
            td {
                @match upload {
                    UploadReport::Uploaded(outcome) => {
                        code { (outcome.command) }
                        p { (t!("html_report.exit_status", locale = locale, status = outcome.status)) }
                        @if !outcome.stdout.is_empty() {
                            pre class="output-content" { (outcome.stdout_text()) }
                        }
                        @if !outcome.stderr.is_empty() {
                            pre class="output-content stderr" { (outcome.stderr_text()) }
                        }
                    }
                    UploadReport::Failed { error, .. } => {
                        pre class="output-content stderr" { (error) }
                    }
                    UploadReport::NotUploaded(record) => {
                        code { (record.artifact_path.display().to_string()) }
                    }
                }
            }
        }
    }
}
