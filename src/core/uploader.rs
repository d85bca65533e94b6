//! # Uploader Module / 上传模块
//!
//! Sends JUnit artifacts to Kiwi TCMS by rendering the upload command template
//! for each run record and executing the result as a process. Success is judged
//! by the command's stderr: any output there marks the upload as failed. The
//! exit status is captured as well and becomes decisive in strict mode.
//!
//! 通过为每条运行记录渲染上传命令模板并将结果作为进程执行，将 JUnit 产物发送到 Kiwi TCMS。
//! 成功与否由命令的 stderr 判断：其中有任何输出即视为上传失败。
//! 退出状态也会被捕获，并在严格模式下起决定作用。

use colored::*;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::error::{Result, TesterError};
use crate::core::models::{RunRecord, UploadEnvironment, UploadOutcome, UploadReport, UploadState};
use crate::core::recovery::recover_from_output_dir;
use crate::core::templates::Template;
use crate::infra::command::{spawn_and_capture, CommandLine};
use crate::infra::t;

/// Renders and runs upload commands, one record at a time.
/// 逐条记录渲染并运行上传命令。
#[derive(Debug, Clone)]
pub struct Uploader {
    template: Template,
    environment: UploadEnvironment,
    output_dir: PathBuf,
    strict_exit_status: bool,
}

impl Uploader {
    pub fn new(
        template: Template,
        environment: UploadEnvironment,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template,
            environment,
            output_dir: output_dir.into(),
            strict_exit_status: false,
        }
    }

    /// Makes a non-zero exit status count as a failure too.
    pub fn with_strict_exit_status(mut self, strict: bool) -> Self {
        self.strict_exit_status = strict;
        self
    }

    pub fn environment(&self) -> &UploadEnvironment {
        &self.environment
    }

    /// Renders the upload command for `record` into its argument words. The
    /// environment's plan id is set to the record's plan id first. The
    /// template is split into words before substitution, so each value stays
    /// verbatim inside the word that holds its placeholder.
    ///
    /// 为 `record` 将上传命令渲染为参数单词。首先将环境的计划 ID 设置为记录的计划 ID。
    /// 模板在替换之前就被拆分为单词，因此每个值都原样保留在包含其占位符的单词中。
    pub fn render(&mut self, record: &RunRecord) -> Result<Vec<String>> {
        self.environment.plan_id = record.plan_id.clone();
        let artifact = record.artifact_path.display().to_string();
        let values: HashMap<&str, String> = self.environment.template_values(&artifact).into_iter().collect();
        Ok(self.template.render_words(&values)?)
    }

    /// Uploads one artifact and reports what the command printed.
    ///
    /// # Returns
    /// The captured outcome; inspect [`UploadOutcome::is_failure`] for the verdict.
    ///
    /// # Errors
    /// Rendering errors, an unparsable command line, or a command that cannot
    /// be spawned. A command that runs and complains is not an `Err`.
    ///
    /// 上传一个产物并报告命令的输出。
    pub async fn upload_one(&mut self, record: &RunRecord) -> Result<UploadOutcome> {
        let mut state = UploadState::Pending;
        println!(
            "{}",
            t!("upload.uploading", plan = &record.plan_id, path = record.artifact_path.display()).blue()
        );

        let words = self.render(record)?;
        state = advance(state, UploadState::Rendered);

        let rendered = shlex::try_join(words.iter().map(String::as_str))
            .unwrap_or_else(|_| words.join(" "));
        let command_line = CommandLine::from_words(words).map_err(|reason| {
            TesterError::InvalidCommand {
                command: rendered.clone(),
                reason,
            }
        })?;

        state = advance(state, UploadState::Executing);
        let captured = spawn_and_capture(command_line.to_command())
            .await
            .map_err(|source| TesterError::UploadLaunch {
                program: command_line.program.clone(),
                source,
            })?;
        state = advance(state, UploadState::Completed);

        let outcome = UploadOutcome {
            record: record.clone(),
            command: rendered,
            stdout: captured.stdout,
            stderr: captured.stderr,
            status: captured.status,
            state,
            strict_exit_status: self.strict_exit_status,
        };
        report_outcome(&outcome);
        Ok(outcome)
    }

    /// Uploads every record in order. With no records, the output directory is
    /// scanned for artifacts left by an earlier run and those are uploaded.
    /// A failing upload is reported and the batch moves on.
    ///
    /// # Errors
    /// Only when recovery is needed and the output directory cannot be read.
    ///
    /// 按顺序上传每条记录。若没有记录，则扫描输出目录中先前运行留下的产物并上传。
    /// 失败的上传会被报告，批次继续进行。
    pub async fn upload_all(&mut self, records: &[RunRecord]) -> Result<Vec<UploadReport>> {
        let recovered;
        let records = if records.is_empty() {
            println!("{}", t!("upload.recovering", path = self.output_dir.display()).yellow());
            recovered = recover_from_output_dir(&self.output_dir)?;
            recovered.as_slice()
        } else {
            records
        };

        println!("\n{}\n", t!("upload.batch_started", count = records.len()).bold());
        let mut reports = Vec::with_capacity(records.len());
        for record in records {
            let report = match self.upload_one(record).await {
                Ok(outcome) => UploadReport::Uploaded(outcome),
                Err(e) => {
                    eprintln!("{} {}\n", t!("upload.error_prefix").red().bold(), e);
                    UploadReport::Failed {
                        record: record.clone(),
                        error: e.to_string(),
                    }
                }
            };
            reports.push(report);
        }
        println!("{}", t!("upload.batch_finished").bold());
        Ok(reports)
    }
}

fn advance(from: UploadState, to: UploadState) -> UploadState {
    debug_assert!(
        matches!(
            (from, to),
            (UploadState::Pending, UploadState::Rendered)
                | (UploadState::Rendered, UploadState::Executing)
                | (UploadState::Executing, UploadState::Completed)
        ),
        "invalid upload transition {from:?} -> {to:?}"
    );
    to
}

fn report_outcome(outcome: &UploadOutcome) {
    if !outcome.stdout.is_empty() {
        println!("{} {}", t!("upload.output_prefix"), outcome.stdout_text().trim_end());
    }
    if !outcome.stderr.is_empty() {
        eprintln!(
            "{} {}\n",
            t!("upload.error_prefix").red().bold(),
            outcome.stderr_text().trim_end()
        );
    } else if outcome.is_failure() {
        eprintln!(
            "{}\n",
            t!("upload.exit_status_failure", status = outcome.status).red()
        );
    } else {
        println!("{}\n", t!("upload.success").green());
    }
}
