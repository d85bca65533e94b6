//! # Run Coordinator Module / 运行协调模块
//!
//! This module discovers test units, loads each one to learn its test plan,
//! hands it to the test engine with an artifact path keyed by that plan, and
//! records a `RunRecord` for every completed run. Runs are strictly
//! sequential and one unit's failure never stops the batch.
//!
//! 此模块发现测试单元，加载每个单元以获取其测试计划，
//! 将其连同以该计划为键的产物路径交给测试引擎，并为每次完成的运行记录一个 `RunRecord`。
//! 运行严格按顺序进行，单个单元的失败绝不会中止整个批次。

use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::engine::{EngineInvocation, TestEngine};
use crate::core::error::{Result, TesterError};
use crate::core::loader::{ModuleLoader, PLAN_ID_ATTRIBUTE};
use crate::core::models::{artifact_file_name, RunRecord, PLAN_SEPARATOR};
use crate::infra::{fs::install_if_absent, fs::list_file_names, t};

/// Name of the item-naming hook installed next to the test units.
pub const SUPPORT_FILE_NAME: &str = "conftest.py";

/// Bundled version of the item-naming hook / 内置的用例命名钩子
pub const SUPPORT_FILE: &str = include_str!("../../assets/conftest.py");

/// Default discovery prefix / 默认发现前缀
pub const DEFAULT_TEST_PREFIX: &str = "test";

/// Lists files in `dir` whose name starts with `prefix` (case-sensitive), in
/// file system enumeration order.
///
/// 按文件系统枚举顺序列出 `dir` 中名称以 `prefix` 开头（区分大小写）的文件。
pub fn discover_test_files(dir: &Path, prefix: &str) -> Result<Vec<String>> {
    list_file_names(dir, |name| name.starts_with(prefix)).map_err(|source| {
        TesterError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        }
    })
}

/// Module name of a test file: its file name without the extension.
/// 测试文件的模块名：去掉扩展名的文件名。
pub fn module_name_of(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// A unit that could not be run during a batch.
/// 批次中无法运行的测试单元。
#[derive(Debug)]
pub struct RunFailure {
    pub filename: String,
    pub error: TesterError,
}

/// Runs test units one at a time and keeps the records of completed runs.
/// 逐个运行测试单元并保存已完成运行的记录。
pub struct RunCoordinator {
    tests_dir: PathBuf,
    output_dir: PathBuf,
    prefix: String,
    loader: Box<dyn ModuleLoader>,
    engine: Box<dyn TestEngine>,
    records: Vec<RunRecord>,
}

impl RunCoordinator {
    pub fn new(
        tests_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        loader: Box<dyn ModuleLoader>,
        engine: Box<dyn TestEngine>,
    ) -> Self {
        Self {
            tests_dir: tests_dir.into(),
            output_dir: output_dir.into(),
            prefix: DEFAULT_TEST_PREFIX.to_string(),
            loader,
            engine,
            records: Vec::new(),
        }
    }

    /// Overrides the discovery prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn tests_dir(&self) -> &Path {
        &self.tests_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Records of completed runs, in execution order.
    /// 已完成运行的记录，按执行顺序排列。
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Test files in the configured test directory.
    pub fn discover(&self) -> Result<Vec<String>> {
        discover_test_files(&self.tests_dir, &self.prefix)
    }

    /// Runs a single test file found in the test directory.
    ///
    /// # Arguments
    /// * `filename` - File name of the unit, relative to the test directory
    /// * `filter` - Case-name filter passed to the engine; empty runs every case
    ///
    /// # Returns
    /// The `RunRecord` of the run, which is also appended to `records()`.
    ///
    /// # Errors
    /// [`TesterError::TestLoadFailure`] if the unit cannot be loaded,
    /// [`TesterError::FileWrite`] if the support file or output directory
    /// cannot be created, [`TesterError::EngineLaunch`] if the engine does not start.
    ///
    /// 运行测试目录中的单个测试文件。
    pub async fn run_one(&mut self, filename: &str, filter: &str) -> Result<RunRecord> {
        let module_name = module_name_of(filename);
        let module_path = self.tests_dir.join(filename);

        println!("{}", t!("run.loading_module", name = &module_name).blue());
        let module = self
            .loader
            .load(&module_name, &module_path)
            .await
            .map_err(|e| TesterError::TestLoadFailure {
                filename: filename.to_string(),
                source: Box::new(e),
            })?;

        let plan_id = match module.plan_id {
            Some(id) => id,
            None => {
                eprintln!(
                    "{}",
                    t!("run.missing_plan_id", name = &module_name, attribute = PLAN_ID_ATTRIBUTE)
                        .yellow()
                );
                String::new()
            }
        };
        if plan_id.contains(PLAN_SEPARATOR) {
            eprintln!(
                "{}",
                t!("run.plan_id_has_separator", plan = &plan_id, separator = PLAN_SEPARATOR).yellow()
            );
        }

        let artifact_path = self
            .output_dir
            .join(artifact_file_name(&plan_id, &module_name));

        self.ensure_support_file()?;
        fs::create_dir_all(&self.output_dir).map_err(|source| TesterError::FileWrite {
            path: self.output_dir.clone(),
            source,
        })?;

        let invocation = EngineInvocation {
            artifact_path: artifact_path.clone(),
            filter: filter.to_string(),
            unit_path: module_path,
        };
        println!(
            "{}",
            t!("run.running_unit", name = &module_name, plan = &plan_id).blue()
        );
        let status = self.engine.execute(&invocation).await?;
        // Failing cases are the engine's business; the artifact is what we need.
        println!(
            "{}",
            t!(
                "run.unit_finished",
                name = &module_name,
                status = status.code().map_or_else(|| "-".to_string(), |c| c.to_string()),
                path = artifact_path.display()
            )
            .green()
        );

        let record = RunRecord::new(plan_id, artifact_path);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Discovers and runs every test file. A unit that fails is reported and
    /// collected; the remaining units still run.
    ///
    /// # Errors
    /// Only when the test directory itself cannot be listed.
    ///
    /// 发现并运行所有测试文件。失败的单元会被报告和收集；其余单元仍会运行。
    pub async fn run_all(&mut self) -> Result<Vec<RunFailure>> {
        let files = self.discover()?;
        println!(
            "{}",
            t!("run.discovered", count = files.len(), path = self.tests_dir.display()).cyan()
        );

        let mut failures = Vec::new();
        for filename in files {
            if let Err(error) = self.run_one(&filename, "").await {
                eprintln!("{} {}", t!("run.unit_failed", name = &filename).red(), error);
                failures.push(RunFailure { filename, error });
            }
        }
        Ok(failures)
    }

    /// Copies the bundled support file into the test directory unless one is
    /// already there. An existing file is never replaced.
    ///
    /// 除非测试目录中已存在支持文件，否则将内置版本复制进去。现有文件绝不会被替换。
    pub fn ensure_support_file(&self) -> Result<bool> {
        let path = self.tests_dir.join(SUPPORT_FILE_NAME);
        let installed = install_if_absent(&path, SUPPORT_FILE)
            .map_err(|source| TesterError::FileWrite {
                path: path.clone(),
                source,
            })?;
        if installed {
            println!("{}", t!("run.support_installed", path = path.display()).dimmed());
        }
        Ok(installed)
    }
}
