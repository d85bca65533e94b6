//! # Tester Facade Module / 测试器门面模块
//!
//! Wires the template store, credentials writer, run coordinator and uploader
//! together behind the operations a caller needs: configure credentials, run
//! all or one test unit, upload all or one result.
//!
//! 将模板存储、凭据写入器、运行协调器和上传器组合在一起，
//! 对外提供调用方所需的操作：配置凭据、运行全部或单个测试单元、上传全部或单个结果。

use std::path::PathBuf;

use crate::core::config::TesterConfig;
use crate::core::coordinator::{RunCoordinator, RunFailure};
use crate::core::credentials::CredentialsWriter;
use crate::core::engine::{CommandEngine, TestEngine};
use crate::core::error::Result;
use crate::core::loader::{loader_from_config, ModuleLoader};
use crate::core::models::{ConnectionConfig, RunRecord, UploadOutcome, UploadReport};
use crate::core::templates::TemplateSet;
use crate::core::uploader::Uploader;

pub struct Tester {
    credentials: CredentialsWriter,
    coordinator: RunCoordinator,
    uploader: Uploader,
}

impl Tester {
    /// Builds a tester from configuration, with the loader and engine it names.
    /// 根据配置构建测试器，使用配置中指定的加载器和引擎。
    pub fn from_config(config: &TesterConfig) -> Result<Self> {
        let loader = loader_from_config(&config.loader);
        let engine = Box::new(CommandEngine::new(config.engine.clone()));
        Self::with_components(config, loader, engine)
    }

    /// Builds a tester with an explicit loader and engine.
    /// 使用显式指定的加载器和引擎构建测试器。
    pub fn with_components(
        config: &TesterConfig,
        loader: Box<dyn ModuleLoader>,
        engine: Box<dyn TestEngine>,
    ) -> Result<Self> {
        let templates = TemplateSet::load(config.templates_dir.as_deref())?;

        let credentials = CredentialsWriter::new(templates.credentials, &config.credentials_path);
        let coordinator =
            RunCoordinator::new(&config.tests_dir, &config.output_dir, loader, engine)
                .with_prefix(&config.test_prefix);
        let uploader = Uploader::new(
            templates.upload_command,
            config.environment.to_upload_environment(),
            &config.output_dir,
        )
        .with_strict_exit_status(config.upload.strict_exit_status);

        Ok(Self {
            credentials,
            coordinator,
            uploader,
        })
    }

    /// Writes the Kiwi TCMS credentials file, replacing any previous one.
    /// 写入 Kiwi TCMS 凭据文件，替换任何先前的文件。
    pub fn configure_credentials(&self, config: &ConnectionConfig) -> Result<PathBuf> {
        self.credentials.write(config)
    }

    pub async fn run_all(&mut self) -> Result<Vec<RunFailure>> {
        self.coordinator.run_all().await
    }

    pub async fn run_one(&mut self, filename: &str, filter: &str) -> Result<RunRecord> {
        self.coordinator.run_one(filename, filter).await
    }

    /// Uploads the results of this tester's runs, or the artifacts found in the
    /// output directory when nothing ran in this process.
    ///
    /// 上传本测试器运行的结果；若本进程中没有任何运行，则上传输出目录中找到的产物。
    pub async fn upload_all(&mut self) -> Result<Vec<UploadReport>> {
        let records = self.coordinator.records().to_vec();
        self.uploader.upload_all(&records).await
    }

    pub async fn upload_one(&mut self, record: &RunRecord) -> Result<UploadOutcome> {
        self.uploader.upload_one(record).await
    }

    /// Records of the runs performed so far.
    pub fn records(&self) -> &[RunRecord] {
        self.coordinator.records()
    }

    pub fn credentials_path(&self) -> &std::path::Path {
        self.credentials.target()
    }
}
