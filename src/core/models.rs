//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures that flow through the tester:
//! run records produced by test runs, the upload environment, Kiwi TCMS
//! connection settings and the outcome of each upload.
//!
//! 此模块定义了在测试器中流转的数据结构：测试运行产生的运行记录、
//! 上传环境、Kiwi TCMS 连接设置以及每次上传的结果。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::core::templates::placeholders;

/// Extension of the JUnit XML artifacts written by the test engine.
pub const ARTIFACT_EXTENSION: &str = "xml";

/// Separates the plan id from the module name in artifact file names.
pub const PLAN_SEPARATOR: char = '-';

/// API suffix every Kiwi TCMS service URL must end with.
pub const XML_RPC_SUFFIX: &str = "/xml-rpc";

/// The pairing of a test plan with the JUnit artifact one run produced.
/// Created once per completed run, or reconstructed from disk during recovery.
///
/// 测试计划与一次运行所产生的 JUnit 产物的配对。
/// 每次完成的运行创建一次，或在恢复期间从磁盘重建。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Kiwi TCMS test plan id. Empty when the test unit declared none.
    /// Kiwi TCMS 测试计划 ID。若测试单元未声明则为空。
    pub plan_id: String,
    /// Path of the JUnit XML artifact / JUnit XML 产物的路径
    pub artifact_path: PathBuf,
}

impl RunRecord {
    pub fn new(plan_id: impl Into<String>, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            plan_id: plan_id.into(),
            artifact_path: artifact_path.into(),
        }
    }
}

/// Builds the artifact file name `{plan_id}-{module_name}.xml`.
/// 构建产物文件名 `{plan_id}-{module_name}.xml`。
pub fn artifact_file_name(plan_id: &str, module_name: &str) -> String {
    format!("{plan_id}{PLAN_SEPARATOR}{module_name}.{ARTIFACT_EXTENSION}")
}

/// A loaded test unit and the attributes it declares.
/// 已加载的测试单元及其声明的属性。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestModule {
    pub name: String,
    pub path: PathBuf,
    /// Value of `TEST_PLAN_ID`, if the unit declares one.
    pub plan_id: Option<String>,
}

/// Connection settings written to the Kiwi TCMS credentials file.
/// 写入 Kiwi TCMS 凭据文件的连接设置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub service_url: String,
    pub username: String,
    pub password: String,
}

impl ConnectionConfig {
    pub fn new(
        service_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service_url: service_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Template values with the service URL already normalized.
    pub fn template_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            (placeholders::SERVICE_URL, normalize_service_url(&self.service_url)),
            (placeholders::USERNAME, self.username.clone()),
            (placeholders::PASSWORD, self.password.clone()),
        ])
    }
}

/// Normalizes a Kiwi TCMS URL so it ends with exactly one `/xml-rpc` suffix and
/// exactly one trailing `/`. Applying it twice gives the same result.
///
/// 规范化 Kiwi TCMS URL，使其恰好以一个 `/xml-rpc` 后缀和一个结尾 `/` 结束。
/// 重复应用结果不变。
///
/// ```
/// use tcms_tester::core::models::normalize_service_url;
/// assert_eq!(normalize_service_url("https://kiwi.example.com"), "https://kiwi.example.com/xml-rpc/");
/// assert_eq!(normalize_service_url("https://kiwi.example.com/xml-rpc//"), "https://kiwi.example.com/xml-rpc/");
/// ```
pub fn normalize_service_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with(XML_RPC_SUFFIX) {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}{XML_RPC_SUFFIX}/")
    }
}

/// Product information passed to the upload command. `plan_id` is rewritten
/// before every upload, so one environment serves a whole sequential batch.
///
/// 传递给上传命令的产品信息。每次上传前都会重写 `plan_id`，
/// 因此一个环境对象可服务于整个顺序批次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEnvironment {
    pub product_name: String,
    pub product_version: String,
    pub build_id: String,
    #[serde(default)]
    pub plan_id: String,
}

impl UploadEnvironment {
    pub fn new(
        product_name: impl Into<String>,
        product_version: impl Into<String>,
        build_id: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            product_version: product_version.into(),
            build_id: build_id.into(),
            plan_id: String::new(),
        }
    }

    /// Raw template values for this environment plus one artifact path.
    pub fn template_values(&self, artifact_path: &str) -> HashMap<&'static str, String> {
        HashMap::from([
            (placeholders::PRODUCT_NAME, self.product_name.clone()),
            (placeholders::PRODUCT_VERSION, self.product_version.clone()),
            (placeholders::BUILD_ID, self.build_id.clone()),
            (placeholders::PLAN_ID, self.plan_id.clone()),
            (placeholders::TEST_RESULT_PATH, artifact_path.to_string()),
        ])
    }
}

/// Lifecycle of one upload.
/// 单次上传的生命周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadState {
    Pending,
    Rendered,
    Executing,
    Completed,
}

/// What one upload command produced.
/// 一次上传命令产生的结果。
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub record: RunRecord,
    /// The command line after template rendering / 模板渲染后的命令行
    pub command: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitStatus,
    pub state: UploadState,
    /// When set, a non-zero exit status also counts as a failure.
    pub strict_exit_status: bool,
}

impl UploadOutcome {
    /// Anything on stderr marks the upload as failed. The exit status only
    /// matters in strict mode.
    ///
    /// stderr 上有任何内容即视为上传失败。退出状态仅在严格模式下有意义。
    pub fn is_failure(&self) -> bool {
        !self.stderr.is_empty() || (self.strict_exit_status && !self.status.success())
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Summary line for one record in a batch report.
/// 批次报告中一条记录的摘要。
#[derive(Debug, Clone)]
pub enum UploadReport {
    Uploaded(UploadOutcome),
    Failed { record: RunRecord, error: String },
    NotUploaded(RunRecord),
}

impl UploadReport {
    pub fn record(&self) -> &RunRecord {
        match self {
            UploadReport::Uploaded(outcome) => &outcome.record,
            UploadReport::Failed { record, .. } => record,
            UploadReport::NotUploaded(record) => record,
        }
    }

    pub fn is_failure(&self) -> bool {
        match self {
            UploadReport::Uploaded(outcome) => outcome.is_failure(),
            UploadReport::Failed { .. } => true,
            UploadReport::NotUploaded(_) => false,
        }
    }
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.plan_id, self.artifact_path.display())
    }
}
