//! # Configuration Module / 配置模块
//!
//! Loads `Tester.toml`, the file describing where test units live, where
//! artifacts go, how the test engine and module loader are invoked, and which
//! product the results are uploaded against. Every field has a default.
//!
//! 加载 `Tester.toml`，该文件描述测试单元所在位置、产物输出位置、
//! 测试引擎与模块加载器的调用方式，以及结果上传所针对的产品。每个字段都有默认值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::UploadEnvironment;
use crate::infra::fs::expand_path;

/// Default configuration file name / 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "Tester.toml";

/// Default location of the Kiwi TCMS credentials file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "~/.tcms.conf";

/// Product information attached to every upload.
/// 附加到每次上传的产品信息。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub product: String,
    pub version: String,
    pub build: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            product: "M-EDC 2.0".to_string(),
            version: "unspecified".to_string(),
            build: "1".to_string(),
        }
    }
}

impl EnvironmentConfig {
    pub fn to_upload_environment(&self) -> UploadEnvironment {
        UploadEnvironment::new(&self.product, &self.version, &self.build)
    }
}

/// How the external test engine is started. The tester appends
/// `--junit-xml <artifact>`, an optional `-k <filter>` and the unit path.
///
/// 外部测试引擎的启动方式。测试器会追加 `--junit-xml <artifact>`、
/// 可选的 `-k <filter>` 以及测试单元路径。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["-m".to_string(), "pytest".to_string()],
        }
    }
}

/// Which module loader reads `TEST_PLAN_ID`.
/// 使用哪种模块加载器读取 `TEST_PLAN_ID`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    /// Executes the unit in an interpreter / 在解释器中执行测试单元
    #[default]
    Python,
    /// Reads top-level assignments without executing anything / 只读取顶层赋值而不执行
    Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub kind: LoaderKind,
    pub interpreter: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            kind: LoaderKind::Python,
            interpreter: "python3".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UploadConfig {
    /// Treat a non-zero exit status of the upload command as a failure even
    /// when it wrote nothing to stderr.
    /// 即使上传命令未向 stderr 写入任何内容，也将非零退出状态视为失败。
    pub strict_exit_status: bool,
}

/// The complete tester configuration, loaded from a TOML file.
/// 从 TOML 文件加载的完整测试器配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TesterConfig {
    /// The language for console messages (e.g., "en", "zh-CN").
    /// 控制台消息的语言（例如 "en", "zh-CN"）。
    pub language: String,
    /// Directory scanned for test units / 扫描测试单元的目录
    pub tests_dir: PathBuf,
    /// Directory receiving JUnit XML artifacts / 接收 JUnit XML 产物的目录
    pub output_dir: PathBuf,
    /// File name prefix that marks a test unit (case-sensitive).
    /// 标记测试单元的文件名前缀（区分大小写）。
    pub test_prefix: String,
    /// Optional directory whose template files replace the built-in ones.
    /// 可选目录，其中的模板文件会替换内置模板。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    pub credentials_path: PathBuf,
    pub environment: EnvironmentConfig,
    pub engine: EngineConfig,
    pub loader: LoaderConfig,
    pub upload: UploadConfig,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tests_dir: PathBuf::from("tests"),
            output_dir: PathBuf::from("results"),
            test_prefix: "test".to_string(),
            templates_dir: None,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            environment: EnvironmentConfig::default(),
            engine: EngineConfig::default(),
            loader: LoaderConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

impl TesterConfig {
    /// Expands `~`/`$VAR` in every path and anchors relative paths at `base`.
    /// The credentials path is only expanded, never anchored.
    ///
    /// 展开所有路径中的 `~`/`$VAR`，并将相对路径锚定到 `base`。
    /// 凭据路径只做展开，不做锚定。
    pub fn resolve_paths(mut self, base: &Path) -> Result<Self> {
        let anchor = |p: &Path| -> Result<PathBuf> {
            let expanded = expand_path(p)?;
            Ok(if expanded.is_absolute() {
                expanded
            } else {
                base.join(expanded)
            })
        };

        self.tests_dir = anchor(&self.tests_dir)?;
        self.output_dir = anchor(&self.output_dir)?;
        self.templates_dir = self.templates_dir.as_deref().map(anchor).transpose()?;
        self.credentials_path = expand_path(&self.credentials_path)?;
        Ok(self)
    }
}

/// Reads and parses a configuration file, resolving its paths relative to the
/// directory containing it.
///
/// # Arguments
/// * `path` - Path of the TOML configuration file
///
/// # Returns
/// The parsed `TesterConfig` with absolute paths
///
/// 读取并解析配置文件，并相对于其所在目录解析路径。
pub fn load_config(path: &Path) -> Result<TesterConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: TesterConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    config.resolve_paths(&base)
}
