//! # Test Engine Module / 测试引擎模块
//!
//! The tester never runs test cases itself. It hands one unit at a time to an
//! external engine (pytest by default) together with the artifact path the
//! JUnit XML report must be written to.
//!
//! 测试器从不自己运行测试用例。它每次将一个测试单元交给外部引擎（默认为 pytest），
//! 同时提供 JUnit XML 报告必须写入的产物路径。

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use crate::core::config::EngineConfig;
use crate::core::error::{Result, TesterError};

/// Everything the engine needs for one run.
/// 引擎一次运行所需的全部信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    /// Where the JUnit XML artifact must be written / JUnit XML 产物的写入位置
    pub artifact_path: PathBuf,
    /// Case-name filter, empty for "run everything" / 用例名过滤器，为空表示全部运行
    pub filter: String,
    /// The single unit to execute / 要执行的单个测试单元
    pub unit_path: PathBuf,
}

impl EngineInvocation {
    /// Engine arguments: `--junit-xml <artifact> [-k <filter>] <unit>`.
    pub fn engine_args(&self) -> Vec<String> {
        let mut args = vec![
            "--junit-xml".to_string(),
            self.artifact_path.display().to_string(),
        ];
        if !self.filter.is_empty() {
            args.push("-k".to_string());
            args.push(self.filter.clone());
        }
        args.push(self.unit_path.display().to_string());
        args
    }
}

/// Runs one test unit. The returned status is informational only; the
/// coordinator records the run whatever the individual cases did.
///
/// 运行一个测试单元。返回的状态仅供参考；无论各个用例结果如何，协调器都会记录此次运行。
#[async_trait]
pub trait TestEngine: Send + Sync {
    async fn execute(&self, invocation: &EngineInvocation) -> Result<ExitStatus>;
}

/// Launches the configured program with the engine arguments appended and
/// lets its output flow to the console.
///
/// 启动配置的程序并追加引擎参数，使其输出直接流向控制台。
#[derive(Debug, Clone)]
pub struct CommandEngine {
    config: EngineConfig,
}

impl CommandEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TestEngine for CommandEngine {
    async fn execute(&self, invocation: &EngineInvocation) -> Result<ExitStatus> {
        tokio::process::Command::new(&self.config.program)
            .args(&self.config.args)
            .args(invocation.engine_args())
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| TesterError::EngineLaunch {
                program: self.config.program.clone(),
                source,
            })
    }
}
