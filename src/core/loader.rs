//! # Module Loader Module / 模块加载器模块
//!
//! Loads a test unit and reads the attributes it declares, most importantly
//! `TEST_PLAN_ID`. Loaders are plugged into the coordinator through the
//! [`ModuleLoader`] trait and return an explicit [`TestModule`] handle.
//!
//! 加载测试单元并读取其声明的属性，其中最重要的是 `TEST_PLAN_ID`。
//! 加载器通过 [`ModuleLoader`] trait 接入协调器，并返回显式的 [`TestModule`] 句柄。

use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::config::{LoaderConfig, LoaderKind};
use crate::core::error::{Result, TesterError};
use crate::core::models::TestModule;
use crate::infra::command::spawn_and_capture;

/// Name of the attribute holding the test plan id.
pub const PLAN_ID_ATTRIBUTE: &str = "TEST_PLAN_ID";

const PLAN_PROBE: &str = include_str!("../../assets/plan_probe.py");

/// Loads one test unit.
/// 加载一个测试单元。
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Loads the unit at `path` under `module_name`.
    ///
    /// # Errors
    /// [`TesterError::ModuleLoad`] with whatever the unit raised while loading.
    async fn load(&self, module_name: &str, path: &Path) -> Result<TestModule>;
}

/// Builds the loader selected in the configuration.
/// 构建配置中选定的加载器。
pub fn loader_from_config(config: &LoaderConfig) -> Box<dyn ModuleLoader> {
    match config.kind {
        LoaderKind::Python => Box::new(PythonLoader::new(&config.interpreter)),
        LoaderKind::Declaration => Box::new(DeclarationLoader),
    }
}

fn load_error(module_name: &str, path: &Path, message: impl Into<String>) -> TesterError {
    TesterError::ModuleLoad {
        module: module_name.to_string(),
        path: path.to_path_buf(),
        message: message.into(),
    }
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    plan_id: Option<String>,
}

/// Executes the unit's top level once in a Python interpreter and reads the
/// declared attributes from a JSON report the probe prints last.
///
/// 在 Python 解释器中执行测试单元的顶层代码一次，并从探针最后打印的 JSON 报告中读取声明的属性。
#[derive(Debug, Clone)]
pub struct PythonLoader {
    interpreter: String,
}

impl PythonLoader {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

#[async_trait]
impl ModuleLoader for PythonLoader {
    async fn load(&self, module_name: &str, path: &Path) -> Result<TestModule> {
        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.arg("-c")
            .arg(PLAN_PROBE)
            .arg(module_name)
            .arg(path)
            .env("PYTHONDONTWRITEBYTECODE", "1");

        let output = spawn_and_capture(cmd).await.map_err(|e| {
            load_error(
                module_name,
                path,
                format!("cannot start '{}': {e}", self.interpreter),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(load_error(module_name, path, stderr.trim()));
        }

        // The unit may print while it loads; the report is the last line.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let report_line = stdout
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        let report: ProbeReport = serde_json::from_str(report_line).map_err(|e| {
            load_error(module_name, path, format!("unreadable probe report: {e}"))
        })?;

        Ok(TestModule {
            name: module_name.to_string(),
            path: path.to_path_buf(),
            plan_id: report.plan_id,
        })
    }
}

/// Reads `TEST_PLAN_ID = <literal>` assignments at the top level of the file
/// without executing it. String and integer literals are understood; the last
/// assignment wins.
///
/// 在不执行文件的情况下读取文件顶层的 `TEST_PLAN_ID = <literal>` 赋值。
/// 支持字符串和整数字面量；以最后一次赋值为准。
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationLoader;

impl DeclarationLoader {
    /// Extracts the plan id declared in `source`, if any.
    pub fn scan(source: &str) -> Option<String> {
        source.lines().filter_map(parse_declaration).last()
    }
}

#[async_trait]
impl ModuleLoader for DeclarationLoader {
    async fn load(&self, module_name: &str, path: &Path) -> Result<TestModule> {
        let source = fs::read_to_string(path)
            .map_err(|e| load_error(module_name, path, e.to_string()))?;
        Ok(TestModule {
            name: module_name.to_string(),
            path: path.to_path_buf(),
            plan_id: Self::scan(&source),
        })
    }
}

fn parse_declaration(line: &str) -> Option<String> {
    // Indented lines belong to a block, not the module's top level.
    let rest = line.strip_prefix(PLAN_ID_ATTRIBUTE)?;
    let rest = rest.trim_start();
    // Optional annotation: `TEST_PLAN_ID: str = "1"`.
    let rest = match rest.strip_prefix(':') {
        Some(annotated) => &annotated[annotated.find('=')?..],
        None => rest,
    };
    let value = rest.strip_prefix('=')?.trim_start();
    if value.starts_with('=') {
        return None;
    }
    parse_literal(value)
}

fn parse_literal(value: &str) -> Option<String> {
    let mut chars = value.chars();
    match chars.next()? {
        quote @ ('"' | '\'') => {
            let body = &value[1..];
            let end = body.find(quote)?;
            Some(body[..end].to_string())
        }
        c if c.is_ascii_digit() => Some(
            value
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '_')
                .filter(|c| *c != '_')
                .collect(),
        ),
        _ => None,
    }
}
