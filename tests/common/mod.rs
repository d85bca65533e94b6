// Shared test helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

use tcms_tester::core::config::TesterConfig;
use tcms_tester::core::engine::{EngineInvocation, TestEngine};
use tcms_tester::core::error::{Result, TesterError};
use tcms_tester::core::loader::ModuleLoader;
use tcms_tester::core::models::TestModule;

/// A scratch project with a `tests/` directory holding test units and a
/// `results/` output location that does not exist yet.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create temporary directory");
        fs::create_dir_all(dir.path().join("tests")).expect("Failed to create tests directory");
        Self { dir }
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.dir.path().join("tests")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("results")
    }

    /// Writes a test unit into the tests directory.
    pub fn add_unit(&self, name: &str, source: &str) -> PathBuf {
        let path = self.tests_dir().join(name);
        fs::write(&path, source).expect("Failed to write test unit");
        path
    }

    /// Creates an artifact in the output directory, as an earlier run would have.
    pub fn add_artifact(&self, name: &str) -> PathBuf {
        fs::create_dir_all(self.output_dir()).expect("Failed to create output directory");
        let path = self.output_dir().join(name);
        fs::write(&path, "<testsuites/>").expect("Failed to write artifact");
        path
    }

    /// A configuration rooted in this workspace. Credentials stay inside it.
    pub fn config(&self) -> TesterConfig {
        TesterConfig {
            tests_dir: self.tests_dir(),
            output_dir: self.output_dir(),
            credentials_path: self.dir.path().join("tcms.conf"),
            ..TesterConfig::default()
        }
    }

    /// Writes an upload command template into `templates/` and points the
    /// configuration at it.
    pub fn config_with_upload_template(&self, template: &str) -> TesterConfig {
        let templates = self.dir.path().join("templates");
        fs::create_dir_all(&templates).expect("Failed to create templates directory");
        fs::write(templates.join("upload_command.template"), template)
            .expect("Failed to write upload template");
        TesterConfig {
            templates_dir: Some(templates),
            ..self.config()
        }
    }
}

/// Loader answering from a fixed table instead of executing anything.
/// Modules registered with `failing` (or not registered at all) fail to load.
#[derive(Default, Clone)]
pub struct FakeLoader {
    plans: HashMap<String, std::result::Result<Option<String>, String>>,
}

impl FakeLoader {
    pub fn with_plan(mut self, module: &str, plan: &str) -> Self {
        self.plans.insert(module.to_string(), Ok(Some(plan.to_string())));
        self
    }

    pub fn without_plan(mut self, module: &str) -> Self {
        self.plans.insert(module.to_string(), Ok(None));
        self
    }

    pub fn failing(mut self, module: &str, message: &str) -> Self {
        self.plans.insert(module.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl ModuleLoader for FakeLoader {
    async fn load(&self, module_name: &str, path: &Path) -> Result<TestModule> {
        let error = |message: &str| TesterError::ModuleLoad {
            module: module_name.to_string(),
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        match self.plans.get(module_name) {
            Some(Ok(plan_id)) => Ok(TestModule {
                name: module_name.to_string(),
                path: path.to_path_buf(),
                plan_id: plan_id.clone(),
            }),
            Some(Err(message)) => Err(error(message)),
            None => Err(error("unknown module")),
        }
    }
}

/// Engine that writes an empty JUnit report to the requested artifact path
/// and remembers every invocation.
#[derive(Default, Clone)]
pub struct FakeEngine {
    pub invocations: Arc<Mutex<Vec<EngineInvocation>>>,
}

impl FakeEngine {
    pub fn invocations(&self) -> Vec<EngineInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl TestEngine for FakeEngine {
    async fn execute(&self, invocation: &EngineInvocation) -> Result<ExitStatus> {
        self.invocations.lock().unwrap().push(invocation.clone());
        fs::write(&invocation.artifact_path, "<testsuites/>").map_err(|source| {
            TesterError::FileWrite {
                path: invocation.artifact_path.clone(),
                source,
            }
        })?;
        Ok(exit_status(0))
    }
}

/// An `ExitStatus` with the given code, taken from a real process.
pub fn exit_status(code: i32) -> ExitStatus {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("exit {code}"))
        .status()
        .expect("Failed to run sh")
}
