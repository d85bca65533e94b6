//! # Tester Facade Integration Tests / 测试器门面集成测试
//!
//! Drives a whole batch through `Tester`: credentials, runs and uploads, with
//! the fake loader and engine from `common`.
//!
//! 通过 `Tester` 驱动完整批次：凭据、运行和上传，使用 `common` 中的假加载器和假引擎。

mod common;

use common::{FakeEngine, FakeLoader, Workspace};
use std::fs;
use tcms_tester::core::models::{ConnectionConfig, RunRecord, UploadReport};
use tcms_tester::Tester;

const ECHO_UPLOAD: &str = r#"sh -c "echo $$0 $$1" ${planId} ${test_result_path}"#;

#[tokio::test]
async fn test_batch_runs_then_uploads_run_records() {
    let ws = Workspace::new();
    ws.add_unit("test_a.py", "");
    ws.add_unit("test_b.py", "");
    let loader = FakeLoader::default().with_plan("test_a", "42").without_plan("test_b");
    let config = ws.config_with_upload_template(ECHO_UPLOAD);
    let mut tester = Tester::with_components(&config, Box::new(loader), Box::new(FakeEngine::default())).unwrap();

    let failures = tester.run_all().await.unwrap();
    assert!(failures.is_empty());
    assert_eq!(tester.records().len(), 2);

    let reports = tester.upload_all().await.unwrap();
    assert_eq!(reports.len(), 2);

    let a = reports
        .iter()
        .find(|r| r.record().plan_id == "42")
        .expect("plan 42 was uploaded");
    let UploadReport::Uploaded(outcome) = a else {
        panic!("upload did not run: {a:?}");
    };
    assert!(!outcome.is_failure());
    assert!(outcome.command.contains("42"));
    assert!(outcome.command.contains(&ws.output_dir().join("42-test_a.xml").display().to_string()));
}

#[tokio::test]
async fn test_upload_without_runs_uses_disk() {
    let ws = Workspace::new();
    ws.add_artifact("7-x.xml");
    ws.add_artifact("9-y.xml");
    let config = ws.config_with_upload_template(ECHO_UPLOAD);
    let mut tester =
        Tester::with_components(&config, Box::new(FakeLoader::default()), Box::new(FakeEngine::default())).unwrap();

    let reports = tester.upload_all().await.unwrap();

    let mut plans: Vec<_> = reports.iter().map(|r| r.record().plan_id.as_str()).collect();
    plans.sort();
    assert_eq!(plans, vec!["7", "9"]);
    assert!(reports.iter().all(|r| !r.is_failure()));
}

#[tokio::test]
async fn test_run_one_then_upload_one() {
    let ws = Workspace::new();
    ws.add_unit("test_a.py", "");
    let config = ws.config_with_upload_template(ECHO_UPLOAD);
    let mut tester = Tester::with_components(
        &config,
        Box::new(FakeLoader::default().with_plan("test_a", "3")),
        Box::new(FakeEngine::default()),
    )
    .unwrap();

    let record = tester.run_one("test_a.py", "").await.unwrap();
    assert_eq!(record, RunRecord::new("3", ws.output_dir().join("3-test_a.xml")));

    let outcome = tester.upload_one(&record).await.unwrap();
    assert_eq!(
        outcome.stdout_text().trim_end(),
        format!("3 {}", record.artifact_path.display())
    );
}

#[tokio::test]
async fn test_all_units_failing_leaves_no_records() {
    let ws = Workspace::new();
    ws.add_unit("test_a.py", "");
    ws.add_unit("test_b.py", "");
    let loader = FakeLoader::default()
        .failing("test_a", "boom")
        .failing("test_b", "boom");
    let mut tester = Tester::with_components(&ws.config(), Box::new(loader), Box::new(FakeEngine::default())).unwrap();

    let failures = tester.run_all().await.unwrap();

    assert_eq!(failures.len(), 2);
    assert!(tester.records().is_empty());
}

#[test]
fn test_configure_credentials_writes_to_configured_path() {
    let ws = Workspace::new();
    let config = ws.config();
    let tester =
        Tester::with_components(&config, Box::new(FakeLoader::default()), Box::new(FakeEngine::default())).unwrap();

    let path = tester
        .configure_credentials(&ConnectionConfig::new("http://kiwi.local/", "u", "p"))
        .unwrap();

    assert_eq!(path, config.credentials_path);
    assert_eq!(tester.credentials_path(), config.credentials_path.as_path());
    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("url = http://kiwi.local/xml-rpc/"));
}

#[test]
fn test_broken_template_override_fails_setup() {
    let ws = Workspace::new();
    let config = ws.config_with_upload_template("upload ${planId");

    let result = Tester::with_components(&config, Box::new(FakeLoader::default()), Box::new(FakeEngine::default()));
    assert!(result.is_err());
}
