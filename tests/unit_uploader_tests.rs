//! # Uploader Unit Tests / 上传器单元测试
//!
//! Uses small `sh -c` commands in place of the Kiwi TCMS upload plugin to
//! check rendering, the stderr-based verdict, strict exit status handling and
//! uploads of recovered artifacts.
//!
//! 使用简单的 `sh -c` 命令代替 Kiwi TCMS 上传插件，
//! 检查渲染、基于 stderr 的判定、严格退出状态处理以及恢复产物的上传。

mod common;

use common::Workspace;
use std::path::Path;
use tcms_tester::core::error::{TemplateError, TesterError};
use tcms_tester::core::models::{RunRecord, UploadEnvironment, UploadReport, UploadState};
use tcms_tester::core::templates::{Template, TemplateSet};
use tcms_tester::core::uploader::Uploader;

fn uploader(template: &str, output_dir: &Path) -> Uploader {
    Uploader::new(
        Template::parse("upload_command.template", template).unwrap(),
        UploadEnvironment::new("M-EDC 2.0", "unspecified", "1"),
        output_dir,
    )
}

const ECHO_PLAN_AND_PATH: &str = r#"sh -c "echo plan=$$1 path=$$2" upload ${planId} ${test_result_path}"#;

#[test]
fn test_builtin_command_contains_plan_and_path() {
    let ws = Workspace::new();
    let template = TemplateSet::builtin().unwrap().upload_command;
    let mut uploader = Uploader::new(
        template,
        UploadEnvironment::new("M-EDC 2.0", "unspecified", "1"),
        ws.output_dir(),
    );
    let record = RunRecord::new("42", "/results/42-test_a.xml");

    let words = uploader.render(&record).unwrap();

    assert_eq!(
        words,
        vec![
            "TCMS_PRODUCT=M-EDC 2.0",
            "TCMS_PRODUCT_VERSION=unspecified",
            "TCMS_BUILD=1",
            "TCMS_PLAN_ID=42",
            "tcms-junit.xml-plugin",
            "/results/42-test_a.xml",
        ]
    );
    assert_eq!(uploader.environment().plan_id, "42");
}

#[test]
fn test_value_with_spaces_stays_one_word() {
    let ws = Workspace::new();
    let mut uploader = uploader("upload ${test_result_path}", &ws.output_dir());
    let record = RunRecord::new("1", "/tmp/my results/1-test_a.xml");

    let words = uploader.render(&record).unwrap();
    assert_eq!(words, vec!["upload", "/tmp/my results/1-test_a.xml"]);
}

#[test]
fn test_quoted_placeholders_are_not_requoted() {
    let ws = Workspace::new();
    let mut uploader = uploader(
        r#"TCMS_PRODUCT="${productName}" upload --product="${productName}" '${planId}'"#,
        &ws.output_dir(),
    );

    let words = uploader.render(&RunRecord::new("7", "7-x.xml")).unwrap();
    assert_eq!(
        words,
        vec!["TCMS_PRODUCT=M-EDC 2.0", "upload", "--product=M-EDC 2.0", "7"]
    );
}

#[test]
fn test_unbalanced_template_quotes_fail_rendering() {
    let ws = Workspace::new();
    let mut uploader = uploader(r#"upload "${planId}"#, &ws.output_dir());

    let err = uploader.render(&RunRecord::new("7", "7-x.xml")).unwrap_err();
    assert!(matches!(
        err,
        TesterError::Template(TemplateError::UnbalancedQuotes { .. })
    ));
}

#[test]
fn test_render_missing_placeholder_fails() {
    let ws = Workspace::new();
    let mut uploader = uploader("upload ${runId}", &ws.output_dir());

    let err = uploader.render(&RunRecord::new("1", "a.xml")).unwrap_err();
    assert!(matches!(
        err,
        TesterError::Template(TemplateError::MissingValue { ref placeholder, .. }) if placeholder == "runId"
    ));
}

#[tokio::test]
async fn test_stdout_only_command_succeeds() {
    let ws = Workspace::new();
    let artifact = ws.add_artifact("42-test_a.xml");
    let mut uploader = uploader(ECHO_PLAN_AND_PATH, &ws.output_dir());

    let outcome = uploader.upload_one(&RunRecord::new("42", &artifact)).await.unwrap();

    assert!(!outcome.is_failure());
    assert_eq!(outcome.state, UploadState::Completed);
    assert!(outcome.status.success());
    assert_eq!(
        outcome.stdout_text().trim_end(),
        format!("plan=42 path={}", artifact.display())
    );
    assert!(outcome.stderr.is_empty());
}

#[tokio::test]
async fn test_stderr_marks_failure_even_with_zero_exit() {
    let ws = Workspace::new();
    let mut uploader = uploader(r#"sh -c "echo 'plan not found' >&2""#, &ws.output_dir());

    let outcome = uploader.upload_one(&RunRecord::new("9", "9-x.xml")).await.unwrap();

    assert!(outcome.status.success());
    assert!(outcome.is_failure());
    assert_eq!(outcome.stderr_text().trim_end(), "plan not found");
}

#[tokio::test]
async fn test_exit_status_only_decides_in_strict_mode() {
    let ws = Workspace::new();
    let record = RunRecord::new("9", "9-x.xml");

    let mut lenient = uploader("sh -c 'exit 3'", &ws.output_dir());
    let outcome = lenient.upload_one(&record).await.unwrap();
    assert_eq!(outcome.status.code(), Some(3));
    assert!(!outcome.is_failure());

    let mut strict = uploader("sh -c 'exit 3'", &ws.output_dir()).with_strict_exit_status(true);
    let outcome = strict.upload_one(&record).await.unwrap();
    assert!(outcome.is_failure());
}

#[tokio::test]
async fn test_leading_assignments_become_environment() {
    let ws = Workspace::new();
    let mut uploader = uploader(
        r#"TCMS_PLAN_ID=${planId} TCMS_BUILD=${buildId} sh -c "printf '%s/%s' \"$$TCMS_PLAN_ID\" \"$$TCMS_BUILD\"""#,
        &ws.output_dir(),
    );

    let outcome = uploader.upload_one(&RunRecord::new("7", "7-x.xml")).await.unwrap();
    assert_eq!(outcome.stdout_text(), "7/1");
}

#[tokio::test]
async fn test_double_quoted_env_value_reaches_command_verbatim() {
    let ws = Workspace::new();
    let mut uploader = uploader(
        r#"TCMS_PRODUCT="${productName}" sh -c "printf %s \"$$TCMS_PRODUCT\"""#,
        &ws.output_dir(),
    );

    let outcome = uploader.upload_one(&RunRecord::new("7", "7-x.xml")).await.unwrap();

    assert!(!outcome.is_failure());
    assert_eq!(outcome.stdout_text(), "M-EDC 2.0");
}

#[tokio::test]
async fn test_env_program_with_quoted_value() {
    let ws = Workspace::new();
    let mut uploader = uploader(
        r#"env TCMS_PRODUCT="${productName}" sh -c "printf %s \"$$TCMS_PRODUCT\"""#,
        &ws.output_dir(),
    );

    let outcome = uploader.upload_one(&RunRecord::new("7", "7-x.xml")).await.unwrap();
    assert_eq!(outcome.stdout_text(), "M-EDC 2.0");
}

#[tokio::test]
async fn test_recorded_command_quotes_words_with_spaces() {
    let ws = Workspace::new();
    let mut uploader = uploader("echo ${productName} ${planId}", &ws.output_dir());

    let outcome = uploader.upload_one(&RunRecord::new("7", "7-x.xml")).await.unwrap();

    assert_eq!(outcome.command, "echo 'M-EDC 2.0' 7");
    assert_eq!(outcome.stdout_text(), "M-EDC 2.0 7\n");
}

#[tokio::test]
async fn test_unknown_program_is_an_error() {
    let ws = Workspace::new();
    let mut uploader = uploader("definitely-not-a-real-uploader-12345 ${planId}", &ws.output_dir());

    let err = uploader.upload_one(&RunRecord::new("1", "1-a.xml")).await.unwrap_err();
    assert!(matches!(err, TesterError::UploadLaunch { .. }));
}

#[tokio::test]
async fn test_upload_all_recovers_artifacts_from_disk() {
    let ws = Workspace::new();
    ws.add_artifact("7-x.xml");
    ws.add_artifact("9-y.xml");
    ws.add_artifact("notes.txt");
    let mut uploader = uploader(ECHO_PLAN_AND_PATH, &ws.output_dir());

    let reports = uploader.upload_all(&[]).await.unwrap();

    assert_eq!(reports.len(), 2);
    let mut plans: Vec<_> = reports.iter().map(|r| r.record().plan_id.clone()).collect();
    plans.sort();
    assert_eq!(plans, vec!["7", "9"]);
    for report in &reports {
        let UploadReport::Uploaded(outcome) = report else {
            panic!("upload did not run: {report:?}");
        };
        assert!(outcome.stdout_text().contains(&format!("plan={}", outcome.record.plan_id)));
    }
}

#[tokio::test]
async fn test_upload_all_prefers_given_records() {
    let ws = Workspace::new();
    ws.add_artifact("7-x.xml");
    ws.add_artifact("9-y.xml");
    let mut uploader = uploader(ECHO_PLAN_AND_PATH, &ws.output_dir());

    let records = vec![RunRecord::new("42", ws.output_dir().join("42-test_a.xml"))];
    let reports = uploader.upload_all(&records).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].record().plan_id, "42");
}

#[tokio::test]
async fn test_upload_all_keeps_going_after_failures() {
    let ws = Workspace::new();
    let mut uploader = uploader(
        r#"sh -c "test $$0 = 7 && echo bad >&2 || echo ok" ${planId}"#,
        &ws.output_dir(),
    );
    let records = vec![
        RunRecord::new("7", "7-x.xml"),
        RunRecord::new("9", "9-y.xml"),
    ];

    let reports = uploader.upload_all(&records).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_failure());
    assert!(!reports[1].is_failure());
}

#[tokio::test]
async fn test_upload_all_without_output_directory_fails() {
    let ws = Workspace::new();
    let mut uploader = uploader(ECHO_PLAN_AND_PATH, &ws.output_dir());

    let err = uploader.upload_all(&[]).await.unwrap_err();
    assert!(matches!(err, TesterError::DirectoryRead { .. }));
}
