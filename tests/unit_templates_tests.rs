//! # Template Store Unit Tests / 模板存储单元测试
//!
//! Loading template overrides from a directory and reading template files.
//!
//! 从目录加载覆盖模板以及读取模板文件。

use std::collections::HashMap;
use std::fs;
use tcms_tester::core::error::TemplateError;
use tcms_tester::core::templates::{
    placeholders, Template, TemplateSet, CREDENTIALS_TEMPLATE_FILE, UPLOAD_TEMPLATE_FILE,
};
use tempfile::tempdir;

#[test]
fn test_load_without_overrides_is_builtin() {
    let set = TemplateSet::load(None).unwrap();
    assert_eq!(set.credentials.name(), CREDENTIALS_TEMPLATE_FILE);
    assert_eq!(set.upload_command.name(), UPLOAD_TEMPLATE_FILE);
    assert_eq!(set.upload_command.placeholders().len(), 5);
}

#[test]
fn test_override_replaces_only_present_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(UPLOAD_TEMPLATE_FILE), "upload ${test_result_path}\n").unwrap();

    let set = TemplateSet::load(Some(dir.path())).unwrap();

    assert_eq!(set.upload_command.placeholders(), vec![placeholders::TEST_RESULT_PATH]);
    assert_eq!(set.credentials.placeholders().len(), 3);

    let values = HashMap::from([(placeholders::TEST_RESULT_PATH, "a.xml".to_string())]);
    // The trailing newline of the file is not part of the command.
    assert_eq!(set.upload_command.render(&values).unwrap(), "upload a.xml");
}

#[test]
fn test_override_of_credentials_keeps_newlines() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(CREDENTIALS_TEMPLATE_FILE), "[tcms]\nurl=$serviceURL\n").unwrap();

    let set = TemplateSet::load(Some(dir.path())).unwrap();
    let values = HashMap::from([(placeholders::SERVICE_URL, "http://t/xml-rpc/".to_string())]);
    assert_eq!(set.credentials.render(&values).unwrap(), "[tcms]\nurl=http://t/xml-rpc/\n");
}

#[test]
fn test_malformed_override_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(UPLOAD_TEMPLATE_FILE), "upload ${planId").unwrap();

    let err = TemplateSet::load(Some(dir.path())).unwrap_err();
    assert!(matches!(err, TemplateError::InvalidPlaceholder { offset: 7, .. }));
}

#[test]
fn test_from_file_missing() {
    let dir = tempdir().unwrap();
    let err = Template::from_file(&dir.path().join("absent.template")).unwrap_err();
    assert!(matches!(err, TemplateError::Read { .. }));
}

#[test]
fn test_unused_values_are_ignored() {
    let template = Template::parse("t", "plan=${planId}").unwrap();
    let values = HashMap::from([
        (placeholders::PLAN_ID, "3".to_string()),
        (placeholders::BUILD_ID, "9".to_string()),
    ]);
    assert_eq!(template.render(&values).unwrap(), "plan=3");
}

#[test]
fn test_render_is_repeatable() {
    let template = Template::parse("t", "$a-$b").unwrap();
    let first = HashMap::from([("a", "1".to_string()), ("b", "2".to_string())]);
    let second = HashMap::from([("a", "x".to_string()), ("b", "y".to_string())]);
    assert_eq!(template.render(&first).unwrap(), "1-2");
    assert_eq!(template.render(&second).unwrap(), "x-y");
}
