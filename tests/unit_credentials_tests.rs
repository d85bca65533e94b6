//! # Credentials Writer Unit Tests / 凭据写入器单元测试
//!
//! Checks the rendered `~/.tcms.conf` content, URL normalization and that
//! repeated writes give byte-identical files.
//!
//! 检查渲染后的 `~/.tcms.conf` 内容、URL 规范化以及重复写入产生字节完全相同的文件。

use std::fs;
use tcms_tester::core::credentials::CredentialsWriter;
use tcms_tester::core::error::TesterError;
use tcms_tester::core::models::{normalize_service_url, ConnectionConfig};
use tcms_tester::core::templates::{Template, TemplateSet};
use tempfile::tempdir;

fn writer(target: &std::path::Path) -> CredentialsWriter {
    CredentialsWriter::new(TemplateSet::builtin().unwrap().credentials, target)
}

#[test]
fn test_url_normalization() {
    let cases = [
        ("https://kiwi.example.com", "https://kiwi.example.com/xml-rpc/"),
        ("https://kiwi.example.com/", "https://kiwi.example.com/xml-rpc/"),
        ("https://kiwi.example.com/xml-rpc", "https://kiwi.example.com/xml-rpc/"),
        ("https://kiwi.example.com/xml-rpc/", "https://kiwi.example.com/xml-rpc/"),
        ("  https://kiwi.example.com//  ", "https://kiwi.example.com/xml-rpc/"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize_service_url(input), expected, "input: {input:?}");
    }
}

#[test]
fn test_url_normalization_is_a_fixed_point() {
    for input in ["http://tcms", "http://tcms/xml-rpc//", "tcms.local:8443/kiwi/"] {
        let once = normalize_service_url(input);
        assert_eq!(normalize_service_url(&once), once);
    }
}

#[test]
fn test_write_renders_builtin_template() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("tcms.conf");
    let config = ConnectionConfig::new("https://kiwi.example.com", "alice", "s3cret");

    let written = writer(&target).write(&config).unwrap();

    assert_eq!(written, target);
    let content = fs::read_to_string(&target).unwrap();
    assert!(content.starts_with("[tcms]\n"));
    assert!(content.contains("url = https://kiwi.example.com/xml-rpc/\n"));
    assert!(content.contains("username = alice\n"));
    assert!(content.contains("password = s3cret"));
}

#[test]
fn test_write_is_idempotent() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("tcms.conf");
    let writer = writer(&target);
    let config = ConnectionConfig::new("https://kiwi.example.com/xml-rpc/", "bob", "pw");

    writer.write(&config).unwrap();
    let first = fs::read(&target).unwrap();
    writer.write(&config).unwrap();
    let second = fs::read(&target).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_write_replaces_previous_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("tcms.conf");
    fs::write(&target, "a much longer file that was here before and must disappear entirely\n").unwrap();

    writer(&target)
        .write(&ConnectionConfig::new("http://t", "u", "p"))
        .unwrap();

    let content = fs::read_to_string(&target).unwrap();
    assert!(!content.contains("must disappear"));
}

#[test]
fn test_custom_template() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("creds");
    let template = Template::parse("custom", "$username@$serviceURL").unwrap();

    let text = CredentialsWriter::new(template, &target)
        .render(&ConnectionConfig::new("http://t", "u", "p"))
        .unwrap();
    assert_eq!(text, "u@http://t/xml-rpc/");
}

#[test]
fn test_unwritable_target_is_a_file_write_error() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("missing").join("tcms.conf");

    let err = writer(&target)
        .write(&ConnectionConfig::new("http://t", "u", "p"))
        .unwrap_err();
    assert!(matches!(err, TesterError::FileWrite { ref path, .. } if *path == target));
}

#[cfg(unix)]
#[test]
fn test_written_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let target = dir.path().join("tcms.conf");

    writer(&target)
        .write(&ConnectionConfig::new("http://t", "u", "p"))
        .unwrap();

    let mode = fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn test_existing_readable_file_is_narrowed() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let target = dir.path().join("tcms.conf");
    fs::write(&target, "[tcms]\n").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

    writer(&target)
        .write(&ConnectionConfig::new("http://t", "u", "p"))
        .unwrap();

    let mode = fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert!(fs::read_to_string(&target).unwrap().contains("password = p"));
}
