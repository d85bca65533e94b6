//! # Result Recovery Module / 结果恢复模块
//!
//! Rebuilds run records from JUnit artifacts already on disk, for example when
//! uploads happen in a different process than the test runs. The plan id is
//! taken from the file name up to the first separator; the file content is not
//! inspected.
//!
//! 从磁盘上已有的 JUnit 产物重建运行记录，例如当上传与测试运行在不同进程中进行时。
//! 计划 ID 取自文件名中第一个分隔符之前的部分；不检查文件内容。

use std::path::Path;

use crate::core::error::{Result, TesterError};
use crate::core::models::{ARTIFACT_EXTENSION, PLAN_SEPARATOR, RunRecord};
use crate::infra::fs::list_file_names;

/// Plan id encoded in an artifact file name: everything before the first
/// separator, or the whole stem when there is none.
///
/// The extension is never part of the id: `orphan.xml` yields `orphan`, not
/// `orphan.xml`. Such files were not written by a run, so the stem is the
/// closest thing to a plan id they carry.
///
/// 产物文件名中编码的计划 ID：第一个分隔符之前的所有内容；若没有分隔符则为整个主干名。
/// 扩展名从不属于 ID：`orphan.xml` 得到 `orphan` 而不是 `orphan.xml`。
pub fn plan_id_from_file_name(file_name: &str) -> &str {
    let stem = file_name
        .strip_suffix(ARTIFACT_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(file_name);
    stem.split(PLAN_SEPARATOR).next().unwrap_or(stem)
}

/// Scans `dir` for `.xml` artifacts and returns one record per file, in file
/// system enumeration order.
///
/// # Errors
/// [`TesterError::DirectoryRead`] if `dir` cannot be listed.
///
/// 扫描 `dir` 中的 `.xml` 产物，并按文件系统枚举顺序为每个文件返回一条记录。
pub fn recover_from_output_dir(dir: &Path) -> Result<Vec<RunRecord>> {
    let suffix = format!(".{ARTIFACT_EXTENSION}");
    let names = list_file_names(dir, |name| name.ends_with(&suffix)).map_err(|source| {
        TesterError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        }
    })?;

    Ok(names
        .iter()
        .map(|name| RunRecord::new(plan_id_from_file_name(name), dir.join(name)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_id_before_first_separator() {
        assert_eq!(plan_id_from_file_name("42-test_a.xml"), "42");
        assert_eq!(plan_id_from_file_name("7-x-y.xml"), "7");
        assert_eq!(plan_id_from_file_name("-test_b.xml"), "");
        assert_eq!(plan_id_from_file_name("orphan.xml"), "orphan");
    }
}
