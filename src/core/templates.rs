//! # Template Store Module / 模板存储模块
//!
//! Parses and renders the two text templates the tester needs: the Kiwi TCMS
//! credentials file and the upload command line. Placeholders use `$name` or
//! `${name}`; `$$` produces a literal dollar sign. Rendering fails when a
//! placeholder has no value instead of leaving the placeholder in the output.
//!
//! 解析并渲染测试器所需的两个文本模板：Kiwi TCMS 凭据文件和上传命令行。
//! 占位符使用 `$name` 或 `${name}`；`$$` 生成字面美元符号。
//! 当占位符没有值时渲染会失败，而不是将占位符留在输出中。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::error::TemplateError;

/// Placeholder names understood by the built-in templates.
/// 内置模板可识别的占位符名称。
pub mod placeholders {
    pub const SERVICE_URL: &str = "serviceURL";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";

    pub const PRODUCT_NAME: &str = "productName";
    pub const PRODUCT_VERSION: &str = "productVersion";
    pub const BUILD_ID: &str = "buildId";
    pub const PLAN_ID: &str = "planId";
    pub const TEST_RESULT_PATH: &str = "test_result_path";
}

/// File name of the credentials template inside a templates directory.
pub const CREDENTIALS_TEMPLATE_FILE: &str = "tcms.conf.template";
/// File name of the upload command template inside a templates directory.
pub const UPLOAD_TEMPLATE_FILE: &str = "upload_command.template";

const BUILTIN_CREDENTIALS: &str = include_str!("../../assets/tcms.conf.template");
const BUILTIN_UPLOAD_COMMAND: &str = include_str!("../../assets/upload_command.template");

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template. Parsing happens once; rendering can be repeated.
/// 已解析的模板。解析只进行一次；渲染可以重复进行。
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source` into literal and placeholder segments.
    ///
    /// # Errors
    /// Returns [`TemplateError::InvalidPlaceholder`] for a `$` that is not followed
    /// by `$`, an identifier or a braced identifier.
    ///
    /// 将 `source` 解析为字面量和占位符片段。
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let invalid = |offset| TemplateError::InvalidPlaceholder {
            template: name.to_string(),
            offset,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if c != '$' {
                literal.push(c);
                continue;
            }

            let placeholder = match chars.peek().copied() {
                Some((_, '$')) => {
                    chars.next();
                    literal.push('$');
                    continue;
                }
                Some((_, '{')) => {
                    chars.next();
                    let mut ident = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, ch)) => ident.push(ch),
                            None => return Err(invalid(offset)),
                        }
                    }
                    if !is_identifier(&ident) {
                        return Err(invalid(offset));
                    }
                    ident
                }
                Some((_, ch)) if ch == '_' || ch.is_ascii_alphabetic() => {
                    let mut ident = String::new();
                    while let Some((_, ch)) = chars.peek().copied() {
                        if ch == '_' || ch.is_ascii_alphanumeric() {
                            ident.push(ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    ident
                }
                _ => return Err(invalid(offset)),
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(placeholder));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            segments,
        })
    }

    /// Reads and parses a template file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|e| TemplateError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse(&name, &source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct placeholder names in order of first appearance.
    /// 按首次出现顺序排列的不同占位符名称。
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(p) = segment {
                if !seen.contains(&p.as_str()) {
                    seen.push(p.as_str());
                }
            }
        }
        seen
    }

    /// Substitutes every placeholder with its value from `values`.
    /// Values not referenced by the template are ignored.
    ///
    /// # Errors
    /// [`TemplateError::MissingValue`] naming the first placeholder without a value.
    ///
    /// 用 `values` 中的值替换每个占位符。模板未引用的值将被忽略。
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => {
                    let value = values.get(key.as_str()).ok_or_else(|| {
                        TemplateError::MissingValue {
                            template: self.name.clone(),
                            placeholder: key.clone(),
                        }
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Splits the template into shell words first and renders each word on
    /// its own. A value always lands inside the word that holds its
    /// placeholder, unquoted, however the template quotes it.
    ///
    /// # Errors
    /// [`TemplateError::UnbalancedQuotes`] if the template cannot be split,
    /// otherwise the same errors as [`Template::render`].
    ///
    /// 先将模板拆分为 shell 单词，再逐个渲染。值总是原样落在包含其占位符的单词中，
    /// 与模板如何引用无关。
    pub fn render_words(&self, values: &HashMap<&str, String>) -> Result<Vec<String>, TemplateError> {
        let words = shlex::split(&self.source).ok_or_else(|| TemplateError::UnbalancedQuotes {
            template: self.name.clone(),
        })?;
        words
            .iter()
            .map(|word| Template::parse(&self.name, word)?.render(values))
            .collect()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// The credentials and upload-command templates, loaded once at startup.
/// 凭据模板和上传命令模板，在启动时加载一次。
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub credentials: Template,
    pub upload_command: Template,
}

impl TemplateSet {
    /// The templates compiled into the binary.
    /// 编译进二进制文件的模板。
    pub fn builtin() -> Result<Self, TemplateError> {
        Ok(Self {
            credentials: Template::parse(CREDENTIALS_TEMPLATE_FILE, BUILTIN_CREDENTIALS)?,
            upload_command: Template::parse(UPLOAD_TEMPLATE_FILE, BUILTIN_UPLOAD_COMMAND.trim_end())?,
        })
    }

    /// Loads the built-in templates, replacing each one that has a file of the
    /// same name in `overrides`.
    ///
    /// 加载内置模板，并用 `overrides` 目录中同名文件替换对应模板。
    pub fn load(overrides: Option<&Path>) -> Result<Self, TemplateError> {
        let mut set = Self::builtin()?;
        let Some(dir) = overrides else {
            return Ok(set);
        };

        let credentials_path = dir.join(CREDENTIALS_TEMPLATE_FILE);
        if credentials_path.is_file() {
            set.credentials = Template::from_file(&credentials_path)?;
        }

        let upload_path = dir.join(UPLOAD_TEMPLATE_FILE);
        if upload_path.is_file() {
            let source = fs::read_to_string(&upload_path).map_err(|e| TemplateError::Read {
                path: upload_path.display().to_string(),
                message: e.to_string(),
            })?;
            // A trailing newline from the editor is not part of the command.
            set.upload_command = Template::parse(UPLOAD_TEMPLATE_FILE, source.trim_end())?;
        }

        Ok(set)
    }
}
