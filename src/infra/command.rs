//! # Command Execution Module / 命令执行模块
//!
//! Turns rendered command lines into structured processes and runs them with
//! their standard output and standard error captured as separate buffers.
//!
//! 将渲染后的命令行转换为结构化进程，并运行它们，
//! 同时将标准输出和标准错误分别捕获到独立的缓冲区中。

use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;

use crate::infra::t;

/// A command line split into leading `NAME=value` environment assignments,
/// the program and its arguments.
///
/// 拆分为前导 `NAME=value` 环境变量赋值、程序及其参数的命令行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub env: Vec<(String, String)>,
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Splits `line` with POSIX shell quoting rules. Tokens of the form
    /// `NAME=value` before the program become environment variables, the way a
    /// shell treats them.
    ///
    /// # Errors
    /// Returns a description when the quoting is unbalanced or no program remains.
    ///
    /// 按 POSIX shell 引用规则拆分 `line`。程序之前形如 `NAME=value` 的标记
    /// 会像在 shell 中一样成为环境变量。
    pub fn parse(line: &str) -> Result<Self, String> {
        let tokens = shlex::split(line).ok_or_else(|| "unbalanced quotes".to_string())?;
        Self::from_words(tokens)
    }

    /// Builds a command line from words that are already split.
    ///
    /// # Errors
    /// Returns a description when no program remains after the assignments.
    pub fn from_words(words: Vec<String>) -> Result<Self, String> {
        let mut env = Vec::new();
        let mut rest = words.into_iter().peekable();
        while let Some(assignment) = rest
            .peek()
            .and_then(|token| split_assignment(token))
            .map(|(name, value)| (name.to_string(), value.to_string()))
        {
            env.push(assignment);
            rest.next();
        }

        let program = rest.next().ok_or_else(|| "no program to execute".to_string())?;
        Ok(Self {
            env,
            program,
            args: rest.collect(),
        })
    }

    /// Builds a process for this command line. Stdin is detached so the child
    /// never reads from the controlling terminal.
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null());
        cmd
    }
}

fn split_assignment(token: &str) -> Option<(&str, &str)> {
    let (name, value) = token.split_once('=')?;
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    valid.then_some((name, value))
}

/// Captured result of a finished process.
/// 已结束进程的捕获结果。
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawns a command, captures its stdout and stderr.
/// Both streams are drained concurrently so a chatty child cannot block on a
/// full pipe, then the call waits for the process to exit.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// The exit status and both output streams, or the spawn error.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 两个流被并发读取，以免子进程因管道写满而阻塞，随后等待进程退出。
pub async fn spawn_and_capture(mut cmd: tokio::process::Command) -> io::Result<CapturedOutput> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other(t!("command.capture_stdout_failed").to_string()))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other(t!("command.capture_stderr_failed").to_string()))?;

    let mut out = Vec::new();
    let mut err = Vec::new();
    tokio::try_join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err))?;

    let status = child.wait().await?;
    Ok(CapturedOutput {
        status,
        stdout: out,
        stderr: err,
    })
}
