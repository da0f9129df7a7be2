// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 外部进程错误类型
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// 进程无法启动
    #[error("Failed to start '{command}': {reason}")]
    Spawn { command: String, reason: String },
    /// 非零退出
    #[error("Command '{command}' returned non-zero exit status {}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// 超时，进程已被终止
    #[error("Command '{command}' timed out after {after:?}")]
    Timeout { command: String, after: Duration },
}

impl CommandError {
    /// 失败时已捕获的标准输出
    pub fn stdout_lines(&self) -> Vec<String> {
        match self {
            CommandError::Failed { stdout, .. } => split_lines(stdout),
            _ => Vec::new(),
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// 待执行的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// 工作目录
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 进程输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// 标准输出按行拆分
    pub fn lines(&self) -> Vec<String> {
        split_lines(&self.stdout)
    }
}

/// 外部进程执行器
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行命令，直到进程结束或超时
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}
