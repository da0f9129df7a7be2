// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部进程执行模块
pub mod shell;
pub mod traits;

pub use shell::ShellRunner;
pub use traits::{CommandError, CommandOutput, CommandRunner, CommandSpec};
