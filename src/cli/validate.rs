//! # validate 子命令 CLI 定义
//!
//! 验证输运设置文件并可选回写归一化结果。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/validate.rs`

use clap::Args;
use std::path::PathBuf;

/// validate 子命令参数
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Input settings file (YAML)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the normalized settings to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
