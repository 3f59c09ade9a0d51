//! # inspect 子命令 CLI 定义
//!
//! 查看网格容器条目并可选导出数组数据。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::mesh::Spin;

/// 自旋通道选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpinChannel {
    Up,
    Down,
}

impl From<SpinChannel> for Spin {
    fn from(channel: SpinChannel) -> Self {
        match channel {
            SpinChannel::Up => Spin::Up,
            SpinChannel::Down => Spin::Down,
        }
    }
}

impl std::fmt::Display for SpinChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpinChannel::Up => write!(f, "up"),
            SpinChannel::Down => write!(f, "down"),
        }
    }
}

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input mesh container file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Export this array entry to CSV
    #[arg(short, long)]
    pub export: Option<String>,

    /// Spin channel for spin-resolved entries
    #[arg(short, long, value_enum)]
    pub spin: Option<SpinChannel>,

    /// Output CSV path (defaults to <entry>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
