//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `validate`: 验证并归一化输运设置文件
//! - `inspect`: 查看网格数据容器内容，可选导出数组条目
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: inspect, validate

pub mod inspect;
pub mod validate;

use clap::{Parser, Subcommand};

/// Qtransport - 载流子输运模拟工具箱
#[derive(Parser)]
#[command(name = "qtransport")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A carrier transport simulation toolkit for semiconductors", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a transport settings file against the default schema
    Validate(validate::ValidateArgs),

    /// Inspect entries stored in a mesh data container
    Inspect(inspect::InspectArgs),
}
