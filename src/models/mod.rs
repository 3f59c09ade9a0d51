//! # 数据模型模块
//!
//! 定义输运计算共享的晶体结构数据模型。
//!
//! ## 依赖关系
//! - 被 `mesh/` 和 `commands/` 使用
//! - 子模块: structure

pub mod structure;

pub use structure::{Lattice, Site, Structure};
