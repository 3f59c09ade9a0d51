//! # 网格数据模块
//!
//! 输运流水线产生的逐网格点物理量集合的内存表示与持久化。
//! 条目可以是普通值，也可以按自旋通道 (up/down) 分解。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/structure.rs`
//! - 子模块: container, value

pub mod container;
pub mod value;

pub use container::{load_mesh_data, write_mesh_data};
pub use value::{MeshScalar, MeshValue};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 自旋通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    /// 通道标签
    pub fn label(self) -> &'static str {
        match self {
            Spin::Up => "up",
            Spin::Down => "down",
        }
    }

    /// 容器内的单字节标签
    pub(crate) fn tag(self) -> u8 {
        match self {
            Spin::Up => 0,
            Spin::Down => 1,
        }
    }

    /// 从单字节标签还原通道
    pub(crate) fn from_tag(tag: u8) -> Option<Spin> {
        match tag {
            0 => Some(Spin::Up),
            1 => Some(Spin::Down),
            _ => None,
        }
    }
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 网格条目：普通值或按自旋通道分解的值
#[derive(Debug, Clone, PartialEq)]
pub enum MeshEntry {
    Plain(MeshValue),
    SpinResolved(BTreeMap<Spin, MeshValue>),
}

impl MeshEntry {
    /// 按两个自旋通道构建分解条目
    pub fn spin_resolved(up: MeshValue, down: MeshValue) -> Self {
        let mut channels = BTreeMap::new();
        channels.insert(Spin::Up, up);
        channels.insert(Spin::Down, down);
        MeshEntry::SpinResolved(channels)
    }
}

impl From<MeshValue> for MeshEntry {
    fn from(value: MeshValue) -> Self {
        MeshEntry::Plain(value)
    }
}

/// 网格数据映射：条目名 -> 条目
pub type MeshData = BTreeMap<String, MeshEntry>;
