//! # 晶体结构数据模型
//!
//! 定义输运计算使用的晶体结构表示，并提供 JSON 文本编解码。
//! 网格容器把结构记录作为不透明文本块存储。
//!
//! ## 依赖关系
//! - 被 `mesh/` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        // 行列式计算
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }
}

/// 原子位点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// 元素符号
    pub species: String,

    /// 分数坐标 [x, y, z]
    pub frac_coords: [f64; 3],
}

impl Site {
    pub fn new(species: impl Into<String>, frac_coords: [f64; 3]) -> Self {
        Site {
            species: species.into(),
            frac_coords,
        }
    }
}

/// 晶体结构（晶格 + 位点组成）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// 晶格
    pub lattice: Lattice,

    /// 位点列表
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Structure { lattice, sites }
    }

    /// 位点数
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for site in &self.sites {
            *counts.entry(site.species.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 序列化为 JSON 文本块
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 文本块反序列化
    pub fn from_json(text: &str) -> Result<Structure> {
        Ok(serde_json::from_str(text)?)
    }
}
