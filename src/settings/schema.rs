//! # 设置模式与默认值
//!
//! 定义完整的设置键集合（带默认值）和验证后的类型化设置对象。
//! 默认模式在启动时构建一次，之后只读，由调用方显式传入验证器。
//!
//! ## 依赖关系
//! - 被 `settings/mod.rs` 和 `commands/` 使用
//! - 使用 `settings/tensor.rs` 的张量类型

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::settings::tensor::{ElasticTensor, Tensor3};

/// 形变势设置
///
/// 单一值、导带/价带对，或延迟解析的文件引用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeformationPotential {
    /// 导带与价带共用的单一形变势 (eV)
    Single(f64),
    /// (导带, 价带) 形变势对 (eV)
    Pair(f64, f64),
    /// 外部文件引用，由加载器延迟解析
    File(String),
}

/// 验证后的输运设置
///
/// 键集合即默认模式的键集合：验证总是以默认值起步，
/// 用户提供的键逐个覆盖，未知键被拒绝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // ─── 载流子与温度网格 ───
    /// 载流子浓度列表 (cm^-3)
    pub doping: Vec<f64>,
    /// 温度列表 (K)
    pub temperatures: Vec<f64>,

    // ─── 材料参数 ───
    /// 形变势
    pub deformation_potential: Option<DeformationPotential>,
    /// 静态介电张量 (3x3)
    pub static_dielectric: Option<Tensor3>,
    /// 高频介电张量 (3x3)
    pub high_frequency_dielectric: Option<Tensor3>,
    /// 弹性常数张量 (3,3,3,3)
    pub elastic_constant: Option<ElasticTensor>,
    /// 极性光学声子频率 (THz)
    pub pop_frequency: Option<f64>,
    /// 受主电荷态
    pub acceptor_charge: f64,
    /// 施主电荷态
    pub donor_charge: f64,
    /// 带隙修正 (eV)
    pub bandgap: Option<f64>,
    /// 剪刀算符平移 (eV)
    pub scissor: Option<f64>,

    // ─── 计算控制 ───
    /// 散射机制选择（"auto" 或机制名列表）
    pub scattering_type: String,
    /// 能带插值倍数
    pub interpolation_factor: u32,
    /// Fermi-Dirac 截断容差
    pub fd_tol: f64,
    /// 对称性判别精度
    pub symprec: f64,
    /// 工作进程数（-1 = 自动）
    pub nworkers: i64,
    /// 是否计算迁移率
    pub calculate_mobility: bool,
    /// 是否按散射机制分解迁移率
    pub separate_mobility: bool,

    // ─── 输出控制 ───
    /// 输出文件格式
    pub file_format: String,
    /// 是否回写归一化后的输入设置
    pub write_input: bool,
    /// 是否输出网格数据容器
    pub write_mesh: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            doping: vec![1e16],
            temperatures: vec![300.0],
            deformation_potential: None,
            static_dielectric: None,
            high_frequency_dielectric: None,
            elastic_constant: None,
            pop_frequency: None,
            acceptor_charge: 1.0,
            donor_charge: 1.0,
            bandgap: None,
            scissor: None,
            scattering_type: "auto".to_string(),
            interpolation_factor: 10,
            fd_tol: 0.05,
            symprec: 0.01,
            nworkers: -1,
            calculate_mobility: true,
            separate_mobility: true,
            file_format: "json".to_string(),
            write_input: false,
            write_mesh: false,
        }
    }
}

/// 默认设置模式
///
/// 以只读映射形式持有全部已识别的设置键及其默认值，
/// 是验证器接受键集合的唯一依据。
#[derive(Debug, Clone)]
pub struct SettingsSchema {
    defaults: Mapping,
}

impl SettingsSchema {
    /// 从内建输运默认值构建模式
    pub fn transport_defaults() -> Self {
        let value = serde_yaml::to_value(Settings::default())
            .expect("default settings always serialize");
        let defaults = match value {
            Value::Mapping(m) => m,
            _ => Mapping::new(),
        };
        SettingsSchema { defaults }
    }

    /// 默认值映射
    pub fn defaults(&self) -> &Mapping {
        &self.defaults
    }

    /// 判断键是否属于模式
    pub fn contains(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    /// 已识别的设置键数量
    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}
