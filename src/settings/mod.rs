//! # 设置验证模块
//!
//! 把松散类型的用户设置映射（标量、字符串、列表）规范化为
//! 类型化的 `Settings` 对象：默认值深拷贝起步、逐键覆盖、
//! 固定顺序的字段规范化、最后拒绝未知键。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: parse, schema, tensor

pub mod parse;
pub mod schema;
pub mod tensor;

pub use parse::{parse_deformation_potential, parse_doping, parse_temperatures};
pub use schema::{DeformationPotential, Settings, SettingsSchema};
pub use tensor::{cast_elastic_tensor, cast_tensor, ElasticTensor, Tensor3};

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{QtransportError, Result};
use crate::settings::tensor::value_as_f64;

/// 验证并规范化用户设置
///
/// 以模式默认值的拷贝起步，浅覆盖用户提供的每个键，按固定顺序
/// 规范化特殊字段，最后对完整键集合拒绝未知键。成功时返回新的
/// 类型化设置对象，无其他副作用。
pub fn validate_settings(user: &Mapping, schema: &SettingsSchema) -> Result<Settings> {
    let mut merged = schema.defaults().clone();
    for (key, value) in user {
        merged.insert(key.clone(), value.clone());
    }

    // 按固定顺序规范化特殊字段
    normalize_with(&mut merged, "doping", |v| {
        Ok(serde_yaml::to_value(normalize_grid(v, parse_doping, "doping")?)?)
    })?;
    normalize_with(&mut merged, "temperatures", |v| {
        Ok(serde_yaml::to_value(normalize_grid(
            v,
            parse_temperatures,
            "temperatures",
        )?)?)
    })?;
    normalize_with(&mut merged, "deformation_potential", |v| {
        Ok(serde_yaml::to_value(normalize_deformation_potential(v)?)?)
    })?;
    normalize_with(&mut merged, "static_dielectric", |v| {
        if v.is_null() {
            return Ok(Value::Null);
        }
        Ok(serde_yaml::to_value(cast_tensor(v)?)?)
    })?;
    normalize_with(&mut merged, "high_frequency_dielectric", |v| {
        if v.is_null() {
            return Ok(Value::Null);
        }
        Ok(serde_yaml::to_value(cast_tensor(v)?)?)
    })?;
    normalize_with(&mut merged, "elastic_constant", |v| {
        if v.is_null() {
            return Ok(Value::Null);
        }
        Ok(serde_yaml::to_value(cast_elastic_tensor(v)?)?)
    })?;

    // 未知键检查放在规范化之后，覆盖完整键集合
    for key in merged.keys() {
        match key.as_str() {
            Some(name) if schema.contains(name) => {}
            Some(name) => {
                return Err(QtransportError::UnrecognisedSetting {
                    key: name.to_string(),
                })
            }
            None => {
                return Err(QtransportError::UnrecognisedSetting {
                    key: format!("{key:?}"),
                })
            }
        }
    }

    let settings: Settings = serde_yaml::from_value(Value::Mapping(merged))?;
    Ok(settings)
}

/// 从 YAML 文件加载并验证设置
///
/// 文件缺失的键静默回填默认值。
pub fn load_settings_from_file(path: &Path, schema: &SettingsSchema) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| QtransportError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let user: Mapping = serde_yaml::from_str(&content)?;
    validate_settings(&user, schema)
}

/// 把规范化后的设置写回 YAML 文件
pub fn write_settings_to_file(settings: &Settings, path: &Path) -> Result<()> {
    let content = serde_yaml::to_string(settings)?;
    fs::write(path, content).map_err(|e| QtransportError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 就地替换映射中某个键的值
fn normalize_with<F>(merged: &mut Mapping, key: &str, normalize: F) -> Result<()>
where
    F: FnOnce(&Value) -> Result<Value>,
{
    // 默认模式保证键总是存在
    if let Some(value) = merged.get(key).cloned() {
        let normalized = normalize(&value)?;
        merged.insert(Value::String(key.to_string()), normalized);
    }
    Ok(())
}

/// 掺杂/温度字段规范化：标量提升为单元素列表，字符串走紧凑语法，
/// 序列逐元素取数值
fn normalize_grid<F>(value: &Value, parse: F, key: &str) -> Result<Vec<f64>>
where
    F: Fn(&str) -> Result<Vec<f64>>,
{
    match value {
        Value::Number(_) => {
            let x = value_as_f64(value).ok_or_else(|| QtransportError::InvalidSetting {
                key: key.to_string(),
                reason: "expected a finite number".to_string(),
            })?;
            Ok(vec![x])
        }
        Value::String(text) => parse(text),
        Value::Sequence(seq) => seq
            .iter()
            .map(|v| {
                value_as_f64(v).ok_or_else(|| QtransportError::InvalidSetting {
                    key: key.to_string(),
                    reason: "non-numeric entry in list".to_string(),
                })
            })
            .collect(),
        _ => Err(QtransportError::InvalidSetting {
            key: key.to_string(),
            reason: "expected a number, list, or range string".to_string(),
        }),
    }
}

/// 形变势字段规范化：字符串走紧凑语法，长度 2 的列表转为有序对
fn normalize_deformation_potential(value: &Value) -> Result<Option<DeformationPotential>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(_) => {
            let x = value_as_f64(value).ok_or_else(|| QtransportError::InvalidSetting {
                key: "deformation_potential".to_string(),
                reason: "expected a finite number".to_string(),
            })?;
            Ok(Some(DeformationPotential::Single(x)))
        }
        Value::String(text) => parse_deformation_potential(text).map(Some),
        Value::Sequence(seq) => {
            let parts: Option<Vec<f64>> = seq.iter().map(value_as_f64).collect();
            match parts.as_deref() {
                Some([conduction, valence]) => {
                    Ok(Some(DeformationPotential::Pair(*conduction, *valence)))
                }
                _ => Err(QtransportError::InvalidSetting {
                    key: "deformation_potential".to_string(),
                    reason: "expected a pair of (conduction, valence) potentials".to_string(),
                }),
            }
        }
        _ => Err(QtransportError::InvalidSetting {
            key: "deformation_potential".to_string(),
            reason: "expected a number, pair, or file reference".to_string(),
        }),
    }
}
