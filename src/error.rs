//! # 统一错误处理模块
//!
//! 定义 Qtransport 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Qtransport 统一错误类型
#[derive(Error, Debug)]
pub enum QtransportError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // 设置验证错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unrecognised setting: {key}")]
    UnrecognisedSetting { key: String },

    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Unsupported tensor shape. Should be a scalar, 3-vector, or (3, 3) matrix.")]
    UnsupportedTensorShape,

    #[error("Unsupported elastic tensor shape. Should be (6, 6) or (3, 3, 3, 3).")]
    UnsupportedElasticTensorShape,

    // ─────────────────────────────────────────────────────────────
    // 紧凑字符串语法错误（携带原始输入）
    // ─────────────────────────────────────────────────────────────
    #[error("Unrecognised doping format: {0}")]
    UnrecognisedDopingFormat(String),

    #[error("Unrecognised temperature format: {0}")]
    UnrecognisedTemperatureFormat(String),

    #[error("Unrecognised deformation potential format: {0}")]
    UnrecognisedDeformationPotentialFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 网格容器错误
    // ─────────────────────────────────────────────────────────────
    #[error("Corrupt mesh container: {0}")]
    MeshFormat(String),

    #[error("Entry not found in mesh container: {0}")]
    EntryNotFound(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, QtransportError>;
