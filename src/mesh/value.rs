//! # 网格条目值编解码
//!
//! 网格条目的显式标签变体类型及其线格式。每个变体一个编码函数、
//! 一个解码函数，由 `write_to`/`read_from` 的单一 match 分发。
//!
//! ## 线格式（小端）
//! ```text
//! [类型标签: u8]
//! Array:     [维数: u8][各维长度: u64...][压缩长度: u64][gzip f64 数据]
//! Structure: [长度: u64][JSON 文本]
//! TextList:  [条数: u32][槽宽: u32][NUL 填充的定宽字节槽...]
//! Scalar:    [子标签: u8][i64 / f64 / u8]
//! Absent:    （无负载）
//! ```
//!
//! 只有稠密数值数组被压缩；标量、缺失标记、文本槽和结构文本块
//! 原样存储。
//!
//! ## 依赖关系
//! - 被 `mesh/container.rs` 使用
//! - 使用 `models/structure.rs`

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{ArrayD, IxDyn};

use crate::error::{QtransportError, Result};
use crate::models::Structure;

const TAG_ARRAY: u8 = 0;
const TAG_STRUCTURE: u8 = 1;
const TAG_TEXT_LIST: u8 = 2;
const TAG_SCALAR: u8 = 3;
const TAG_ABSENT: u8 = 4;

const SCALAR_INT: u8 = 0;
const SCALAR_FLOAT: u8 = 1;
const SCALAR_BOOL: u8 = 2;

/// 标量条目
#[derive(Debug, Clone, PartialEq)]
pub enum MeshScalar {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// 网格条目值
///
/// 覆盖网格容器支持的全部值类别：稠密数值数组、晶体结构记录、
/// 定宽文本列表、标量，以及"值刻意缺失"标记。
#[derive(Debug, Clone, PartialEq)]
pub enum MeshValue {
    /// 稠密数值数组（形状精确保留，gzip 压缩存储）
    Array(ArrayD<f64>),
    /// 晶体结构记录（JSON 文本块）
    Structure(Structure),
    /// 文本标识符列表（定宽字节槽，ASCII 无损）
    TextList(Vec<String>),
    /// 标量
    Scalar(MeshScalar),
    /// 值刻意缺失（如价带指标未知）
    Absent,
}

impl MeshValue {
    /// 值类别名，用于表格展示
    pub fn kind(&self) -> &'static str {
        match self {
            MeshValue::Array(_) => "array",
            MeshValue::Structure(_) => "structure",
            MeshValue::TextList(_) => "text list",
            MeshValue::Scalar(_) => "scalar",
            MeshValue::Absent => "absent",
        }
    }

    /// 编码一个值（类型标签 + 变体负载）
    pub(crate) fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        match self {
            MeshValue::Array(array) => {
                write_u8(w, TAG_ARRAY)?;
                encode_array(w, array)
            }
            MeshValue::Structure(structure) => {
                write_u8(w, TAG_STRUCTURE)?;
                encode_structure(w, structure)
            }
            MeshValue::TextList(items) => {
                write_u8(w, TAG_TEXT_LIST)?;
                encode_text_list(w, items)
            }
            MeshValue::Scalar(scalar) => {
                write_u8(w, TAG_SCALAR)?;
                encode_scalar(w, scalar)
            }
            MeshValue::Absent => write_u8(w, TAG_ABSENT),
        }
    }

    /// 解码一个值
    pub(crate) fn read_from<R: Read>(r: &mut R) -> Result<MeshValue> {
        match read_u8(r)? {
            TAG_ARRAY => Ok(MeshValue::Array(decode_array(r)?)),
            TAG_STRUCTURE => Ok(MeshValue::Structure(decode_structure(r)?)),
            TAG_TEXT_LIST => Ok(MeshValue::TextList(decode_text_list(r)?)),
            TAG_SCALAR => Ok(MeshValue::Scalar(decode_scalar(r)?)),
            TAG_ABSENT => Ok(MeshValue::Absent),
            tag => Err(QtransportError::MeshFormat(format!(
                "unknown entry type tag: {}",
                tag
            ))),
        }
    }
}

impl From<ArrayD<f64>> for MeshValue {
    fn from(array: ArrayD<f64>) -> Self {
        MeshValue::Array(array)
    }
}

impl From<Structure> for MeshValue {
    fn from(structure: Structure) -> Self {
        MeshValue::Structure(structure)
    }
}

impl From<Vec<String>> for MeshValue {
    fn from(items: Vec<String>) -> Self {
        MeshValue::TextList(items)
    }
}

impl From<i64> for MeshValue {
    fn from(x: i64) -> Self {
        MeshValue::Scalar(MeshScalar::Int(x))
    }
}

impl From<f64> for MeshValue {
    fn from(x: f64) -> Self {
        MeshValue::Scalar(MeshScalar::Float(x))
    }
}

impl From<bool> for MeshValue {
    fn from(x: bool) -> Self {
        MeshValue::Scalar(MeshScalar::Bool(x))
    }
}

// ─────────────────────────────────────────────────────────────
// 变体编解码
// ─────────────────────────────────────────────────────────────

fn encode_array<W: Write>(w: &mut W, array: &ArrayD<f64>) -> Result<()> {
    write_u8(w, array.ndim() as u8)?;
    for &dim in array.shape() {
        write_u64(w, dim as u64)?;
    }

    let mut raw = Vec::with_capacity(array.len() * 8);
    for value in array.iter() {
        raw.extend_from_slice(&value.to_le_bytes());
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    write_u64(w, compressed.len() as u64)?;
    w.write_all(&compressed)?;
    Ok(())
}

fn decode_array<R: Read>(r: &mut R) -> Result<ArrayD<f64>> {
    let ndim = read_u8(r)? as usize;
    let mut shape = Vec::with_capacity(ndim);
    for _ in 0..ndim {
        shape.push(read_u64(r)? as usize);
    }

    let compressed_len = read_u64(r)? as usize;
    let mut compressed = vec![0u8; compressed_len];
    r.read_exact(&mut compressed)?;

    let mut raw = Vec::new();
    GzDecoder::new(&compressed[..]).read_to_end(&mut raw)?;

    let expected = shape.iter().product::<usize>() * 8;
    if raw.len() != expected {
        return Err(QtransportError::MeshFormat(format!(
            "array payload size mismatch: expected {} bytes, found {}",
            expected,
            raw.len()
        )));
    }

    let mut data = Vec::with_capacity(raw.len() / 8);
    for chunk in raw.chunks_exact(8) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        data.push(f64::from_le_bytes(buf));
    }

    ArrayD::from_shape_vec(IxDyn(&shape), data)
        .map_err(|e| QtransportError::MeshFormat(format!("invalid array shape: {}", e)))
}

fn encode_structure<W: Write>(w: &mut W, structure: &Structure) -> Result<()> {
    let text = structure.to_json()?;
    write_u64(w, text.len() as u64)?;
    w.write_all(text.as_bytes())?;
    Ok(())
}

fn decode_structure<R: Read>(r: &mut R) -> Result<Structure> {
    let len = read_u64(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;

    let text = String::from_utf8(buf).map_err(|_| {
        QtransportError::MeshFormat("structure blob is not valid UTF-8".to_string())
    })?;
    Structure::from_json(&text)
}

fn encode_text_list<W: Write>(w: &mut W, items: &[String]) -> Result<()> {
    let width = items.iter().map(|s| s.len()).max().unwrap_or(0).max(1);

    write_u32(w, items.len() as u32)?;
    write_u32(w, width as u32)?;

    for item in items {
        let bytes = item.as_bytes();
        w.write_all(bytes)?;
        for _ in bytes.len()..width {
            write_u8(w, 0)?;
        }
    }
    Ok(())
}

fn decode_text_list<R: Read>(r: &mut R) -> Result<Vec<String>> {
    let count = read_u32(r)? as usize;
    let width = read_u32(r)? as usize;
    if width == 0 {
        return Err(QtransportError::MeshFormat(
            "text list slot width must be nonzero".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(count);
    let mut slot = vec![0u8; width];
    for _ in 0..count {
        r.read_exact(&mut slot)?;
        let end = slot.iter().position(|&b| b == 0).unwrap_or(width);
        let item = std::str::from_utf8(&slot[..end]).map_err(|_| {
            QtransportError::MeshFormat("text list slot is not valid UTF-8".to_string())
        })?;
        items.push(item.to_string());
    }
    Ok(items)
}

fn encode_scalar<W: Write>(w: &mut W, scalar: &MeshScalar) -> Result<()> {
    match scalar {
        MeshScalar::Int(x) => {
            write_u8(w, SCALAR_INT)?;
            w.write_all(&x.to_le_bytes())?;
        }
        MeshScalar::Float(x) => {
            write_u8(w, SCALAR_FLOAT)?;
            w.write_all(&x.to_le_bytes())?;
        }
        MeshScalar::Bool(x) => {
            write_u8(w, SCALAR_BOOL)?;
            write_u8(w, u8::from(*x))?;
        }
    }
    Ok(())
}

fn decode_scalar<R: Read>(r: &mut R) -> Result<MeshScalar> {
    match read_u8(r)? {
        SCALAR_INT => {
            let mut buf = [0u8; 8];
            r.read_exact(&mut buf)?;
            Ok(MeshScalar::Int(i64::from_le_bytes(buf)))
        }
        SCALAR_FLOAT => {
            let mut buf = [0u8; 8];
            r.read_exact(&mut buf)?;
            Ok(MeshScalar::Float(f64::from_le_bytes(buf)))
        }
        SCALAR_BOOL => match read_u8(r)? {
            0 => Ok(MeshScalar::Bool(false)),
            1 => Ok(MeshScalar::Bool(true)),
            other => Err(QtransportError::MeshFormat(format!(
                "invalid boolean scalar byte: {}",
                other
            ))),
        },
        tag => Err(QtransportError::MeshFormat(format!(
            "unknown scalar subtag: {}",
            tag
        ))),
    }
}

// ─────────────────────────────────────────────────────────────
// 小端线格式原语
// ─────────────────────────────────────────────────────────────

pub(crate) fn write_u8<W: Write>(w: &mut W, value: u8) -> Result<()> {
    w.write_all(&[value])?;
    Ok(())
}

pub(crate) fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub(crate) fn write_u32<W: Write>(w: &mut W, value: u32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn write_u64<W: Write>(w: &mut W, value: u64) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub(crate) fn write_str<W: Write>(w: &mut W, value: &str) -> Result<()> {
    write_u32(w, value.len() as u32)?;
    w.write_all(value.as_bytes())?;
    Ok(())
}

pub(crate) fn read_str<R: Read>(r: &mut R) -> Result<String> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|_| QtransportError::MeshFormat("entry name is not valid UTF-8".to_string()))
}
