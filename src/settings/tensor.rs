//! # 张量规范化
//!
//! 把以标量、向量或矩阵形式给出的物理张量设置统一成固定形状的矩阵表示。
//! 介电张量规范化为 3x3；弹性常数经 Voigt 记号展开为 (3,3,3,3)。
//!
//! ## 依赖关系
//! - 被 `settings/mod.rs` 使用
//! - 输入为松散类型的 YAML 值

use serde_yaml::Value;

use crate::error::{QtransportError, Result};

/// 3x3 张量
pub type Tensor3 = [[f64; 3]; 3];

/// (3,3,3,3) 弹性常数张量
pub type ElasticTensor = [[[[f64; 3]; 3]; 3]; 3];

/// 规范化 3x3 张量设置
///
/// - 标量 x -> x * I3
/// - 长度 3 的序列 -> 对角矩阵
/// - 3x3 矩阵 -> 原样返回
/// - 其他形状 -> `UnsupportedTensorShape`
pub fn cast_tensor(value: &Value) -> Result<Tensor3> {
    if let Some(x) = value_as_f64(value) {
        let mut tensor = [[0.0; 3]; 3];
        for (i, row) in tensor.iter_mut().enumerate() {
            row[i] = x;
        }
        return Ok(tensor);
    }

    if let Value::Sequence(seq) = value {
        if let Some(diag) = as_vec3(seq) {
            let mut tensor = [[0.0; 3]; 3];
            for (i, row) in tensor.iter_mut().enumerate() {
                row[i] = diag[i];
            }
            return Ok(tensor);
        }

        if let Some(tensor) = as_matrix3(seq) {
            return Ok(tensor);
        }
    }

    Err(QtransportError::UnsupportedTensorShape)
}

/// 规范化弹性常数张量设置
///
/// - 标量 x -> 6x6 的 x * I6，剪切对角元 (3,4,5) 减半，再展开为 (3,3,3,3)
/// - 6x6 Voigt 矩阵 -> 展开为 (3,3,3,3)
/// - (3,3,3,3) 张量 -> 原样返回
/// - 其他形状 -> `UnsupportedElasticTensorShape`
pub fn cast_elastic_tensor(value: &Value) -> Result<ElasticTensor> {
    if let Some(x) = value_as_f64(value) {
        let mut voigt = [[0.0; 6]; 6];
        for (i, row) in voigt.iter_mut().enumerate() {
            // Voigt 剪切约定：剪切对角元取一半
            row[i] = if i < 3 { x } else { x / 2.0 };
        }
        return Ok(voigt_to_full(&voigt));
    }

    if let Value::Sequence(seq) = value {
        if let Some(voigt) = as_matrix6(seq) {
            return Ok(voigt_to_full(&voigt));
        }

        if let Some(full) = as_rank4(seq) {
            return Ok(full);
        }
    }

    Err(QtransportError::UnsupportedElasticTensorShape)
}

/// Voigt 压缩下标: (0,0)->0 (1,1)->1 (2,2)->2 (1,2)->3 (0,2)->4 (0,1)->5
fn voigt_index(i: usize, j: usize) -> usize {
    if i == j {
        i
    } else {
        6 - i - j
    }
}

/// 按标准 Voigt 映射把 6x6 矩阵展开为 (3,3,3,3) 张量
fn voigt_to_full(voigt: &[[f64; 6]; 6]) -> ElasticTensor {
    let mut full = [[[[0.0; 3]; 3]; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    full[i][j][k][l] = voigt[voigt_index(i, j)][voigt_index(k, l)];
                }
            }
        }
    }
    full
}

/// 松散 YAML 数值转 f64
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn as_vec3(seq: &[Value]) -> Option<[f64; 3]> {
    if seq.len() != 3 {
        return None;
    }
    let mut out = [0.0; 3];
    for (slot, value) in out.iter_mut().zip(seq.iter()) {
        *slot = value_as_f64(value)?;
    }
    Some(out)
}

fn as_matrix3(seq: &[Value]) -> Option<Tensor3> {
    if seq.len() != 3 {
        return None;
    }
    let mut out = [[0.0; 3]; 3];
    for (row, value) in out.iter_mut().zip(seq.iter()) {
        match value {
            Value::Sequence(inner) => *row = as_vec3(inner)?,
            _ => return None,
        }
    }
    Some(out)
}

fn as_vec6(seq: &[Value]) -> Option<[f64; 6]> {
    if seq.len() != 6 {
        return None;
    }
    let mut out = [0.0; 6];
    for (slot, value) in out.iter_mut().zip(seq.iter()) {
        *slot = value_as_f64(value)?;
    }
    Some(out)
}

fn as_matrix6(seq: &[Value]) -> Option<[[f64; 6]; 6]> {
    if seq.len() != 6 {
        return None;
    }
    let mut out = [[0.0; 6]; 6];
    for (row, value) in out.iter_mut().zip(seq.iter()) {
        match value {
            Value::Sequence(inner) => *row = as_vec6(inner)?,
            _ => return None,
        }
    }
    Some(out)
}

fn as_rank4(seq: &[Value]) -> Option<ElasticTensor> {
    if seq.len() != 3 {
        return None;
    }
    let mut out = [[[[0.0; 3]; 3]; 3]; 3];
    for (block, value) in out.iter_mut().zip(seq.iter()) {
        match value {
            Value::Sequence(inner) if inner.len() == 3 => {
                for (plane, plane_value) in block.iter_mut().zip(inner.iter()) {
                    match plane_value {
                        Value::Sequence(rows) => *plane = as_matrix3(rows)?,
                        _ => return None,
                    }
                }
            }
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_cast_tensor_scalar_is_scaled_identity() {
        let tensor = cast_tensor(&yaml("12.5")).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 12.5 } else { 0.0 };
                assert!((tensor[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cast_tensor_vector_is_diagonal() {
        let tensor = cast_tensor(&yaml("[1.0, 2.0, 3.0]")).unwrap();

        assert!((tensor[0][0] - 1.0).abs() < 1e-12);
        assert!((tensor[1][1] - 2.0).abs() < 1e-12);
        assert!((tensor[2][2] - 3.0).abs() < 1e-12);
        assert!((tensor[0][1]).abs() < 1e-12);
        assert!((tensor[2][0]).abs() < 1e-12);
    }

    #[test]
    fn test_cast_tensor_matrix_unchanged() {
        let tensor = cast_tensor(&yaml("[[1, 2, 3], [4, 5, 6], [7, 8, 9]]")).unwrap();

        assert!((tensor[0][1] - 2.0).abs() < 1e-12);
        assert!((tensor[2][2] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_cast_tensor_rejects_bad_shapes() {
        assert!(matches!(
            cast_tensor(&yaml("[1.0, 2.0]")),
            Err(QtransportError::UnsupportedTensorShape)
        ));
        assert!(matches!(
            cast_tensor(&yaml("[[1, 2], [3, 4]]")),
            Err(QtransportError::UnsupportedTensorShape)
        ));
        assert!(matches!(
            cast_tensor(&yaml("not a tensor")),
            Err(QtransportError::UnsupportedTensorShape)
        ));
    }

    #[test]
    fn test_cast_elastic_tensor_scalar() {
        let full = cast_elastic_tensor(&yaml("100.0")).unwrap();

        // C11 = x
        assert!((full[0][0][0][0] - 100.0).abs() < 1e-12);
        // C44 = x / 2（剪切对角元减半）
        assert!((full[1][2][1][2] - 50.0).abs() < 1e-12);
        // 非对角 Voigt 元为零
        assert!((full[0][0][1][1]).abs() < 1e-12);
    }

    #[test]
    fn test_cast_elastic_tensor_voigt_mapping() {
        // C12 = 60 的立方晶系样式矩阵
        let text = "[[165, 60, 60, 0, 0, 0],
                     [60, 165, 60, 0, 0, 0],
                     [60, 60, 165, 0, 0, 0],
                     [0, 0, 0, 80, 0, 0],
                     [0, 0, 0, 0, 80, 0],
                     [0, 0, 0, 0, 0, 80]]";
        let full = cast_elastic_tensor(&yaml(text)).unwrap();

        assert!((full[0][0][0][0] - 165.0).abs() < 1e-12);
        assert!((full[0][0][1][1] - 60.0).abs() < 1e-12);
        assert!((full[1][2][1][2] - 80.0).abs() < 1e-12);
        assert!((full[0][1][0][1] - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_cast_elastic_tensor_rank4_unchanged() {
        let full_in = cast_elastic_tensor(&yaml("150.0")).unwrap();
        let text = serde_yaml::to_string(&serde_yaml::to_value(full_in).unwrap()).unwrap();

        let full_out = cast_elastic_tensor(&yaml(&text)).unwrap();
        assert!((full_out[0][0][0][0] - 150.0).abs() < 1e-12);
        assert!((full_out[1][2][1][2] - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_cast_elastic_tensor_rejects_bad_shapes() {
        assert!(matches!(
            cast_elastic_tensor(&yaml("[1, 2, 3]")),
            Err(QtransportError::UnsupportedElasticTensorShape)
        ));
        assert!(matches!(
            cast_elastic_tensor(&yaml("[[1, 2], [3, 4]]")),
            Err(QtransportError::UnsupportedElasticTensorShape)
        ));
    }
}
