//! # 紧凑设置字符串语法
//!
//! 解析掺杂浓度、温度和形变势的紧凑字符串形式：
//!
//! ```text
//! 掺杂:   "1e18:1e20:5"      -> 5 个几何间隔点（端点同号）
//!         "1e18,2e18,3e18"   -> 逐个解析的列表
//! 温度:   "100:300:3"        -> 3 个线性间隔点
//! 形变势: "8.6" / "8.6,7.2"  -> 单值 / (导带, 价带) 对
//!         "deformation.h5"   -> 文件引用，延迟解析
//! ```
//!
//! 解析失败的错误信息原样携带输入字符串。
//!
//! ## 依赖关系
//! - 被 `settings/mod.rs` 使用
//! - 使用 `settings/schema.rs` 的 `DeformationPotential`

use crate::error::{QtransportError, Result};
use crate::settings::schema::DeformationPotential;

/// 网格点间隔方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    Linear,
    Geometric,
}

/// 解析掺杂浓度字符串
///
/// 含 `:` 时按 `lo:hi:n` 解析为 n 个几何间隔点，否则按逗号列表解析。
pub fn parse_doping(input: &str) -> Result<Vec<f64>> {
    parse_grid_spec(input, Spacing::Geometric)
        .ok_or_else(|| QtransportError::UnrecognisedDopingFormat(input.to_string()))
}

/// 解析温度字符串
///
/// 与掺杂语法同构，但范围形式为线性间隔。
pub fn parse_temperatures(input: &str) -> Result<Vec<f64>> {
    parse_grid_spec(input, Spacing::Linear)
        .ok_or_else(|| QtransportError::UnrecognisedTemperatureFormat(input.to_string()))
}

/// 解析形变势字符串
///
/// 含 "h5" 的输入视为文件引用原样返回；否则 1 个数值为单值，
/// 2 个为 (导带, 价带) 对，其余个数为错误。
pub fn parse_deformation_potential(input: &str) -> Result<DeformationPotential> {
    if input.contains("h5") {
        return Ok(DeformationPotential::File(input.to_string()));
    }

    let cleaned = strip_whitespace(input);
    let parts: Option<Vec<f64>> = cleaned.split(',').map(|t| t.parse().ok()).collect();

    match parts.as_deref() {
        Some([single]) => Ok(DeformationPotential::Single(*single)),
        Some([conduction, valence]) => Ok(DeformationPotential::Pair(*conduction, *valence)),
        _ => Err(QtransportError::UnrecognisedDeformationPotentialFormat(
            input.to_string(),
        )),
    }
}

/// 共享的范围/列表语法
fn parse_grid_spec(input: &str, spacing: Spacing) -> Option<Vec<f64>> {
    let cleaned = strip_whitespace(input);

    if cleaned.contains(':') {
        let parts: Vec<&str> = cleaned.split(':').collect();
        if parts.len() != 3 {
            return None;
        }

        let lo: f64 = parts[0].parse().ok()?;
        let hi: f64 = parts[1].parse().ok()?;
        let count: f64 = parts[2].parse().ok()?;
        if count < 0.0 {
            return None;
        }
        let num = count as usize;

        match spacing {
            Spacing::Linear => Some(linspace(lo, hi, num)),
            Spacing::Geometric => geomspace(lo, hi, num),
        }
    } else {
        cleaned.split(',').map(|t| t.parse().ok()).collect()
    }
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// num 个含两端点的线性间隔点
fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut points: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            points[num - 1] = stop;
            points
        }
    }
}

/// num 个含两端点的几何间隔点
///
/// 端点必须同号且非零，否则几何间隔无定义。
fn geomspace(start: f64, stop: f64, num: usize) -> Option<Vec<f64>> {
    if start == 0.0 || stop == 0.0 || (start < 0.0) != (stop < 0.0) {
        return None;
    }

    let sign = start.signum();
    let mut points: Vec<f64> = linspace(start.abs().ln(), stop.abs().ln(), num)
        .into_iter()
        .map(|x| sign * x.exp())
        .collect();

    // 端点精确
    if let Some(first) = points.first_mut() {
        *first = start;
    }
    if num > 1 {
        points[num - 1] = stop;
    }

    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_doping_geometric_range() {
        let points = parse_doping("1e18:1e20:5").unwrap();

        assert_eq!(points.len(), 5);
        assert!((points[0] - 1e18).abs() < 1e6);
        assert!((points[4] - 1e20).abs() < 1e6);
        // 相邻点比值恒定
        let ratio = points[1] / points[0];
        for pair in points.windows(2) {
            assert!((pair[1] / pair[0] - ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parse_doping_comma_list() {
        let points = parse_doping("1e18,2e18,3e18").unwrap();

        assert_eq!(points, vec![1e18, 2e18, 3e18]);
    }

    #[test]
    fn test_parse_doping_negative_range() {
        let points = parse_doping("-1e18:-1e20:3").unwrap();

        assert_eq!(points.len(), 3);
        assert!((points[0] + 1e18).abs() < 1e6);
        assert!((points[2] + 1e20).abs() < 1e6);
        assert!(points.iter().all(|&x| x < 0.0));
    }

    #[test]
    fn test_parse_doping_wrong_part_count() {
        let err = parse_doping("1:2:3:4").unwrap_err();

        match err {
            QtransportError::UnrecognisedDopingFormat(input) => assert_eq!(input, "1:2:3:4"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_doping_bad_token() {
        assert!(parse_doping("1e18,abc").is_err());
        assert!(parse_doping("").is_err());
    }

    #[test]
    fn test_parse_doping_opposite_signs() {
        // 异号端点的几何间隔无定义
        assert!(matches!(
            parse_doping("-1e18:1e20:5"),
            Err(QtransportError::UnrecognisedDopingFormat(_))
        ));
    }

    #[test]
    fn test_parse_doping_ignores_whitespace() {
        let points = parse_doping(" 1e18 , 2e18 ").unwrap();

        assert_eq!(points, vec![1e18, 2e18]);
    }

    #[test]
    fn test_parse_temperatures_linear_range() {
        let points = parse_temperatures("100:300:3").unwrap();

        assert_eq!(points, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_parse_temperatures_single_point_range() {
        let points = parse_temperatures("300:500:1").unwrap();

        assert_eq!(points, vec![300.0]);
    }

    #[test]
    fn test_parse_temperatures_bad_format() {
        let err = parse_temperatures("100:?:3").unwrap_err();

        match err {
            QtransportError::UnrecognisedTemperatureFormat(input) => assert_eq!(input, "100:?:3"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_deformation_potential_single() {
        let dp = parse_deformation_potential("8.6").unwrap();

        assert_eq!(dp, DeformationPotential::Single(8.6));
    }

    #[test]
    fn test_parse_deformation_potential_pair() {
        let dp = parse_deformation_potential("8.6, 7.2").unwrap();

        assert_eq!(dp, DeformationPotential::Pair(8.6, 7.2));
    }

    #[test]
    fn test_parse_deformation_potential_file_reference() {
        let dp = parse_deformation_potential("deformation.h5").unwrap();

        assert_eq!(dp, DeformationPotential::File("deformation.h5".to_string()));
    }

    #[test]
    fn test_parse_deformation_potential_too_many_parts() {
        assert!(matches!(
            parse_deformation_potential("1.0,2.0,3.0"),
            Err(QtransportError::UnrecognisedDeformationPotentialFormat(_))
        ));
    }
}
