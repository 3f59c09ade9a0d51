//! # 网格容器读写
//!
//! 把网格数据映射持久化为自描述二进制容器，并无损读回。
//!
//! ## 文件格式 (v1)
//! ```text
//! [魔数: 4 bytes] "QTMD"
//! [版本: u32]
//! [逻辑键数: u32]
//! 每个逻辑键:
//!   [键名: u32 长度 + UTF-8]
//!   [自旋分解标志: u8]
//!   标志 = 0: [值]
//!   标志 = 1: [通道数: u8]，每通道 [自旋标签: u8][值]
//! ```
//!
//! 清单显式记录逻辑键与自旋分解标志，键名不参与任何约定式
//! 后缀匹配。文件句柄按作用域持有，所有退出路径均释放。
//!
//! ## 依赖关系
//! - 被 `mesh/mod.rs` 重导出，供 `commands/` 使用
//! - 使用 `mesh/value.rs` 的变体编解码与线格式原语

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{QtransportError, Result};
use crate::mesh::value::{read_str, read_u32, read_u8, write_str, write_u32, write_u8};
use crate::mesh::{MeshData, MeshEntry, MeshValue, Spin};

const MESH_MAGIC: &[u8; 4] = b"QTMD";
const MESH_VERSION: u32 = 1;

/// 把网格数据写入容器文件
pub fn write_mesh_data(mesh_data: &MeshData, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| QtransportError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut w = BufWriter::new(file);

    w.write_all(MESH_MAGIC)?;
    write_u32(&mut w, MESH_VERSION)?;
    write_u32(&mut w, mesh_data.len() as u32)?;

    for (key, entry) in mesh_data {
        write_str(&mut w, key)?;
        match entry {
            MeshEntry::Plain(value) => {
                write_u8(&mut w, 0)?;
                value.write_to(&mut w)?;
            }
            MeshEntry::SpinResolved(channels) => {
                write_u8(&mut w, 1)?;
                write_u8(&mut w, channels.len() as u8)?;
                for (spin, value) in channels {
                    write_u8(&mut w, spin.tag())?;
                    value.write_to(&mut w)?;
                }
            }
        }
    }

    w.flush().map_err(|e| QtransportError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 从容器文件读回网格数据
pub fn load_mesh_data(path: &Path) -> Result<MeshData> {
    let file = File::open(path).map_err(|e| QtransportError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut r = BufReader::new(file);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != MESH_MAGIC {
        return Err(QtransportError::MeshFormat(format!(
            "{}: not a mesh container (bad magic)",
            path.display()
        )));
    }

    let version = read_u32(&mut r)?;
    if version != MESH_VERSION {
        return Err(QtransportError::MeshFormat(format!(
            "unsupported container version: {} (expected {})",
            version, MESH_VERSION
        )));
    }

    let count = read_u32(&mut r)? as usize;
    let mut mesh_data = MeshData::new();

    for _ in 0..count {
        let key = read_str(&mut r)?;
        let entry = match read_u8(&mut r)? {
            0 => MeshEntry::Plain(MeshValue::read_from(&mut r)?),
            1 => {
                let channel_count = read_u8(&mut r)? as usize;
                let mut channels = BTreeMap::new();
                for _ in 0..channel_count {
                    let tag = read_u8(&mut r)?;
                    let spin = Spin::from_tag(tag).ok_or_else(|| {
                        QtransportError::MeshFormat(format!("unknown spin tag: {}", tag))
                    })?;
                    channels.insert(spin, MeshValue::read_from(&mut r)?);
                }
                MeshEntry::SpinResolved(channels)
            }
            flag => {
                return Err(QtransportError::MeshFormat(format!(
                    "invalid spin-resolved flag for entry '{}': {}",
                    key, flag
                )))
            }
        };
        mesh_data.insert(key, entry);
    }

    Ok(mesh_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Site, Structure};
    use ndarray::{ArrayD, IxDyn};
    use std::fs;

    fn sample_structure() -> Structure {
        let lattice = Lattice::from_vectors([[5.4, 0.0, 0.0], [0.0, 5.4, 0.0], [0.0, 0.0, 5.4]]);
        Structure::new(
            lattice,
            vec![
                Site::new("Si", [0.0, 0.0, 0.0]),
                Site::new("Si", [0.25, 0.25, 0.25]),
            ],
        )
    }

    fn band_energies(offset: f64) -> ArrayD<f64> {
        let data: Vec<f64> = (0..12).map(|i| offset + i as f64 * 0.1).collect();
        ArrayD::from_shape_vec(IxDyn(&[3, 4]), data).unwrap()
    }

    #[test]
    fn test_round_trip_spin_resolved_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let mut mesh_data = MeshData::new();
        mesh_data.insert(
            "energies".to_string(),
            MeshEntry::spin_resolved(
                MeshValue::Array(band_energies(0.0)),
                MeshValue::Array(band_energies(1.0)),
            ),
        );

        write_mesh_data(&mesh_data, &path).unwrap();
        let loaded = load_mesh_data(&path).unwrap();

        assert_eq!(loaded, mesh_data);
        match &loaded["energies"] {
            MeshEntry::SpinResolved(channels) => {
                assert_eq!(channels.len(), 2);
                assert!(channels.contains_key(&Spin::Up));
                assert!(channels.contains_key(&Spin::Down));
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_structure_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let mut mesh_data = MeshData::new();
        mesh_data.insert(
            "structure".to_string(),
            MeshEntry::from(MeshValue::Structure(sample_structure())),
        );

        write_mesh_data(&mesh_data, &path).unwrap();
        let loaded = load_mesh_data(&path).unwrap();

        match &loaded["structure"] {
            MeshEntry::Plain(MeshValue::Structure(s)) => {
                assert_eq!(*s, sample_structure());
                assert_eq!(s.formula(), "Si2");
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_absent_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let mut mesh_data = MeshData::new();
        mesh_data.insert("vb_idx".to_string(), MeshEntry::Plain(MeshValue::Absent));

        write_mesh_data(&mesh_data, &path).unwrap();
        let loaded = load_mesh_data(&path).unwrap();

        assert_eq!(loaded["vb_idx"], MeshEntry::Plain(MeshValue::Absent));
    }

    #[test]
    fn test_round_trip_scattering_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let labels = vec![
            "ACD".to_string(),
            "IMP".to_string(),
            "POP".to_string(),
            "PIE_thirteen!".to_string(),
        ];
        let mut mesh_data = MeshData::new();
        mesh_data.insert(
            "scattering_labels".to_string(),
            MeshEntry::from(MeshValue::TextList(labels.clone())),
        );

        write_mesh_data(&mesh_data, &path).unwrap();
        let loaded = load_mesh_data(&path).unwrap();

        assert_eq!(
            loaded["scattering_labels"],
            MeshEntry::Plain(MeshValue::TextList(labels))
        );
    }

    #[test]
    fn test_round_trip_mixed_scalars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let mut mesh_data = MeshData::new();
        mesh_data.insert("vb_idx".to_string(), MeshEntry::from(MeshValue::from(11_i64)));
        mesh_data.insert("efermi".to_string(), MeshEntry::from(MeshValue::from(4.25_f64)));
        mesh_data.insert("is_metal".to_string(), MeshEntry::from(MeshValue::from(false)));

        write_mesh_data(&mesh_data, &path).unwrap();
        let loaded = load_mesh_data(&path).unwrap();

        assert_eq!(loaded, mesh_data);
    }

    #[test]
    fn test_full_mesh_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let mut mesh_data = MeshData::new();
        mesh_data.insert(
            "energies".to_string(),
            MeshEntry::spin_resolved(
                MeshValue::Array(band_energies(0.0)),
                MeshValue::Array(band_energies(0.5)),
            ),
        );
        mesh_data.insert(
            "kpoints".to_string(),
            MeshEntry::from(MeshValue::Array(
                ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5])
                    .unwrap(),
            )),
        );
        mesh_data.insert("structure".to_string(), MeshEntry::from(MeshValue::Structure(sample_structure())));
        mesh_data.insert("vb_idx".to_string(), MeshEntry::Plain(MeshValue::Absent));
        mesh_data.insert(
            "scattering_labels".to_string(),
            MeshEntry::from(MeshValue::TextList(vec!["ACD".to_string(), "IMP".to_string()])),
        );

        write_mesh_data(&mesh_data, &path).unwrap();
        let loaded = load_mesh_data(&path).unwrap();

        assert_eq!(loaded, mesh_data);
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");
        fs::write(&path, b"NOPE0000").unwrap();

        let err = load_mesh_data(&path).unwrap_err();
        assert!(matches!(err, QtransportError::MeshFormat(_)));
    }

    #[test]
    fn test_load_rejects_wrong_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.qtm");

        let mut bytes = Vec::new();
        bytes.extend_from_slice(MESH_MAGIC);
        bytes.extend_from_slice(&99u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();

        let err = load_mesh_data(&path).unwrap_err();
        match err {
            QtransportError::MeshFormat(reason) => assert!(reason.contains("version")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_mesh_data(Path::new("no_such_mesh.qtm")).unwrap_err();

        assert!(matches!(err, QtransportError::FileReadError { .. }));
    }
}
