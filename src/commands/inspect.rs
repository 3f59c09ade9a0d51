//! # inspect 命令实现
//!
//! 读取网格数据容器，逐条目/逐自旋通道列出类别与形状，
//! 可选把数组条目导出为 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `mesh/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::inspect::InspectArgs;
use crate::error::{QtransportError, Result};
use crate::mesh::{self, MeshEntry, MeshScalar, MeshValue, Spin};
use crate::utils::{output, progress};

use ndarray::ArrayD;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 条目表格行
#[derive(Debug, Clone, Tabled)]
struct EntryRow {
    #[tabled(rename = "Entry")]
    name: String,
    #[tabled(rename = "Spin")]
    spin: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Inspecting mesh data");

    if !args.input.exists() {
        return Err(QtransportError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let pb = progress::create_spinner("Reading mesh container");
    let mesh_data = mesh::load_mesh_data(&args.input)?;
    pb.finish_and_clear();

    if mesh_data.is_empty() {
        output::print_warning("Mesh container holds no entries.");
        return Ok(());
    }

    output::print_info(&format!(
        "Loaded {} entries from '{}'",
        mesh_data.len(),
        args.input.display()
    ));

    let mut rows = Vec::new();
    for (name, entry) in &mesh_data {
        match entry {
            MeshEntry::Plain(value) => rows.push(EntryRow {
                name: name.clone(),
                spin: "-".to_string(),
                kind: value.kind().to_string(),
                detail: value_detail(value),
            }),
            MeshEntry::SpinResolved(channels) => {
                for (spin, value) in channels {
                    rows.push(EntryRow {
                        name: name.clone(),
                        spin: spin.label().to_string(),
                        kind: value.kind().to_string(),
                        detail: value_detail(value),
                    });
                }
            }
        }
    }

    let table = Table::new(&rows);
    println!("{}", table);

    if let Some(entry_name) = &args.export {
        export_entry(&mesh_data, entry_name, args.spin.map(Spin::from), &args)?;
    }

    Ok(())
}

/// 条目的简短描述
fn value_detail(value: &MeshValue) -> String {
    match value {
        MeshValue::Array(array) => {
            let dims: Vec<String> = array.shape().iter().map(|d| d.to_string()).collect();
            format!("shape ({})", dims.join(", "))
        }
        MeshValue::Structure(structure) => format!(
            "{}, {} sites, {:.2} A^3",
            structure.formula(),
            structure.num_sites(),
            structure.lattice.volume().abs()
        ),
        MeshValue::TextList(items) => format!("{} labels", items.len()),
        MeshValue::Scalar(MeshScalar::Int(x)) => x.to_string(),
        MeshValue::Scalar(MeshScalar::Float(x)) => format!("{}", x),
        MeshValue::Scalar(MeshScalar::Bool(x)) => x.to_string(),
        MeshValue::Absent => "-".to_string(),
    }
}

/// 导出一个数组条目为 CSV
fn export_entry(
    mesh_data: &mesh::MeshData,
    entry_name: &str,
    spin: Option<Spin>,
    args: &InspectArgs,
) -> Result<()> {
    let entry = mesh_data
        .get(entry_name)
        .ok_or_else(|| QtransportError::EntryNotFound(entry_name.to_string()))?;

    let value = match (entry, spin) {
        (MeshEntry::Plain(value), _) => value,
        (MeshEntry::SpinResolved(channels), Some(spin)) => channels.get(&spin).ok_or_else(|| {
            QtransportError::EntryNotFound(format!("{} ({})", entry_name, spin))
        })?,
        (MeshEntry::SpinResolved(_), None) => {
            return Err(QtransportError::InvalidArgument(format!(
                "entry '{}' is spin-resolved, select a channel with --spin",
                entry_name
            )))
        }
    };

    let array = match value {
        MeshValue::Array(array) => array,
        other => {
            return Err(QtransportError::InvalidArgument(format!(
                "entry '{}' is a {}, only arrays can be exported",
                entry_name,
                other.kind()
            )))
        }
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", entry_name)));

    export_array_csv(array, &output_path)?;
    output::print_success(&format!(
        "Entry '{}' exported to '{}'",
        entry_name,
        output_path.display()
    ));
    Ok(())
}

fn export_array_csv(array: &ArrayD<f64>, output_path: &std::path::Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    match array.ndim() {
        1 => {
            wtr.write_record(["index", "value"])?;

            let pb = progress::create_progress_bar(array.len() as u64, "Exporting");
            for (i, value) in array.iter().enumerate() {
                wtr.write_record(&[i.to_string(), format!("{:.10e}", value)])?;
                pb.inc(1);
            }
            pb.finish_and_clear();
        }
        2 => {
            wtr.write_record(["row", "col", "value"])?;

            let pb = progress::create_progress_bar(array.len() as u64, "Exporting");
            let cols = array.shape()[1];
            for (i, value) in array.iter().enumerate() {
                wtr.write_record(&[
                    (i / cols).to_string(),
                    (i % cols).to_string(),
                    format!("{:.10e}", value),
                ])?;
                pb.inc(1);
            }
            pb.finish_and_clear();
        }
        ndim => {
            return Err(QtransportError::InvalidArgument(format!(
                "cannot export a {}-dimensional array to CSV",
                ndim
            )))
        }
    }

    wtr.flush().map_err(|e| QtransportError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
