//! # validate 命令实现
//!
//! 加载输运设置文件，对默认模式验证并归一化，
//! 打印摘要表格，可选把归一化结果写回文件。
//!
//! ## 依赖关系
//! - 使用 `cli/validate.rs` 定义的参数
//! - 使用 `settings/`
//! - 使用 `utils/output.rs`

use crate::cli::validate::ValidateArgs;
use crate::error::{QtransportError, Result};
use crate::settings::{self, DeformationPotential, Settings, SettingsSchema};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 摘要表格行
#[derive(Debug, Clone, Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行 validate 命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    output::print_header("Validating transport settings");

    if !args.input.exists() {
        return Err(QtransportError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    output::print_info(&format!("Loading settings from: {}", args.input.display()));

    // 模式在启动时构建一次，之后只读
    let schema = SettingsSchema::transport_defaults();
    let validated = settings::load_settings_from_file(&args.input, &schema)?;

    if validated.doping.is_empty() {
        output::print_warning("No doping concentrations specified.");
    }
    if validated.temperatures.is_empty() {
        output::print_warning("No temperatures specified.");
    }

    let table = Table::new(summary_rows(&validated));
    println!("{}", table);

    if let Some(output_path) = &args.output {
        settings::write_settings_to_file(&validated, output_path)?;
        output::print_success(&format!(
            "Normalized settings written to '{}'",
            output_path.display()
        ));
    }

    output::print_done(&format!(
        "Settings are valid ({} recognized keys)",
        schema.len()
    ));
    Ok(())
}

/// 生成摘要行
fn summary_rows(settings: &Settings) -> Vec<SettingRow> {
    let mut rows = Vec::new();

    rows.push(SettingRow {
        name: "doping".to_string(),
        value: format_grid(&settings.doping, "cm^-3"),
    });
    rows.push(SettingRow {
        name: "temperatures".to_string(),
        value: format_grid(&settings.temperatures, "K"),
    });
    rows.push(SettingRow {
        name: "deformation_potential".to_string(),
        value: format_deformation_potential(settings.deformation_potential.as_ref()),
    });
    rows.push(SettingRow {
        name: "static_dielectric".to_string(),
        value: format_presence(settings.static_dielectric.is_some(), "(3, 3) tensor"),
    });
    rows.push(SettingRow {
        name: "high_frequency_dielectric".to_string(),
        value: format_presence(settings.high_frequency_dielectric.is_some(), "(3, 3) tensor"),
    });
    rows.push(SettingRow {
        name: "elastic_constant".to_string(),
        value: format_presence(settings.elastic_constant.is_some(), "(3, 3, 3, 3) tensor"),
    });
    rows.push(SettingRow {
        name: "pop_frequency".to_string(),
        value: settings
            .pop_frequency
            .map(|f| format!("{} THz", f))
            .unwrap_or_else(|| "-".to_string()),
    });
    rows.push(SettingRow {
        name: "scattering_type".to_string(),
        value: settings.scattering_type.clone(),
    });
    rows.push(SettingRow {
        name: "interpolation_factor".to_string(),
        value: settings.interpolation_factor.to_string(),
    });
    rows.push(SettingRow {
        name: "calculate_mobility".to_string(),
        value: settings.calculate_mobility.to_string(),
    });
    rows.push(SettingRow {
        name: "write_mesh".to_string(),
        value: settings.write_mesh.to_string(),
    });

    rows
}

fn format_grid(points: &[f64], unit: &str) -> String {
    match points {
        [] => "empty".to_string(),
        [single] => format!("1 point ({:.6e} {})", single, unit),
        _ => format!(
            "{} points ({:.6e} .. {:.6e} {})",
            points.len(),
            points[0],
            points[points.len() - 1],
            unit
        ),
    }
}

fn format_deformation_potential(dp: Option<&DeformationPotential>) -> String {
    match dp {
        None => "-".to_string(),
        Some(DeformationPotential::Single(x)) => format!("{} eV", x),
        Some(DeformationPotential::Pair(c, v)) => {
            format!("{} eV (conduction) / {} eV (valence)", c, v)
        }
        Some(DeformationPotential::File(path)) => format!("file: {}", path),
    }
}

fn format_presence(present: bool, description: &str) -> String {
    if present {
        description.to_string()
    } else {
        "-".to_string()
    }
}
