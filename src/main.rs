//! # Qtransport - 载流子输运模拟工具箱
//!
//! 输运模拟工具的配置归一化与网格数据序列化层：
//! 把松散类型的设置映射验证成类型化配置对象，
//! 把网格数据集持久化为自描述二进制容器。
//!
//! ## 子命令
//! - `validate` - 验证并归一化输运设置文件
//! - `inspect`  - 查看网格数据容器，可选导出数组条目
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── settings/  (设置验证与归一化)
//!   │     ├── mesh/      (网格容器编解码)
//!   │     └── models/    (晶体结构数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod mesh;
mod models;
mod settings;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
