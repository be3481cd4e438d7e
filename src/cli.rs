//! 命令行参数

use clap::{Parser, Subcommand};

use crate::runtime::modes::ServiceKind;

#[derive(Parser)]
#[command(name = "linktrio")]
#[command(version)]
#[command(about = "Three-service URL shortener: redirect, analytics and metadata", long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认 config.toml）
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run one of the services
    Serve {
        #[arg(value_enum)]
        service: ServiceKind,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (prints to stdout when omitted)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
