use clap::Parser;
use colored::Colorize;
use tracing::error;

use linktrio::cli::{Cli, Commands, ConfigCommands};
use linktrio::config::{StaticConfig, get_config, init_config_from};
use linktrio::errors::LinktrioError;
use linktrio::runtime::modes::{ServiceKind, run_service};
use linktrio::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => match generate_config(output_path.as_deref(), force) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", e.format_colored());
                1
            }
        },
        Commands::Serve { service } => serve(service, cli.config.as_deref()).await,
    };

    std::process::exit(code);
}

async fn serve(service: ServiceKind, config_path: Option<&str>) -> i32 {
    init_config_from(config_path);
    let config = get_config();

    // guard 需要活到服务退出，保证日志全部写出
    let _guard = match init_logging(&config.logging, service.name()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return 1;
        }
    };

    match run_service(service, &config).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{} exited with error: {:#}", service.name(), e);
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            1
        }
    }
}

fn generate_config(output_path: Option<&str>, force: bool) -> Result<(), LinktrioError> {
    let Some(path) = output_path else {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if std::path::Path::new(path).exists() && !force {
        return Err(LinktrioError::file_operation(format!(
            "{} 已存在，使用 --force 覆盖",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| LinktrioError::file_operation(format!("写入 {} 失败: {}", path, e)))?;

    println!("{} {}", "Sample configuration written to".green(), path);
    Ok(())
}
