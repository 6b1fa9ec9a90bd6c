mod api;
mod config;
mod file_picker;
mod form;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let mut config = config::load_or_create_config(args.config_path.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.api.endpoint = endpoint;
    }

    logging::init(&config.general.log_file, &config.general.log_level)?;
    tracing::info!(endpoint = %config.api.endpoint, "starting mailtriage");

    tui::run_tui(config).await
}

struct Args {
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: None,
        endpoint: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = iter.next() else {
                    bail!("--config requires a path");
                };
                args.config_path = Some(PathBuf::from(path));
            }
            "--endpoint" => {
                let Some(url) = iter.next() else {
                    bail!("--endpoint requires a URL");
                };
                args.endpoint = Some(url);
            }
            "--help" | "-h" => {
                println!("Usage: mailtriage [--config <path>] [--endpoint <url>]");
                println!();
                println!("  --config <path>    Config file (default: ~/.mailtriage/config.toml)");
                println!("  --endpoint <url>   Analysis endpoint, overrides the config file");
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(args)
}
