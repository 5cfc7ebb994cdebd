use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod classifier;
pub mod config;
pub mod error;
pub mod executor;
pub mod probe;
pub mod report;
pub mod session;
#[cfg(test)]
mod test_support;

use config::app_config::{load_config, setup_http_client, setup_resolver};
use config::cli::Args;
use probe::ProbeContext;
use report::{SessionInfo, log_file::LogFile};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn wait_for_key() {
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let app_config = match load_config(Args::parse()) {
        Ok(app_config) => app_config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let context = match setup_http_client(&app_config.settings).and_then(|http| {
        Ok(ProbeContext {
            http,
            resolver: setup_resolver(&app_config.dns_hosts)?,
        })
    }) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let info = SessionInfo::now(app_config.settings.version.clone());
    let log_file = match LogFile::create(&app_config.log_dir, &info) {
        Ok(log_file) => log_file,
        Err(e) => {
            println!("Cannot create or open log file for writing.");
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let report = session::run(&app_config.settings, context).await;

    if let Err(e) = log_file.write_report(&report) {
        println!("Cannot create or open log file for writing.");
        println!("{e}");
        return ExitCode::FAILURE;
    }

    let path = log_file.path();
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    println!("Test results have been written {}.", path.display());

    if app_config.wait_for_key {
        wait_for_key();
    }

    ExitCode::SUCCESS
}
