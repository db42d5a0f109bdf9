use std::process::ExitCode;

use sqldesk_lib::config::GatewayConfig;
use sqldesk_lib::observability;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sqldesk: {}", e);
            return ExitCode::FAILURE;
        }
    };

    observability::init_tracing(&config.log_dir);

    match sqldesk_lib::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
