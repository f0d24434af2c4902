use std::process::ExitCode;

use dexrobot_pda::config::ServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dexrobot_pda::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match dexrobot_pda::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
