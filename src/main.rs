use std::env;
use std::process::ExitCode;

use clap::Parser;
use config::Config;
use dotenvy::dotenv;

use pushkind_leads::cli::{Cli, execute};
use pushkind_leads::models::config::ClientConfig;
use pushkind_leads::repository::{FileSessionStore, HttpRepository};
use pushkind_leads::services::dashboard::Dashboard;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let repo = match HttpRepository::new(&client_config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Failed to build HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let sessions = FileSessionStore::new(&client_config.session_file);

    let mut dashboard = Dashboard::new(repo, sessions, &client_config);
    let mut stdout = std::io::stdout().lock();

    if let Err(err) = execute(&mut dashboard, cli.command, &client_config, &mut stdout).await {
        log::error!("Failed to write output: {err}");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for notice in dashboard.take_notices() {
        failed |= notice.is_error();
        eprintln!("{notice}");
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
