use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use petfriendly_api::config::{self, AppConfig};
use petfriendly_api::database::DatabaseManager;
use petfriendly_api::services::seed;
use petfriendly_api::state::AppState;

#[derive(Parser)]
#[command(name = "petfriendly-api")]
#[command(about = "PetFriendly adoption platform REST API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to bind, overrides API_PORT/PORT")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Create the demo accounts if missing and exit")]
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the config singleton reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = config::config().clone();
    init_tracing(&config);

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.api.port = port;
            }
            serve(config).await
        }
        Command::Migrate => {
            let pool = DatabaseManager::connect_lazy(&config.database)?;
            DatabaseManager::migrate(&pool).await?;
            Ok(())
        }
        Command::Seed => {
            let pool = DatabaseManager::connect_lazy(&config.database)?;
            let state = AppState::new(config, pool)?;
            let created = seed::seed_demo_accounts(state.users()).await?;
            info!(created, "Demo accounts seeded");
            Ok(())
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("petfriendly_api=info,tower_http=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        environment = config.environment.as_str(),
        "Starting PetFriendly API"
    );

    let pool = DatabaseManager::connect_lazy(&config.database)?;

    // A database that is down at boot is reported by /actuator/health; the
    // server still starts.
    if config.database.run_migrations {
        if let Err(e) = DatabaseManager::migrate(&pool).await {
            warn!(error = %e, "Skipping migrations, database not ready");
        }
    }

    let port = config.api.port;
    let seed_demo = config.seed.demo_accounts;
    let state = AppState::new(config, pool)?;

    if seed_demo {
        match seed::seed_demo_accounts(state.users()).await {
            Ok(created) => info!(created, "Demo accounts ensured"),
            Err(e) => warn!(error = %e, "Skipping demo accounts"),
        }
    }

    let app = petfriendly_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("PetFriendly API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
