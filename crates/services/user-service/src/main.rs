//! User Service - HTTP server for user management.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use user_service_lib::{MigrateAction, ServeOptions};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User registration and lookup service")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides SERVER_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides SERVER_PORT
        #[arg(long)]
        port: Option<u16>,
        /// Keep users in memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            user_service_lib::run_server(ServeOptions {
                host,
                port,
                in_memory,
            })
            .await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_service_lib::run_migrations(migrate_action).await?;
        }
    }

    Ok(())
}
