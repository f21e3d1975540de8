mod config;
mod graphql;
mod http;
mod pages;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{DbEmployeeStore, EmployeeService, InMemoryEmployeeStore, seed_demo};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "employee-server", version, about = "Employee directory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the demo employees into an empty database.
    Seed,
    /// Print the GraphQL schema.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path (stdout when omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
    #[arg(long, help = "Apply pending migrations before serving")]
    migrate: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, Arc::new(AppConfig::load()?)).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
        },
        Command::Seed => run_seed().await,
        Command::SchemaPrint { output } => schema_print(output),
    }
}

fn employee_service(pool: &DbPool) -> EmployeeService {
    EmployeeService::new(Arc::new(DbEmployeeStore::new(pool.clone())))
}

async fn run_seed() -> Result<()> {
    let pool = setup_pool().await?;
    ensure_migrations(&pool, false).await?;
    let created = seed_demo(&employee_service(&pool)).await?;
    info!(created, "seed finished");
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let service = EmployeeService::new(Arc::new(InMemoryEmployeeStore::new()));
    let sdl = graphql::build_schema(service).sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema written");
        }
        None => print!("{sdl}"),
    }
    Ok(())
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env();
    connect(&settings).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool().await?;
    if cmd.migrate {
        Migrator::up(&pool, None).await?;
        info!("database migrations applied");
    }
    ensure_migrations(&pool, cmd.allow_dirty).await?;

    let service = employee_service(&pool);
    if config.seed_on_start {
        let created = seed_demo(&service).await?;
        info!(created, "startup seed finished");
    }

    let state = AppState {
        pool,
        schema: graphql::build_schema(service.clone()),
        service,
        config,
    };
    http::serve(ServeConfig::from(&cmd), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `employee-server migrate up`, pass --migrate, or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
