// src/main.rs

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use hoteldb::application::{respond, shell, AppState, Command, ErrorResponse, OutputFormat, Reply};
use hoteldb::application::view::render_error;
use hoteldb::config::{DatabaseConfig, Overrides};
use hoteldb::db::{create_connection_pool, initialize_database, verify_database_integrity, with_connection};
use hoteldb::services::HotelService;

/// Hotel database shell
#[derive(Parser, Debug)]
#[command(name = "hoteldb", version, about)]
struct Cli {
    /// SQLite file path or `:memory:` (overrides HOTELDB_DATABASE)
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Connection pool size (overrides HOTELDB_POOL_SIZE)
    #[arg(long, value_name = "N")]
    pool_size: Option<u32>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Run a single command instead of the interactive shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 1. CONFIGURATION
    let config = DatabaseConfig::from_env(&Overrides {
        database: cli.database.clone(),
        pool_size: cli.pool_size,
    })
    .context("invalid configuration")?;
    log::info!("Using database {} (pool size {})", config.location, config.pool_size);

    // 2. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool(&config).context("failed to open database")?);

    // Initialize schema (idempotent)
    with_connection(&pool, |conn| {
        initialize_database(conn)?;
        verify_database_integrity(conn)
    })
    .context("failed to prepare database schema")?;

    // 3. SERVICES
    let hotel_service = Arc::new(HotelService::new(pool));

    // 4. APPLICATION STATE
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let state = AppState::new(hotel_service, format);

    // 5. ONE-SHOT COMMAND OR SHELL
    if !cli.command.is_empty() {
        return Ok(run_once(&state, &cli.command));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell::run(&state, stdin.lock(), &mut stdout).context("shell I/O failed")?;

    Ok(ExitCode::SUCCESS)
}

fn run_once(state: &AppState, args: &[String]) -> ExitCode {
    let command = match Command::from_args(args) {
        Ok(Some(command)) => command,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&ErrorResponse::from_app_error(e), state.format));
            return ExitCode::from(2);
        }
    };

    match respond(state, &command) {
        Reply::Output(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Reply::Failed(text) => {
            eprintln!("{}", text);
            ExitCode::FAILURE
        }
        Reply::Quit => ExitCode::SUCCESS,
    }
}
