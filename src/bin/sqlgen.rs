//! sqlgen CLI
//!
//! Serve the question page, or ask/query from the terminal.

use clap::{Parser, Subcommand};
use sqlgen::config::{Config, DEFAULT_API_BASE, DEFAULT_BIND, DEFAULT_DB_PATH, DEFAULT_MODEL};
use sqlgen::query::{init_student_db, QueryExecutor};
use sqlgen::server::{self, AppState};
use sqlgen::{Assistant, ErrorKind, Fetch, GeminiClient, MissingCredential, SqlGenerator};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ask a student database questions in plain English
#[derive(Parser)]
#[command(name = "sqlgen")]
#[command(about = "Convert English questions to SQL with Gemini and run them on a local SQLite database", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "SQLGEN_DB_PATH", default_value = DEFAULT_DB_PATH, global = true)]
    db_path: PathBuf,

    /// Gemini model identifier
    #[arg(long, env = "SQLGEN_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Generative Language API root
    #[arg(long, env = "SQLGEN_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    api_base: String,

    /// Timeout for the model call in seconds (none if unset)
    #[arg(long, env = "SQLGEN_REQUEST_TIMEOUT_SECS", global = true)]
    request_timeout_secs: Option<u64>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the question page
    Serve {
        /// Address to bind
        #[arg(long, env = "SQLGEN_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },

    /// Ask one question and print the SQL and results
    Ask {
        /// Question in natural language
        question: String,
    },

    /// Run a SQL statement directly
    Query {
        /// SQL statement
        sql: String,
    },

    /// Create the STUDENT table with sample rows
    Init {
        /// Recreate the table if it already exists
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    fn config(&self, bind: Option<SocketAddr>) -> sqlgen::Result<Config> {
        let mut config = Config {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            db_path: self.db_path.clone(),
            api_base: self.api_base.clone(),
            request_timeout_secs: self.request_timeout_secs,
            ..Config::default()
        };
        if let Some(bind) = bind {
            config.bind = bind;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap's env fallbacks see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter)
        .init();

    match &cli.command {
        Commands::Serve { bind } => {
            let config = cli.config(Some(*bind))?;
            cmd_serve(&config).await?;
        }
        Commands::Ask { question } => {
            let config = cli.config(None)?;
            cmd_ask(&config, question).await?;
        }
        Commands::Query { sql } => {
            cmd_query(&cli.db_path, sql).await?;
        }
        Commands::Init { force } => {
            cmd_init(&cli.db_path, *force)?;
        }
    }

    Ok(())
}

/// Build the generator, falling back to one that reports the missing key.
fn generator_for_serving(config: &Config) -> anyhow::Result<Arc<dyn SqlGenerator>> {
    match GeminiClient::from_config(config) {
        Ok(client) => {
            info!(model = client.model(), "Using Gemini");
            Ok(Arc::new(client))
        }
        Err(e) if e.kind() == ErrorKind::CredentialMissing => {
            warn!(error = %e, "No API key configured; submissions will fail until one is set");
            Ok(Arc::new(MissingCredential::new(e.to_string())))
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_serve(config: &Config) -> anyhow::Result<()> {
    if !config.db_path.exists() {
        warn!(
            path = %config.db_path.display(),
            "Database file not found; run `sqlgen init` to create it"
        );
    }

    let generator = generator_for_serving(config)?;
    let assistant = Assistant::new(generator, QueryExecutor::new(&config.db_path));

    println!("Serving on http://{}", config.bind);
    server::serve(config.bind, AppState::new(assistant)).await?;
    Ok(())
}

async fn cmd_ask(config: &Config, question: &str) -> anyhow::Result<()> {
    let generator: Arc<dyn SqlGenerator> = Arc::new(GeminiClient::from_config(config)?);
    let assistant = Assistant::new(generator, QueryExecutor::new(&config.db_path));

    let answer = match assistant.ask(question).await {
        Ok(answer) => answer,
        Err(e) => anyhow::bail!("An error occurred: {}", e),
    };

    println!("Generated SQL Query:");
    println!("{}", answer.sql);
    println!();
    print_fetch(&answer.fetch);
    Ok(())
}

async fn cmd_query(db_path: &Path, sql: &str) -> anyhow::Result<()> {
    let executor = QueryExecutor::new(db_path);
    let sql = sql.to_string();
    let fetch = tokio::task::spawn_blocking(move || executor.read_sql_query(&sql)).await?;
    print_fetch(&fetch);
    Ok(())
}

fn cmd_init(db_path: &Path, force: bool) -> anyhow::Result<()> {
    println!("Initializing database at: {}", db_path.display());

    let rows = init_student_db(db_path, force)?;

    println!("✓ STUDENT table created");
    println!("  Path: {}", db_path.display());
    println!("  Rows: {}", rows);
    Ok(())
}

fn print_fetch(fetch: &Fetch) {
    if let Some(error) = &fetch.error {
        println!("An error occurred: {}", error);
    }

    if fetch.is_empty() {
        println!("No results found or an error occurred.");
    } else {
        println!("Query Results:");
        print!("{}", fetch.result.to_text_table());
        println!("({} rows)", fetch.result.row_count());
    }
}
