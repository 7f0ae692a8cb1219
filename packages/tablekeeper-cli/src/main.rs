//! Tablekeeper CLI - restaurant management from the terminal
//!
//! This binary provides:
//! - Login/logout against the restaurant API
//! - List, inspect, create, update and delete customers, restaurants,
//!   tables and reservations
//! - The same login gate as the web front end: every screen except
//!   `/login` needs a stored credential

mod console;
mod records;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::ConsoleNotifier;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tablekeeper_core::api::{self, ApiClient, ApiError};
use tablekeeper_core::{session, Entity, Router, Session};

#[derive(Parser)]
#[command(name = "tablekeeper")]
#[command(author = "Tablekeeper Team")]
#[command(version)]
#[command(about = "Manage customers, restaurants, tables and reservations")]
#[command(long_about = "
Tablekeeper is a command line client for the restaurant management API.
Every command except 'login' and 'config' needs a stored session.

Quick start:
  1. Sign in:             tablekeeper login --username admin
  2. List customers:      tablekeeper customers list
  3. Book a table:        tablekeeper reservations create --data @booking.json

Point it at your backend with TABLEKEEPER_API_URL or the config file
(see: tablekeeper config).
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session credential
    Login {
        #[arg(short, long)]
        username: String,

        /// Password (prompted on stdin when omitted)
        #[arg(short, long, env = "TABLEKEEPER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session credential
    Logout,

    /// Show session status and record counts
    Status,

    /// Show configuration paths and settings
    Config,

    /// Navigate to a screen path and report where you land
    Open {
        /// Route path, e.g. /customers
        path: String,
    },

    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: records::RecordAction,
    },

    /// Manage restaurants
    Restaurants {
        #[command(subcommand)]
        action: records::RecordAction,
    },

    /// Manage tables
    Tables {
        #[command(subcommand)]
        action: records::RecordAction,
    },

    /// Manage reservations
    Reservations {
        #[command(subcommand)]
        action: records::RecordAction,
    },
}

/// Everything a command needs, wired once per invocation.
pub struct App {
    pub format: OutputFormat,
    pub session: Session,
    pub router: Arc<Router>,
    pub client: ApiClient,
}

impl App {
    fn build(format: OutputFormat) -> Result<Self> {
        let session = session::open_default_session().context("Failed to open session storage")?;
        let router = Arc::new(Router::new(session.clone()));
        let config = api::load_api_config();

        let client = ApiClient::new(&config, session.clone(), router.clone())?
            .with_notifier(Arc::new(ConsoleNotifier::new(format)));

        Ok(Self {
            format,
            session,
            router,
            client,
        })
    }

    /// Report a failed API call and stop. The notifier has already shown the
    /// message in text mode.
    pub fn fail(&self, error: ApiError) -> ! {
        match self.format {
            OutputFormat::Text => {
                if error.is_unauthorized() {
                    eprintln!("Run 'tablekeeper login' to sign in again.");
                }
            }
            OutputFormat::Json => {
                println!("{}", console::error_json(&error, self.router.current()));
            }
        }
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tablekeeper_cli={},tablekeeper_core={}", log_level, log_level).into()
            }),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Config only reports settings and must work without session storage
    if let Commands::Config = cli.command {
        return cmd_config(cli.format);
    }

    let app = App::build(cli.format)?;

    match cli.command {
        Commands::Login { username, password } => cmd_login(&app, &username, password).await,
        Commands::Logout => cmd_logout(&app),
        Commands::Status => cmd_status(&app).await,
        Commands::Config => cmd_config(app.format),
        Commands::Open { path } => cmd_open(&app, &path),
        Commands::Customers { action } => records::run(&app, Entity::Customers, action).await,
        Commands::Restaurants { action } => records::run(&app, Entity::Restaurants, action).await,
        Commands::Tables { action } => records::run(&app, Entity::Tables, action).await,
        Commands::Reservations { action } => {
            records::run(&app, Entity::Reservations, action).await
        }
    }
}

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush().ok();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn cmd_login(app: &App, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    if let Err(e) = app.client.login(username, &password).await {
        app.fail(e);
    }

    match app.format {
        OutputFormat::Text => {
            println!("Signed in as {}", username);
            println!("Landing screen: {}", app.router.current());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "authenticated",
                    "username": username,
                    "route": app.router.current(),
                })
            );
        }
    }
    Ok(())
}

fn cmd_logout(app: &App) -> Result<()> {
    let was_authenticated = app.session.is_authenticated();
    app.client.logout();

    match app.format {
        OutputFormat::Text => {
            if was_authenticated {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": if was_authenticated { "signed_out" } else { "not_signed_in" },
                    "route": app.router.current(),
                })
            );
        }
    }
    Ok(())
}

async fn cmd_status(app: &App) -> Result<()> {
    // A rejected session is cleared by the client, so read the state after
    let counts = if app.session.is_authenticated() {
        Some(app.client.collection_counts().await)
    } else {
        None
    };

    match app.format {
        OutputFormat::Text => {
            println!("Session: {}", app.session.state());
            println!("API:     {}", app.client.base_url());
            println!("Storage: {}", app.session.storage_info());
            match &counts {
                Some(Ok(c)) => {
                    println!();
                    println!("Customers:    {}", c.customers);
                    println!("Restaurants:  {}", c.restaurants);
                    println!("Tables:       {}", c.tables);
                    println!("Reservations: {}", c.reservations);
                }
                Some(Err(e)) if e.is_unauthorized() => {
                    println!();
                    println!("The server rejected the stored session; it has been cleared.");
                    println!("Run 'tablekeeper login' to sign in again.");
                }
                Some(Err(_)) => {}
                None => {
                    println!();
                    println!("Run 'tablekeeper login' to sign in.");
                }
            }
        }
        OutputFormat::Json => {
            let (counts_json, error_json) = match &counts {
                Some(Ok(c)) => (serde_json::to_value(c)?, serde_json::Value::Null),
                Some(Err(e)) => (serde_json::Value::Null, serde_json::json!(e.user_message())),
                None => (serde_json::Value::Null, serde_json::Value::Null),
            };
            println!(
                "{}",
                serde_json::json!({
                    "session": app.session.state(),
                    "api_url": app.client.base_url(),
                    "storage_info": app.session.storage_info(),
                    "counts": counts_json,
                    "error": error_json,
                })
            );
        }
    }
    Ok(())
}

fn cmd_open(app: &App, path: &str) -> Result<()> {
    let outcome = app.router.push(path)?;

    match app.format {
        OutputFormat::Text => {
            if outcome.redirected_to_login {
                println!(
                    "{} requires a session; redirected to {}",
                    outcome.requested, outcome.landed
                );
            } else {
                println!("Now on {}", outcome.landed);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&outcome)?);
        }
    }
    Ok(())
}

/// Where credentials live, or why they cannot be stored.
fn describe_storage(session: Result<Session, session::StoreError>) -> String {
    match session {
        Ok(session) => session.storage_info(),
        Err(e) => format!("unavailable ({})", e),
    }
}

fn cmd_config(format: OutputFormat) -> Result<()> {
    let api_config = api::load_api_config();
    let config_path = api::config::get_config_file_path_string();
    let storage = describe_storage(session::open_default_session());

    match format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:      {}", config_path);
            println!("API endpoint:     {} (from {})", api_config.api_url, api_config.source);
            println!("Request timeout:  {} ms", api_config.timeout.as_millis());
            println!("Credential store: {}", storage);
            println!();
            println!("Environment variables:");
            println!("  {} - Override API endpoint", api::config::ENV_API_URL);
            println!("  {} - Override request timeout (ms)", api::config::ENV_TIMEOUT_MS);
            println!("  TABLEKEEPER_PASSWORD - Password for 'login'");
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", api::config::generate_example_config());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": config_path,
                    "api_url": api_config.api_url,
                    "api_source": api_config.source.to_string(),
                    "timeout_ms": api_config.timeout.as_millis() as u64,
                    "credential_storage": storage,
                })
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekeeper_core::session::{MemoryCredentialStore, StoreError};

    #[test]
    fn test_describe_storage_without_config_dir() {
        assert_eq!(
            describe_storage(Err(StoreError::NoConfigDir)),
            "unavailable (No configuration directory available)"
        );
    }

    #[test]
    fn test_describe_storage_for_open_session() {
        let session = Session::from_store(MemoryCredentialStore::new());
        assert_eq!(describe_storage(Ok(session.clone())), session.storage_info());
    }
}
