//! Afritheatre CLI - Operator access to the Afritheatre API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (token is kept in AFRITHEATRE_TOKEN_FILE or ~/.config/afritheatre/token)
//! afritheatre login -e admin@example.com -p secret
//!
//! # Check the persisted token
//! afritheatre whoami
//!
//! # Listings
//! afritheatre venues --search nairobi
//! afritheatre activities --sort date --desc
//! afritheatre users --search example.com
//!
//! # Forget the token
//! afritheatre logout
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - Afritheatre API host (default `http://localhost:5000`)
//! - `API_TIMEOUT_SECS` - Request timeout (default 10)
//! - `AFRITHEATRE_TOKEN_FILE` - Token file location

#![cfg_attr(not(test), forbid(unsafe_code))]

use afritheatre_site::api::ApiClient;
use afritheatre_site::config::ApiConfig;
use clap::{Args, Parser, Subcommand};

mod commands;
mod token_file;

use commands::listings::ListOptions;
use commands::{CliError, CliSession};
use token_file::FileTokenStore;

#[derive(Parser)]
#[command(name = "afritheatre")]
#[command(author, version, about = "Afritheatre Collective CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "AFRITHEATRE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Contact phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Password (at least 6 characters)
        #[arg(short, long, env = "AFRITHEATRE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted token
    Logout,
    /// Show who the persisted token belongs to
    Whoami,
    /// List venues
    Venues(ListArgs),
    /// List theatre activities (admin)
    Activities(ListArgs),
    /// List user accounts (admin)
    Users(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive substring filter
    #[arg(short, long)]
    search: Option<String>,

    /// Column to sort by (API field name, e.g. `name`, `createdAt`)
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Page of 100 rows
    #[arg(long, default_value_t = 1)]
    page: usize,
}

impl From<ListArgs> for ListOptions {
    fn from(args: ListArgs) -> Self {
        Self {
            search: args.search,
            sort: args.sort,
            descending: args.desc,
            page: args.page,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Plain output: commands report through tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "afritheatre_cli=info,afritheatre_site=warn".into()),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn session() -> Result<CliSession, CliError> {
    let api = ApiClient::new(&ApiConfig::from_env()?)?;
    let store = FileTokenStore::from_env().ok_or(CliError::NoTokenFile)?;
    Ok(CliSession::new(store, api))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut session = session()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut session, &email, &password).await?;
        }
        Commands::Register {
            name,
            email,
            phone,
            password,
        } => commands::auth::register(&session, &name, &email, &phone, &password).await?,
        Commands::Logout => commands::auth::logout(&mut session).await,
        Commands::Whoami => commands::auth::whoami(&mut session).await?,
        Commands::Venues(args) => commands::listings::venues(&mut session, &args.into()).await?,
        Commands::Activities(args) => {
            commands::listings::activities(&mut session, &args.into()).await?;
        }
        Commands::Users(args) => commands::listings::users(&mut session, &args.into()).await?,
    }
    Ok(())
}
