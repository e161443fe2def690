//! Terminal front-end for the farm verification admin portal.
//!
//! Each invocation mounts the view a command targets, runs the action through
//! the shared `portal` controllers, renders the resulting state, and exits
//! non-zero when the action recorded an error. The session lives in a JSON
//! credentials file so `login` in one invocation authorizes the next.

mod file_store;
mod http;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use file_store::FileStore;
use http::ReqwestTransport;
use portal::views::{ActionKey, ApplicationsState, ApplicationsView, CategoriesState, CategoriesView};
use portal::{ApiClient, ApiError, Cancelled, ConfigError, LoginForm, NewCategory, PortalConfig, Route};
use serde_json::Value;

type Client = ApiClient<ReqwestTransport>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("login failed: {0}")]
    Login(String),
    #[error("{0}")]
    Action(String),
    #[error("page not found: {0}")]
    NotFound(String),
    #[error("view closed before the request finished")]
    Cancelled(#[from] Cancelled),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "portal-cli", about = "Farm verification admin portal CLI")]
struct Cli {
    /// API origin; overrides `PORTAL_BASE_URL`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true, env = "PORTAL_CREDENTIALS_PATH")]
    credentials: Option<PathBuf>,

    #[arg(long, global = true, env = "PORTAL_LOG", default_value = "warn")]
    log_level: tracing::Level,

    /// Print records as JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in as an administrator and show the dashboard.
    Login {
        #[arg(long, env = "PORTAL_EMAIL")]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session.
    Logout,
    /// Render the view routed at PATH (`/`, `/dashboard`, `/categories`).
    Open { path: String },
    Applications(ApplicationsCommand),
    Categories(CategoriesCommand),
}

#[derive(Args, Debug)]
struct ApplicationsCommand {
    #[command(subcommand)]
    command: ApplicationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApplicationsSubcommand {
    List,
    Approve {
        id: u64,
    },
    Reject {
        id: u64,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Args, Debug)]
struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesSubcommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, ".env file ignored");
        }
    }

    let mut config = PortalConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    let path = cli
        .credentials
        .unwrap_or_else(|| file_store::resolve_path(|key| std::env::var(key).ok()));
    tracing::debug!(base_url = %config.base_url, messages = %config.messages, credentials = %path.display(), "configured");

    let transport = ReqwestTransport::new(config.timeouts)?;
    let client = ApiClient::new(&config, transport, Arc::new(FileStore::new(path)));
    let out = Output { json: cli.json };

    match cli.command {
        Command::Login { email, password } => run_login(&client, email, password, out).await,
        Command::Logout => {
            client.logout()?;
            eprintln!("Logged out.");
            Ok(())
        }
        Command::Open { path } => open(&client, &path, out).await,
        Command::Applications(command) => run_applications(&client, command, out).await,
        Command::Categories(command) => run_categories(&client, command, out).await,
    }
}

async fn run_login(client: &Client, email: String, password: String, out: Output) -> Result<(), CliError> {
    let mut form = LoginForm::new(email, password);
    match form.submit(client).await {
        Some(route) => {
            eprintln!("Logged in.");
            open(client, route.path(), out).await
        }
        None => Err(CliError::Login(form.message().unwrap_or("login did not complete").to_owned())),
    }
}

async fn open(client: &Client, path: &str, out: Output) -> Result<(), CliError> {
    match Route::from_path(path) {
        Route::Login => {
            print!("{}", render::login_prompt());
            Ok(())
        }
        Route::Dashboard => {
            let mut view = ApplicationsView::new(client.clone());
            view.mount().await?;
            emit_applications(view.state(), out)?;
            check(view.state().collection.errors().get(ActionKey::Load))
        }
        Route::Categories => {
            let mut view = CategoriesView::new(client.clone());
            view.mount().await?;
            emit_categories(view.state(), out)?;
            check(view.state().collection.errors().get(ActionKey::Load))
        }
        Route::NotFound => {
            print!("{}", render::not_found(path));
            Err(CliError::NotFound(path.to_owned()))
        }
    }
}

async fn run_applications(client: &Client, command: ApplicationsCommand, out: Output) -> Result<(), CliError> {
    let mut view = ApplicationsView::new(client.clone());
    view.mount().await?;
    if let Some(message) = view.state().collection.load_error() {
        return Err(CliError::Action(message.to_owned()));
    }

    let key = match command.command {
        ApplicationsSubcommand::List => ActionKey::Load,
        ApplicationsSubcommand::Approve { id } => {
            view.approve(id).await?;
            ActionKey::Approve(id)
        }
        ApplicationsSubcommand::Reject { id, reason } => {
            let state = view.state_mut();
            state.open_rejection(id);
            state.set_reason(id, reason);
            view.reject(id).await?;
            ActionKey::Reject(id)
        }
    };

    emit_applications(view.state(), out)?;
    check(view.state().collection.errors().get(key))
}

async fn run_categories(client: &Client, command: CategoriesCommand, out: Output) -> Result<(), CliError> {
    let mut view = CategoriesView::new(client.clone());
    view.mount().await?;
    if let Some(message) = view.state().collection.load_error() {
        return Err(CliError::Action(message.to_owned()));
    }

    let key = match command.command {
        CategoriesSubcommand::List => ActionKey::Load,
        CategoriesSubcommand::Add { name, description } => {
            view.state_mut().draft = NewCategory { name, description };
            view.add().await?;
            ActionKey::Add
        }
        CategoriesSubcommand::Delete { id } => {
            view.delete(id).await?;
            ActionKey::Delete(id)
        }
    };

    emit_categories(view.state(), out)?;
    check(view.state().collection.errors().get(key))
}

fn emit_applications(state: &ApplicationsState, out: Output) -> Result<(), CliError> {
    if out.json {
        return print_json(&serde_json::to_value(state.items())?);
    }
    print!("{}", render::applications(state));
    Ok(())
}

fn emit_categories(state: &CategoriesState, out: Output) -> Result<(), CliError> {
    if out.json {
        return print_json(&serde_json::to_value(state.items())?);
    }
    print!("{}", render::categories(state));
    Ok(())
}

/// Turn the error recorded for the command's action into the exit status.
fn check(recorded: Option<&str>) -> Result<(), CliError> {
    match recorded {
        Some(message) => Err(CliError::Action(message.to_owned())),
        None => Ok(()),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
