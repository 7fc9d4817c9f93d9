mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatgrid::config::Config;

#[derive(Parser)]
#[command(name = "chatgrid")]
#[command(about = "Ask several AI models at once and compare their answers", long_about = None)]
struct Cli {
    /// Backend base URL (overrides CHATGRID_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for session and conversation files (overrides CHATGRID_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "CHATGRID_PASSWORD")]
        password: String,
    },
    /// Create an account
    Signup {
        email: String,
        #[arg(long, env = "CHATGRID_PASSWORD")]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Finish an OAuth sign-in with the token from the redirect
    OauthCallback { token: String },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Re-read the profile from the server
        #[arg(long)]
        refresh: bool,
    },
    /// Unlock the Expert tier
    Upgrade,

    /// List available models and the current selection
    Models,
    /// Replace the model selection (`all-models` selects every eligible model)
    Select {
        #[arg(required = true)]
        models: Vec<String>,
    },
    /// Add or remove one model from the selection
    Toggle { model: String },

    /// Send a prompt to every selected model
    Send {
        #[arg(required = true)]
        message: Vec<String>,
        /// Ask for expert-depth answers (Expert tier)
        #[arg(long)]
        expert: bool,
    },
    /// Start a new conversation
    New {
        /// Primary model (defaults to the first selected model)
        #[arg(long)]
        model: Option<String>,
    },
    /// Make a stored conversation the active one
    Use { id: String },
    /// List stored conversations, most recent first
    History,
    /// Print a conversation (the active one by default)
    Show { id: Option<String> },
    /// Delete one stored conversation, or all of them
    Clear {
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Conversations stored on the server
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },

    /// Your per-model usage statistics
    Analytics,
    /// Global model leaderboard
    Leaderboard,
    /// Rewrite a prompt with the server-side optimizer (Expert tier)
    Optimize {
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Rate a prompt's strength locally
    Score {
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Send feedback to the team
    Feedback {
        content: String,
        /// suggestion, query or bug
        #[arg(long, default_value = "suggestion")]
        kind: String,
        #[arg(long)]
        contact: Option<String>,
    },
    /// Show or set the theme preference (light, dark, system)
    Theme { theme: Option<String> },
}

#[derive(Subcommand)]
pub enum RemoteAction {
    /// List conversations on the server
    List,
    /// Print one server-side conversation
    Show { id: String },
    /// Create an empty server-side conversation
    Create { model: String },
    /// Delete a server-side conversation
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing; logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatgrid=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.api_url, cli.data_dir);

    let app = commands::App::build(config)?;
    commands::run(&app, cli.command).await
}
