//! Vestibule CLI - session operations against a configured backend
//!
//! A thin consumer standing in for the UI layer: it starts a session
//! synchronizer, renders the one-time initialization gate, runs the
//! requested operation and prints the resulting session view.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use vestibule_core::config::Config;
use vestibule_core::domain::session::{
    IdentityProvider, Navigator, ProfileStore, Route, SessionState, SessionSynchronizer,
    SessionView,
};
use vestibule_core::infrastructure::identity::RestIdentityProvider;
use vestibule_core::infrastructure::memory::{MemoryIdentityProvider, MemoryProfileStore};
use vestibule_core::infrastructure::profile::RestProfileStore;

#[derive(Parser)]
#[command(name = "vestibule")]
#[command(author, version, about = "Session synchronization client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use in-memory backends instead of the configured endpoints
    #[arg(long, global = true)]
    offline: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account and sign in
    Register {
        email: String,
        password: String,
        /// Business name for the profile record
        #[arg(short, long)]
        business_name: Option<String>,
        /// Website for the profile record
        #[arg(short, long)]
        website: Option<String>,
    },

    /// Sign in with an existing account
    Login { email: String, password: String },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Write the default configuration file
    Init,
}

/// Navigator printing requested routes, the way a router would consume them
struct PrintNavigator {
    quiet: bool,
}

impl Navigator for PrintNavigator {
    fn navigate(&self, route: Route) {
        if !self.quiet {
            println!("-> {}", route);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => run_config(action, cli.quiet),
        command => run_session_command(command, cli.offline, cli.quiet).await,
    }
}

fn run_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load().context("failed to load configuration")?;
            let rendered =
                toml::to_string_pretty(&config).context("failed to render configuration")?;
            println!("{}", rendered);
            if let Some(key) = config.identity.redacted_api_key()? {
                println!("# identity API key: {}", key);
            } else {
                println!("# identity API key: not set (export VESTIBULE_API_KEY)");
            }
            Ok(())
        }
        ConfigAction::Init => {
            let config = Config::default();
            config.save().context("failed to write configuration")?;
            if !quiet {
                println!(
                    "Wrote default configuration to {}",
                    Config::config_path()?.display()
                );
            }
            Ok(())
        }
    }
}

async fn run_session_command(command: Commands, offline: bool, quiet: bool) -> anyhow::Result<()> {
    let (provider, store): (Arc<dyn IdentityProvider>, Arc<dyn ProfileStore>) = if offline {
        (
            Arc::new(MemoryIdentityProvider::new()),
            Arc::new(MemoryProfileStore::new()),
        )
    } else {
        let config = Config::load().context("failed to load configuration")?;
        (
            Arc::new(
                RestIdentityProvider::from_config(&config.identity)
                    .context("failed to build identity provider")?,
            ),
            Arc::new(
                RestProfileStore::from_config(&config.profile)
                    .context("failed to build profile store")?,
            ),
        )
    };

    let navigator = Arc::new(PrintNavigator { quiet });
    let synchronizer = SessionSynchronizer::start(provider, store, navigator).await;

    // One-time gate: render a placeholder until the first provider state
    // resolution lands.
    let mut handle = synchronizer.handle();
    if handle.current().initializing {
        if !quiet {
            println!("Resolving session...");
        }
        let gate = tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                let view = handle.changed().await?;
                if !view.initializing {
                    return Ok::<(), vestibule_core::Error>(());
                }
            }
        })
        .await
        .context("timed out waiting for the initial session resolution")?;
        gate.context("session synchronizer went away during initialization")?;
    }

    match command {
        Commands::Register {
            email,
            password,
            business_name,
            website,
        } => {
            synchronizer
                .register(&email, &password, business_name, website)
                .await
                .context("registration failed")?;
            info!(email = %email, "registered");
            print_view(&synchronizer.view(), quiet);
        }
        Commands::Login { email, password } => {
            synchronizer
                .login(&email, &password)
                .await
                .context("login failed")?;
            print_view(&synchronizer.view(), quiet);
        }
        Commands::Logout => {
            synchronizer.logout().await.context("logout failed")?;
            print_view(&synchronizer.view(), quiet);
        }
        Commands::Whoami => {
            print_view(&synchronizer.view(), quiet);
        }
        Commands::Config { .. } => unreachable!("handled before session setup"),
    }

    synchronizer.shutdown().await;
    Ok(())
}

fn print_view(view: &SessionView, quiet: bool) {
    match &view.state {
        SessionState::Absent => println!("signed out"),
        SessionState::SignedIn(session) => {
            println!(
                "signed in as {} ({})",
                session.email.as_deref().unwrap_or("<no email>"),
                session.identity
            );
            if !quiet {
                if let Some(name) = &session.business_name {
                    println!("  business: {}", name);
                }
                if let Some(site) = &session.website {
                    println!("  website:  {}", site);
                }
                println!("  role:     {}", session.role);
                println!("  status:   {}", session.status);
            }
        }
    }
}
