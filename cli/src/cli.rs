use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sadtime_business::BusinessConfig;

#[derive(Parser)]
#[command(name = "sadtime")]
#[command(about = "CLI for the SADTIME threat analytics dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend origin, without the `/api` prefix
    #[arg(long, global = true, env = "SADTIME_API_URL")]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Backend to talk to. A blank `--api-url` counts as not given.
    pub fn business_config(&self) -> BusinessConfig {
        match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => BusinessConfig::new(url),
            _ => BusinessConfig::default(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, print the analytics summary and sign out again
    Dashboard {
        /// Username to sign in with (prompted when missing)
        #[arg(long, short = 'u')]
        username: Option<String>,
    },
    /// Check backend health and the current session
    Status,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
