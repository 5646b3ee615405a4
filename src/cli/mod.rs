// CLI module

mod repl;

pub use repl::ChatRepl;

use clap::{Parser, Subcommand};

use crate::config::constants::DEFAULT_CLIENT_URL;

#[derive(Parser)]
#[command(name = "canopy-assist", version, about = "Branded Q&A assistant relay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay server (default)
    Serve,

    /// Interactive chat against a running relay
    Chat {
        /// Relay base URL
        #[arg(long, default_value = DEFAULT_CLIENT_URL)]
        url: String,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question text
        question: String,

        /// Relay base URL
        #[arg(long, default_value = DEFAULT_CLIENT_URL)]
        url: String,
    },
}
