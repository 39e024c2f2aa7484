use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "palaver", about = "Minimal TCP chat server (common + private chats)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server host to bind or connect to (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port to bind or connect to (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the chat server
    Serve,
    /// Start an interactive client session against a running server
    Client {
        /// Name to register with the server
        #[arg(short, long)]
        name: String,
    },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
