use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "efolder-bridge", version, about = "Encompass eFolder upload bridge")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP file ingress (default)
    Serve,
    /// Print a freshly obtained Encompass access token
    Token,
    /// Upload a file into a loan's eFolder placeholder
    Upload {
        #[arg(long)]
        loan_number: String,
        #[arg(long, help = "Placeholder title; matched as a substring of existing titles")]
        placeholder: String,
        file: PathBuf,
    },
}
