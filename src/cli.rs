use clap::{Parser, Subcommand};

/// CLI tool to summarize pull requests merged on GitHub as an HTML report
#[derive(Parser, Debug)]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a repository (owner/name) to the report set
    Track {
        repo: String,

        /// Only include pull requests by this author
        #[arg(short, long)]
        author: Option<String>,

        /// Section heading used when the repo is rendered flat
        #[arg(long)]
        heading: Option<String>,

        /// Group by branch only, skipping topic classification
        #[arg(long)]
        flat: bool,
    },

    /// List all repositories in the report set
    ListAll,

    /// Remove a repository from the report set
    Remove { repo: String },

    /// Fetch merged pull requests and print the HTML summary
    Report {
        /// How many days back to search for merged pull requests
        #[arg(short, long, default_value_t = 14)]
        days: i64,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// File holding the GitHub personal access token
        #[arg(long)]
        token_file: Option<String>,
    },
}
