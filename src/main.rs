mod cli;
mod config;
mod github;
mod pr_types;
mod report;

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let home_dir = match dirs::home_dir() {
        Some(dir) => dir,
        None => {
            eprintln!("Unable to determine home directory");
            std::process::exit(1);
        }
    };
    let toml_path = home_dir.join("prdigest_repos.toml");
    let mut config = match config::Config::create_or_load(toml_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    match cli.commands {
        Commands::Track {
            repo,
            author,
            heading,
            flat,
        } => {
            config.track(repo, author, heading, flat);
        }
        Commands::ListAll => {
            config.list_all();
        }
        Commands::Remove { repo } => config.remove(repo),
        Commands::Report {
            days,
            output,
            token_file,
        } => {
            let token_path = token_file
                .map(PathBuf::from)
                .unwrap_or_else(|| home_dir.join(".github_token"));
            if let Err(e) = report::run(&config, days, token_path, output) {
                eprintln!("Failed to generate report: {}", e);
                std::process::exit(1);
            }
        }
    }
}
