use colored::*;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

/// Per-repository report options stored in the tracked-repo TOML file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RepoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Group by branch only instead of classifying into topics
    #[serde(default)]
    pub flat: bool,
}

pub struct Config {
    pub file_path: String,
    pub toml_data: BTreeMap<String, RepoConfig>,
}

impl Config {
    pub fn create_or_load(toml_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if toml_path.exists() {
            return Ok(Self {
                file_path: toml_path.display().to_string(),
                toml_data: Self::read_toml(toml_path)?,
            });
        }
        Ok(Self {
            file_path: toml_path.display().to_string(),
            toml_data: Self::default_repos(),
        })
    }

    fn read_toml(toml_path: PathBuf) -> Result<BTreeMap<String, RepoConfig>, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(&toml_path)
            .map_err(|e| format!("Unable to read {}: {}", toml_path.display(), e))?;
        let parsed = toml::from_str(&content)
            .map_err(|e| format!("Unable to parse {}: {}", toml_path.display(), e))?;
        Ok(parsed)
    }

    /// The report set used until the user edits it: the weekly-update
    /// sections the tool started out with.
    fn default_repos() -> BTreeMap<String, RepoConfig> {
        let mut repos = BTreeMap::new();
        repos.insert(
            "elastic/beats".to_string(),
            RepoConfig {
                author: None,
                heading: None,
                flat: false,
            },
        );
        repos.insert(
            "elastic/kibana".to_string(),
            RepoConfig {
                author: Some("simianhacker".to_string()),
                heading: Some("Changes in Kibana".to_string()),
                flat: true,
            },
        );
        repos
    }

    pub fn track(
        &mut self,
        repo: String,
        author: Option<String>,
        heading: Option<String>,
        flat: bool,
    ) {
        if !repo.contains('/') {
            eprintln!("Repository must be given as owner/name - {}", repo);
            std::process::exit(1);
        }
        self.toml_data.insert(
            repo.clone(),
            RepoConfig {
                author,
                heading,
                flat,
            },
        );
        self.write_back();
        println!("Successfully added - {}", repo.green());
    }

    fn write_back(&self) {
        let toml_data = toml::to_string(&self.toml_data).expect("Unable to convert to TOML format");
        fs::write(&self.file_path, toml_data).expect("Unable to write to file");
    }

    pub fn list_all(&self) {
        for (repo, cfg) in &self.toml_data {
            println!(
                "Repo - {} {} {}",
                repo.green(),
                "->".bright_blue(),
                Self::describe(cfg).magenta()
            );
        }
    }

    fn describe(cfg: &RepoConfig) -> String {
        let mut parts = vec![if cfg.flat {
            "grouped by branch".to_string()
        } else {
            "classified by topic".to_string()
        }];
        if let Some(author) = &cfg.author {
            parts.push(format!("author {}", author));
        }
        if let Some(heading) = &cfg.heading {
            parts.push(format!("heading \"{}\"", heading));
        }
        parts.join(", ")
    }

    pub fn remove(&mut self, repo: String) {
        if self.toml_data.contains_key(&repo) {
            self.toml_data.remove(&repo);
            self.write_back();
            println!("{} {}", "Removed".red(), repo.red().bold());
            return;
        }
        println!("{} does not exist", repo);
    }
}
