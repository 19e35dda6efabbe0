use chrono::{Duration, NaiveDate, Utc};
use colored::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::config::{Config, RepoConfig};
use crate::github::Client;
use crate::pr_types::{PrSummary, PullDetail, SearchItem};

/// Label fragments mapped to report topics, checked in order with the
/// first match winning. Anything unmatched lands under "Other".
const MAJOR_POI: &[(&str, &str)] = &[
    ("docs", "Documentation"),
    ("libbeat", "All Beats"),
    ("Metricbeat", "Metricbeat"),
    ("Packetbeat", "Packetbeat"),
    ("Filebeat", "Filebeat"),
    ("Heartbeat", "Heartbeat"),
    ("Winlogbeat", "Winlogbeat"),
    (":Packaging", "Packaging"),
    (":Infra", "Infrastructure"),
    ("new Beat", "New community Beats"),
];

const FALLBACK_POI: &str = "Other";

pub fn run(
    config: &Config,
    days: i64,
    token_path: PathBuf,
    output: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.toml_data.is_empty() {
        return Err("No repositories to report on".into());
    }

    let client = Client::from_token_file(&token_path)?;
    let since = Utc::now().date_naive() - Duration::days(days);
    let html = generate(&client, config, since)?;

    match output {
        Some(path) => {
            fs::write(&path, html).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            println!("Report written to {}", path.green());
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn generate(
    client: &Client,
    config: &Config,
    since: NaiveDate,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut html = format!(
        "Merged pull requests since {}:\n",
        since.format("%Y-%m-%d")
    );
    for (repo, repo_cfg) in &config.toml_data {
        let summary = build_summary(client, repo, repo_cfg, since)?;
        html.push_str(&summary.render());
    }
    Ok(html)
}

fn build_summary(
    client: &Client,
    repo: &str,
    cfg: &RepoConfig,
    since: NaiveDate,
) -> Result<Summary, Box<dyn std::error::Error>> {
    let items = client.search_merged_prs(repo, cfg.author.as_deref(), since)?;
    let backported = backport_targets(&items);

    let mut summary = Summary::default();
    for item in items {
        if backported.contains(&item.number) {
            eprintln!("Ignore PR #{}", item.number);
            continue;
        }

        let detail = client.pull_detail(repo, item.number)?;
        let labels: Vec<String> = item.labels.iter().map(|l| l.name.clone()).collect();
        let topic = if cfg.flat {
            cfg.heading
                .clone()
                .unwrap_or_else(|| format!("Changes in {}", repo))
        } else {
            classify(&labels).to_string()
        };

        summary.push(
            &topic,
            &branch_of(&detail),
            PrSummary {
                number: item.number,
                title: item.title,
                merged_at: detail.merged_at,
                link: format!("https://github.com/{}/pull/{}", repo, item.number),
                labels,
            },
        );
    }
    summary.sort_by_merge_time();
    Ok(summary)
}

/// PR numbers referenced by backport titles across the whole result set.
/// Collected before filtering so originals are skipped regardless of
/// where they sit in the search order.
fn backport_targets(items: &[SearchItem]) -> HashSet<u64> {
    let mut targets = HashSet::new();
    for item in items {
        if !item.labels.iter().any(|l| l.name == "backport") {
            continue;
        }
        match backport_target(&item.title) {
            Some(number) => {
                targets.insert(number);
            }
            None => eprintln!(
                "{} could not find the original PR number in \"{}\"",
                "Warning:".yellow(),
                item.title
            ),
        }
    }
    targets
}

/// The original PR number named by a backport title, e.g.
/// `Backport #4242 to 6.0` -> 4242.
fn backport_target(title: &str) -> Option<u64> {
    let token = title.split_whitespace().nth(1)?;
    token.strip_prefix('#').unwrap_or(token).parse().ok()
}

/// Base branch with the `owner:` prefix stripped.
fn branch_of(detail: &PullDetail) -> String {
    match &detail.base {
        Some(base) => match base.label.split_once(':') {
            Some((_, branch)) => branch.to_string(),
            None => base.label.clone(),
        },
        None => "unknown".to_string(),
    }
}

fn classify(labels: &[String]) -> &'static str {
    for (fragment, topic) in MAJOR_POI {
        if labels.iter().any(|label| label.contains(fragment)) {
            return topic;
        }
    }
    FALLBACK_POI
}

/// Two-level topic -> branch -> PRs grouping, insertion ordered.
#[derive(Debug, Default)]
pub struct Summary {
    topics: Vec<Topic>,
}

#[derive(Debug)]
struct Topic {
    name: String,
    branches: Vec<Branch>,
}

#[derive(Debug)]
struct Branch {
    name: String,
    prs: Vec<PrSummary>,
}

impl Summary {
    fn push(&mut self, topic: &str, branch: &str, pr: PrSummary) {
        let t = match self.topics.iter().position(|t| t.name == topic) {
            Some(idx) => idx,
            None => {
                self.topics.push(Topic {
                    name: topic.to_string(),
                    branches: Vec::new(),
                });
                self.topics.len() - 1
            }
        };
        let topic = &mut self.topics[t];

        let b = match topic.branches.iter().position(|b| b.name == branch) {
            Some(idx) => idx,
            None => {
                topic.branches.push(Branch {
                    name: branch.to_string(),
                    prs: Vec::new(),
                });
                topic.branches.len() - 1
            }
        };
        topic.branches[b].prs.push(pr);
    }

    fn sort_by_merge_time(&mut self) {
        for topic in &mut self.topics {
            for branch in &mut topic.branches {
                branch.prs.sort_by_key(|pr| pr.merged_at);
            }
        }
    }

    fn render(&self) -> String {
        let mut html = String::new();
        for topic in &self.topics {
            html.push_str(&format!("<p><strong>{}</strong></p>\n", escape(&topic.name)));
            for branch in &topic.branches {
                html.push_str(&format!("<p>Changes in {}:</p>\n", escape(&branch.name)));
                html.push_str("<p><ul>\n");
                for pr in &branch.prs {
                    html.push_str(&format!(
                        "<li>{} <a href=\"{}\">#{}</a> [{}]</li>\n",
                        escape(&pr.title),
                        pr.link,
                        pr.number,
                        escape(&pr.labels.join(", "))
                    ));
                }
                html.push_str("</ul></p>\n");
            }
        }
        html
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
