use chrono::NaiveDate;
use reqwest::blocking::{Client as HttpClient, Response};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::pr_types::{PullDetail, SearchItem, SearchResponse};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("prdigest/", env!("CARGO_PKG_VERSION"));

pub struct Client {
    http: HttpClient,
    token: String,
    base_url: String,
}

impl Client {
    pub fn new(token: String) -> Result<Self, Box<dyn std::error::Error>> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            token,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn from_token_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let token = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read token file {}: {}", path.display(), e))?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(format!("Token file {} is empty", path.display()).into());
        }
        Self::new(token)
    }

    fn get(&self, url: &str) -> Result<Response, Box<dyn std::error::Error>> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()?;

        if !response.status().is_success() {
            return Err(format!("HTTP error: {} for {}", response.status(), url).into());
        }
        Ok(response)
    }

    /// Pages through `search/issues` until a page comes back empty.
    pub fn search_merged_prs(
        &self,
        repo: &str,
        author: Option<&str>,
        since: NaiveDate,
    ) -> Result<Vec<SearchItem>, Box<dyn std::error::Error>> {
        let q = search_query(repo, author, since);
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/search/issues?q={}&per_page=100&page={}",
                self.base_url, q, page
            );
            let result: SearchResponse = self.get(&url)?.json()?;
            if result.items.is_empty() {
                break;
            }
            items.extend(result.items);
            page += 1;
        }

        Ok(items)
    }

    pub fn pull_detail(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullDetail, Box<dyn std::error::Error>> {
        let url = format!("{}/repos/{}/pulls/{}", self.base_url, repo, number);
        Ok(self.get(&url)?.json()?)
    }
}

fn search_query(repo: &str, author: Option<&str>, since: NaiveDate) -> String {
    let mut params = vec![
        format!("repo:{}", repo),
        "is:pr".to_string(),
        "state:closed".to_string(),
        format!("merged:>{}", since.format("%Y-%m-%d")),
    ];
    if let Some(author) = author {
        params.push(format!("author:{}", author));
    }
    params.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 23).unwrap()
    }

    #[test]
    fn query_holds_repo_state_and_window() {
        assert_eq!(
            search_query("elastic/beats", None, cutoff()),
            "repo:elastic/beats+is:pr+state:closed+merged:>2026-07-23"
        );
    }

    #[test]
    fn query_appends_author_filter() {
        assert_eq!(
            search_query("elastic/kibana", Some("simianhacker"), cutoff()),
            "repo:elastic/kibana+is:pr+state:closed+merged:>2026-07-23+author:simianhacker"
        );
    }
}
