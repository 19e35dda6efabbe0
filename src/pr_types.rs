use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of `search/issues` results. Only the fields the report
/// consumes are kept.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
pub struct Label {
    pub name: String,
}

/// Detail payload from `repos/{repo}/pulls/{number}`.
#[derive(Debug, Deserialize)]
pub struct PullDetail {
    pub merged_at: Option<DateTime<Utc>>,
    pub base: Option<BaseRef>,
}

#[derive(Debug, Deserialize)]
pub struct BaseRef {
    /// Branch label in `owner:ref` form
    pub label: String,
}

/// A pull request as it appears in the rendered report.
#[derive(Debug, Clone)]
pub struct PrSummary {
    pub number: u64,
    pub title: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub link: String,
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_search_response() {
        let json = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "number": 4242,
                    "title": "Add dissect processor",
                    "labels": [
                        {"name": "Filebeat"},
                        {"name": "review"}
                    ]
                },
                {
                    "number": 4243,
                    "title": "Backport #4242 to 6.0",
                    "labels": [{"name": "backport"}]
                }
            ]
        }"#;

        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].number, 4242);
        assert_eq!(resp.items[0].labels[0].name, "Filebeat");
        assert_eq!(resp.items[1].title, "Backport #4242 to 6.0");
    }

    #[test]
    fn deserializes_pull_detail() {
        let json = r#"{
            "number": 4242,
            "state": "closed",
            "merged_at": "2026-07-28T09:15:00Z",
            "base": {
                "label": "elastic:master",
                "ref": "master"
            }
        }"#;

        let detail: PullDetail = serde_json::from_str(json).unwrap();
        assert!(detail.merged_at.is_some());
        assert_eq!(detail.base.unwrap().label, "elastic:master");
    }

    #[test]
    fn tolerates_missing_labels_and_base() {
        let item: SearchItem =
            serde_json::from_str(r#"{"number": 7, "title": "Fix typo"}"#).unwrap();
        assert!(item.labels.is_empty());

        let detail: PullDetail = serde_json::from_str(r#"{"merged_at": null}"#).unwrap();
        assert!(detail.merged_at.is_none());
        assert!(detail.base.is_none());
    }
}
