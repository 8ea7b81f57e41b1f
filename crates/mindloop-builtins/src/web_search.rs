use async_trait::async_trait;
use mindloop_core::{MindloopError, MindloopResult, Tool, ToolDescriptor};
use std::time::Duration;
use tracing::info;

const MAX_RESULTS: usize = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com";

/// Web search over the DuckDuckGo instant-answer API.
///
/// Takes the task's free-text input as the query and returns the top
/// results formatted as a title/snippet/link list for the backend to
/// reason over.
pub struct WebSearchTool {
    descriptor: ToolDescriptor,
    endpoint: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Points the tool at an alternate API endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "web_search".to_string(),
                description: "Search the web for current information on a topic.".to_string(),
            },
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, input: &str) -> MindloopResult<String> {
        let query = input.trim();
        if query.is_empty() {
            return Err(MindloopError::Tool("Empty search query".to_string()));
        }
        info!(query = %query, "Web search");

        let resp = self
            .client
            .get(format!("{}/", self.endpoint))
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| MindloopError::Tool(format!("Search request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MindloopError::Tool(format!(
                "Search API returned {status}"
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| MindloopError::Tool(format!("Malformed search response: {e}")))?;

        let results = collect_results(&body);
        if results.is_empty() {
            return Ok("No results found.".to_string());
        }

        let mut out = String::from("Search Results:\n");
        for r in &results {
            out.push_str(&format!(
                "- Title: {}\n  Snippet: {}\n  Link: {}\n\n",
                r.title, r.snippet, r.link
            ));
        }
        Ok(out)
    }
}

struct SearchResult {
    title: String,
    snippet: String,
    link: String,
}

/// Flattens the instant-answer payload into at most [`MAX_RESULTS`]
/// title/snippet/link entries: the abstract first, then related topics
/// (including one level of category nesting).
fn collect_results(body: &serde_json::Value) -> Vec<SearchResult> {
    let mut results = Vec::new();

    let abstract_text = body["AbstractText"].as_str().unwrap_or_default();
    if !abstract_text.is_empty() {
        results.push(SearchResult {
            title: body["Heading"].as_str().unwrap_or("N/A").to_string(),
            snippet: abstract_text.to_string(),
            link: body["AbstractURL"].as_str().unwrap_or("N/A").to_string(),
        });
    }

    if let Some(topics) = body["RelatedTopics"].as_array() {
        for topic in topics {
            if results.len() >= MAX_RESULTS {
                break;
            }
            if let Some(nested) = topic["Topics"].as_array() {
                for inner in nested {
                    if results.len() >= MAX_RESULTS {
                        break;
                    }
                    push_topic(&mut results, inner);
                }
            } else {
                push_topic(&mut results, topic);
            }
        }
    }

    results
}

fn push_topic(results: &mut Vec<SearchResult>, topic: &serde_json::Value) {
    let text = topic["Text"].as_str().unwrap_or_default();
    if text.is_empty() {
        return;
    }
    // The topic text has no separate title; use its first sentence.
    let title = text.split(" - ").next().unwrap_or(text);
    results.push(SearchResult {
        title: title.to_string(),
        snippet: text.to_string(),
        link: topic["FirstURL"].as_str().unwrap_or("N/A").to_string(),
    });
}
