/// Music search by scraping the video site's public results page
///
/// There is no stable contract with the results page: any failure to fetch
/// or to find an identifier is reported as "not found".
use crate::config::SearchSettings;
use async_trait::async_trait;
use cupid_core::{TrackId, TrackSearch};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

static VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""videoId":"([A-Za-z0-9_-]{11})""#).expect("valid regex"));

static WATCH_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"watch\?v=([A-Za-z0-9_-]{11})").expect("valid regex"));

/// First video identifier embedded in a results page
pub fn extract_video_id(html: &str) -> Option<TrackId> {
    VIDEO_ID
        .captures(html)
        .or_else(|| WATCH_LINK.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| TrackId::new(m.as_str()))
}

pub struct YoutubeScraper {
    http: Client,
    results_url: String,
}

impl YoutubeScraper {
    pub fn new(settings: &SearchSettings) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            results_url: settings.results_url.clone(),
        })
    }

    async fn fetch_results(&self, query: &str) -> reqwest::Result<String> {
        self.http
            .get(&self.results_url)
            .query(&[("search_query", query)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl TrackSearch for YoutubeScraper {
    async fn search(&self, query: &str) -> cupid_core::Result<Option<TrackId>> {
        let html = match self.fetch_results(query).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Search page unavailable");
                return Ok(None);
            }
        };

        let id = extract_video_id(&html);
        match &id {
            Some(id) => tracing::info!(query = %query, video = %id, "Search hit"),
            None => tracing::info!(query = %query, "No video in search results"),
        }
        Ok(id)
    }
}
