use crate::models::{ArchivesResponse, Game, GamesResponse, PlayerProfile, PlayerStats};
use anyhow::{anyhow, Context, Result};
use http::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://api.chess.com/pub";

/// Read-only client for the chess.com public API. All three player
/// resources are keyed by username; no authentication is involved.
pub struct ChessApi {
    client: reqwest::Client,
    base_url: String,
}

impl ChessApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ChessApi { client, base_url }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to decode response from {}", url));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(2);
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            return Err(anyhow!(
                "Rate limited on {} - had to wait {} seconds",
                url,
                wait_secs
            ));
        }

        Err(anyhow!("Request to {} returned status {}", url, status))
    }

    pub async fn get_profile(&self, username: &str) -> Result<PlayerProfile> {
        let url = format!("{}/player/{}", self.base_url, username);
        self.fetch_json(&url)
            .await
            .with_context(|| format!("No profile found for \"{}\"", username))
    }

    pub async fn get_stats(&self, username: &str) -> Result<PlayerStats> {
        let url = format!("{}/player/{}/stats", self.base_url, username);
        self.fetch_json(&url)
            .await
            .with_context(|| format!("No stats found for \"{}\"", username))
    }

    /// Games from the player's most recent monthly archive, newest first.
    /// Missing or unfetchable archives mean "zero games", not a failure;
    /// the rest of the dashboard can still render.
    pub async fn get_recent_games(&self, username: &str) -> Result<Vec<Game>> {
        let url = format!("{}/player/{}/games/archives", self.base_url, username);
        let archives: ArchivesResponse = match self.fetch_json(&url).await {
            Ok(archives) => archives,
            Err(e) => {
                warn!("Archive index fetch failed for {}: {:#}", username, e);
                return Ok(Vec::new());
            }
        };

        let Some(latest_url) = latest_archive(&archives) else {
            return Ok(Vec::new());
        };

        let response: GamesResponse = match self.fetch_json(latest_url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Latest archive fetch failed for {}: {:#}", username, e);
                return Ok(Vec::new());
            }
        };

        let mut games = response.games;
        games.reverse();
        Ok(games)
    }
}

/// The index is chronological, oldest first, so the last entry is the most
/// recent month.
pub fn latest_archive(archives: &ArchivesResponse) -> Option<&str> {
    archives.archives.last().map(String::as_str)
}
