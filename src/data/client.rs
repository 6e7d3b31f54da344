//! Records API integration (paginated worker profiles).

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::RawRecord;
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "http://localhost:3002";
const ENDPOINT: &str = "/freelancers";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Connection settings for the records API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub max_attempts: u32,
    /// Base delay; attempt `k` waits `k × retry_delay` before retrying.
    pub retry_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: ENDPOINT.to_string(),
            timeout: REQUEST_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }
}

impl ApiConfig {
    /// Defaults, with `API_BASE_URL` taken from the environment (or `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(url) = std::env::var("API_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        config
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint)
    }
}

/// One page of the paginated listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub items: Vec<RawRecord>,
}

pub struct RecordsClient {
    client: Client,
    config: ApiConfig,
}

impl RecordsClient {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(ApiConfig::from_env())
    }

    /// Fetch one page, retrying with linear backoff.
    pub fn fetch_page(&self, page: usize, limit: usize) -> Result<Page, AppError> {
        retry_with_backoff(self.config.max_attempts, self.config.retry_delay, page, || {
            self.fetch_page_once(page, limit)
        })
    }

    /// Fetch every page. The first page tells us how many there are.
    pub fn fetch_all(&self, limit: usize) -> Result<Vec<RawRecord>, AppError> {
        info!("Fetching first page to determine total records...");
        let first = self.fetch_page(1, limit)?;
        let total = first.total;
        let total_pages = first.total_pages.max(1);
        info!(total, total_pages, "listing size");

        let mut all = first.items;
        info!("Progress: 1/{total_pages} pages ({}/{total} records)", all.len());

        for page in 2..=total_pages {
            let data = self.fetch_page(page, limit)?;
            all.extend(data.items);
            if page % 10 == 0 || page == total_pages {
                info!("Progress: {page}/{total_pages} pages ({}/{total} records)", all.len());
            }
        }

        info!("Fetched all {} records", all.len());
        Ok(all)
    }

    fn fetch_page_once(&self, page: usize, limit: usize) -> Result<Page, AppError> {
        let resp = self
            .client
            .get(self.config.url())
            .query(&[("page", page), ("limit", limit)])
            .send()
            .map_err(|e| AppError::new(4, format!("Failed to fetch page {page}: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Failed to fetch page {page}: status {}", resp.status()),
            ));
        }

        resp.json()
            .map_err(|e| AppError::new(4, format!("Failed to parse page {page}: {e}")))
    }
}

/// Run `op` up to `attempts` times. After failure `k` (1-based) we sleep
/// `k × base_delay`. The last error is returned unchanged.
pub fn retry_with_backoff<T>(
    attempts: u32,
    base_delay: Duration,
    page: usize,
    mut op: impl FnMut() -> Result<T, AppError>,
) -> Result<T, AppError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                warn!("Retry {attempt}/{attempts} for page {page} after error: {e}");
                std::thread::sleep(base_delay * attempt);
                attempt += 1;
            }
        }
    }
}
